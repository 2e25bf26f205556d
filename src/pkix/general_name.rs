//! Helpers for general names.

use crate::oid;
use crate::document::{Document, Node};


/// Returns the general names of the subject alternative name extension.
///
/// Returns an empty list if the certificate doesn’t have the extension.
pub fn get_san_general_names(document: &Document) -> Vec<Node<'_>> {
    document.get_extension_by_oid(&oid::CE_SUBJECT_ALT_NAME).and_then(
        |(extension, _)| extension.navigate("extnValue.subjectAltName")
    ).map(|names| names.children().collect()).unwrap_or_default()
}

/// Returns the email addresses contained in the subject alternative name.
///
/// These are the values of all rfc822Name general names and the mailboxes
/// of all otherName general names of type SmtpUTF8Mailbox, in order.
pub fn get_email_addresses_from_san(document: &Document) -> Vec<&str> {
    get_san_general_names(document).into_iter().filter_map(|name| {
        let choice = name.child()?;
        let value = match choice.name() {
            "rfc822Name" => choice,
            "otherName" => {
                let type_id = choice.child_by_name("type-id")?.pdu().as_oid()?;
                if *type_id != oid::ON_SMTP_UTF8_MAILBOX {
                    return None
                }
                choice.navigate("value")?.child()?
            }
            _ => return None
        };
        value.pdu().as_string().map(|value| value.as_str())
    }).collect()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{CertBuilder, SanEntry};

    #[test]
    fn san_email_addresses() {
        let doc = CertBuilder::new()
            .san(SanEntry::Dns("example.com"))
            .san(SanEntry::Rfc822("a@example.com"))
            .san(SanEntry::SmtpUtf8("b@example.com"))
            .document();
        assert_eq!(
            get_email_addresses_from_san(&doc),
            ["a@example.com", "b@example.com"]
        );
        assert_eq!(get_san_general_names(&doc).len(), 3);
    }

    #[test]
    fn no_san() {
        let doc = CertBuilder::new().document();
        assert!(get_email_addresses_from_san(&doc).is_empty());
    }
}
