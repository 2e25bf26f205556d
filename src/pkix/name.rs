//! Helpers for distinguished names.

use bcder::Oid;
use bytes::Bytes;
use crate::document::{Node, PduKind};


/// Returns the attribute types present in an RDNSequence.
///
/// Each type appears only once in the order of its first appearance.
pub fn attribute_types(rdn_sequence: Node<'_>) -> Vec<&Oid<Bytes>> {
    let mut res: Vec<&Oid<Bytes>> = Vec::new();
    for rdn in rdn_sequence.children() {
        for atv in rdn.children() {
            if let Some(attr_type) = atv.attribute_type() {
                if !res.contains(&attr_type) {
                    res.push(attr_type)
                }
            }
        }
    }
    res
}

/// Returns whether a list of attribute types contains the given type.
pub fn contains_type<T: AsRef<[u8]>>(
    types: &[&Oid<Bytes>], attr_type: &Oid<T>
) -> bool {
    types.iter().any(|item| *item == attr_type)
}

/// Returns the decoded string value of an AttributeTypeAndValue.
///
/// Returns `None` if the value could not be decoded as a string.
pub fn string_value(atv: Node<'_>) -> Option<&str> {
    atv.child_by_name("value")?.child()?.pdu().as_string().map(|value| {
        value.as_str()
    })
}

/// Returns the decoded string of an AttributeValue node.
pub fn value_string(value: Node<'_>) -> Option<&str> {
    value.child()?.pdu().as_string().map(|value| value.as_str())
}

/// Returns all attributes of a given type in a name.
///
/// The name can be given either as the Name or the RDNSequence node. Each
/// item is the AttributeTypeAndValue node and the index of its RDN.
pub fn get_name_attributes_by_type<'a, T: AsRef<[u8]>>(
    name: Node<'a>, attr_type: &Oid<T>
) -> Vec<(Node<'a>, usize)> {
    let rdn_sequence = match name.kind() {
        PduKind::Name => match name.child_by_name("rdnSequence") {
            Some(node) => node,
            None => return Vec::new(),
        }
        _ => name
    };
    rdn_sequence.children().enumerate().flat_map(move |(idx, rdn)| {
        rdn.children().filter(move |atv| {
            atv.attribute_type().map(|found| found == attr_type)
                .unwrap_or(false)
        }).map(move |atv| (atv, idx))
    }).collect()
}

/// Returns the Name node a node is part of.
pub fn parent_name(node: Node<'_>) -> Option<Node<'_>> {
    node.parents().find(|node| node.kind() == PduKind::Name)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::oid;
    use crate::test::CertBuilder;

    #[test]
    fn attributes_of_subject() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_GIVEN_NAME, "Jane")
            .subject_rdn(&[
                (oid::AT_SURNAME, "Doe"), (oid::AT_GIVEN_NAME, "Janet")
            ])
            .document();
        let subject = doc.root().navigate("tbsCertificate.subject").unwrap();
        let rdns = subject.child_by_name("rdnSequence").unwrap();
        let types = attribute_types(rdns);
        assert_eq!(types.len(), 2);
        assert!(contains_type(&types, &oid::AT_SURNAME));
        assert!(!contains_type(&types, &oid::AT_COMMON_NAME));

        let given = get_name_attributes_by_type(subject, &oid::AT_GIVEN_NAME);
        assert_eq!(
            given.iter().map(|(atv, idx)| {
                (string_value(*atv).unwrap(), *idx)
            }).collect::<Vec<_>>(),
            [("Jane", 0), ("Janet", 1)]
        );
        assert_eq!(
            get_name_attributes_by_type(rdns, &oid::AT_GIVEN_NAME).len(), 2
        );
        assert_eq!(
            parent_name(given[0].0).unwrap().path(),
            "certificate.tbsCertificate.subject"
        );
    }
}
