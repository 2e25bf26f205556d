//! The object identifiers used in this crate.
//!
//! This module collects all the object indentifiers used at various places
//! in this crate in one central place. They are public so you can refer to
//! them should that ever become necessary.
//!
//! In addition, the module provides a small dictionary mapping identifiers
//! to human-readable names. It is only ever used to render diagnostic
//! messages and never drives any decision.

use std::fmt;
use bcder::{ConstOid, Oid};


//------------ Attribute Types -----------------------------------------------

pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]); // 2 5 4 3
pub const AT_SURNAME: ConstOid = Oid(&[85, 4, 4]);
pub const AT_SERIAL_NUMBER: ConstOid = Oid(&[85, 4, 5]);
pub const AT_COUNTRY_NAME: ConstOid = Oid(&[85, 4, 6]);
pub const AT_LOCALITY_NAME: ConstOid = Oid(&[85, 4, 7]);
pub const AT_STATE_OR_PROVINCE_NAME: ConstOid = Oid(&[85, 4, 8]);
pub const AT_STREET_ADDRESS: ConstOid = Oid(&[85, 4, 9]);
pub const AT_ORGANIZATION_NAME: ConstOid = Oid(&[85, 4, 10]);
pub const AT_ORGANIZATIONAL_UNIT_NAME: ConstOid = Oid(&[85, 4, 11]);
pub const AT_TITLE: ConstOid = Oid(&[85, 4, 12]);
pub const AT_DESCRIPTION: ConstOid = Oid(&[85, 4, 13]);
pub const AT_BUSINESS_CATEGORY: ConstOid = Oid(&[85, 4, 15]);
pub const AT_POSTAL_CODE: ConstOid = Oid(&[85, 4, 17]);
pub const AT_NAME: ConstOid = Oid(&[85, 4, 41]);
pub const AT_GIVEN_NAME: ConstOid = Oid(&[85, 4, 42]);
pub const AT_INITIALS: ConstOid = Oid(&[85, 4, 43]);
pub const AT_GENERATION_QUALIFIER: ConstOid = Oid(&[85, 4, 44]);
pub const AT_DN_QUALIFIER: ConstOid = Oid(&[85, 4, 46]);
pub const AT_PSEUDONYM: ConstOid = Oid(&[85, 4, 65]);
pub const AT_ORGANIZATION_IDENTIFIER: ConstOid = Oid(&[85, 4, 97]);

/// RFC 4519 `domainComponent`
pub const AT_DOMAIN_COMPONENT: ConstOid
    = Oid(&[9, 146, 38, 137, 147, 242, 44, 100, 1, 25]);

/// RFC 4519 `uid`
pub const AT_USER_ID: ConstOid
    = Oid(&[9, 146, 38, 137, 147, 242, 44, 100, 1, 1]);

/// PKCS #9 `emailAddress`
pub const EMAIL_ADDRESS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 1]);


//------------ Extensions and General Names ----------------------------------

pub const CE_SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// [RFC 8398](https://tools.ietf.org/html/rfc8398) `id-on-SmtpUTF8Mailbox`
pub const ON_SMTP_UTF8_MAILBOX: ConstOid
    = Oid(&[43, 6, 1, 5, 5, 7, 8, 9]);


//------------ Signature Algorithms ------------------------------------------

pub const MD2_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 2]);
pub const MD5_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 4]);
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);
pub const SHA224_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 14]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha256WithRSAEncryption`
///
/// Identifies the PKCS #1 version 1.5 signature algorithm with SHA-256.
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-RSASSA-PSS`
pub const RSASSA_PSS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 10]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-mgf1`
pub const MGF1: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 8]);

pub const DSA_WITH_SHA1: ConstOid = Oid(&[42, 134, 72, 206, 56, 4, 3]);
pub const DSA_WITH_SHA224: ConstOid
    = Oid(&[96, 134, 72, 1, 101, 3, 4, 3, 1]);
pub const DSA_WITH_SHA256: ConstOid
    = Oid(&[96, 134, 72, 1, 101, 3, 4, 3, 2]);

pub const ECDSA_WITH_SHA1: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 1]);
pub const ECDSA_WITH_SHA224: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 1]);
pub const ECDSA_WITH_SHA256: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 2]);
pub const ECDSA_WITH_SHA384: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 3]);
pub const ECDSA_WITH_SHA512: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 4]);

/// [RFC 8410](https://tools.ietf.org/html/rfc8410) `id-X25519`
pub const X25519: ConstOid = Oid(&[43, 101, 110]);
pub const X448: ConstOid = Oid(&[43, 101, 111]);
pub const ED25519: ConstOid = Oid(&[43, 101, 112]);
pub const ED448: ConstOid = Oid(&[43, 101, 113]);


//------------ Hash Algorithms -----------------------------------------------

pub const SHA1: ConstOid = Oid(&[43, 14, 3, 2, 26]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha256`
///
/// Identifies the SHA-256 one-way hash function.
pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);
pub const SHA384: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 2]);
pub const SHA512: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 3]);
pub const SHA224: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 4]);


//------------ Names ---------------------------------------------------------

/// The names of the attribute types we know about.
///
/// Any attribute type appearing in one of the policy tables must be listed
/// here.
const NAMES: &[(ConstOid, &str)] = &[
    (AT_COMMON_NAME, "commonName"),
    (AT_SURNAME, "surname"),
    (AT_SERIAL_NUMBER, "serialNumber"),
    (AT_COUNTRY_NAME, "countryName"),
    (AT_LOCALITY_NAME, "localityName"),
    (AT_STATE_OR_PROVINCE_NAME, "stateOrProvinceName"),
    (AT_STREET_ADDRESS, "streetAddress"),
    (AT_ORGANIZATION_NAME, "organizationName"),
    (AT_ORGANIZATIONAL_UNIT_NAME, "organizationUnitName"),
    (AT_TITLE, "title"),
    (AT_DESCRIPTION, "description"),
    (AT_BUSINESS_CATEGORY, "businessCategory"),
    (AT_POSTAL_CODE, "postalCode"),
    (AT_NAME, "name"),
    (AT_GIVEN_NAME, "givenName"),
    (AT_INITIALS, "initials"),
    (AT_GENERATION_QUALIFIER, "generationQualifier"),
    (AT_DN_QUALIFIER, "dnQualifier"),
    (AT_PSEUDONYM, "pseudonym"),
    (AT_ORGANIZATION_IDENTIFIER, "organizationIdentifier"),
    (AT_DOMAIN_COMPONENT, "domainComponent"),
    (AT_USER_ID, "userId"),
    (EMAIL_ADDRESS, "emailAddress"),
];

/// Returns the human-readable name of an object identifier if known.
pub fn name<T: AsRef<[u8]>>(oid: &Oid<T>) -> Option<&'static str> {
    NAMES.iter().find_map(|(known, name)| {
        if known == oid { Some(*name) } else { None }
    })
}

/// Returns a value displaying an object identifier with its name.
///
/// Known identifiers are shown as `name (dotted)`, all others only in
/// dotted notation.
pub fn describe<T: AsRef<[u8]>>(oid: &Oid<T>) -> Describe<'_, T> {
    Describe(oid)
}

/// Formats a list of object identifiers for use in a message.
pub fn format_oids<'a, T, I>(oids: I) -> String
where T: AsRef<[u8]> + 'a, I: IntoIterator<Item = &'a Oid<T>> {
    oids.into_iter().map(|oid| {
        describe(oid).to_string()
    }).collect::<Vec<_>>().join(", ")
}


//------------ Describe ------------------------------------------------------

/// Displays an object identifier together with its name.
pub struct Describe<'a, T: AsRef<[u8]>>(&'a Oid<T>);

impl<T: AsRef<[u8]>> fmt::Display for Describe<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match name(self.0) {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0)
        }
    }
}


//============ Tests =========================================================
