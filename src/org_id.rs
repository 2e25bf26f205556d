//! Organization identifiers.
//!
//! The organizationIdentifier attribute carries a registration scheme, the
//! country of the registration, an optional state or province and a
//! reference within the registry:
//!
//! ```text
//! <scheme><country>[+<state or province>]-<reference>
//! ```
//!
//! The scheme is three upper case letters, the country two. Some schemes
//! don’t use a reference in which case the hyphen is missing, too.

use std::fmt;
use std::sync::LazyLock;
use regex::Regex;
use crate::oid;
use crate::document::{Node, PduKind};
use crate::pkix::Rfc2119Word;
use crate::pkix::name::value_string;
use crate::validation::{
    Finding, FindingDescription, Severity, Validator, ValidatorResult,
};


//------------ Constants -----------------------------------------------------

/// The pseudo country code used by schemes not bound to a country.
pub const COUNTRY_CODE_GLOBAL_SCHEME: &str = "XG";

/// The ISO 3166-1 alpha-2 country codes.
pub const ISO3166_1_COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT",
    "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI",
    "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY",
    "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK",
    "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL",
    "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR",
    "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS",
    "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW",
    "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP",
    "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM",
    "SN", "SO", "SR", "SS", "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF",
    "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW",
    "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// The country code set containing only the global scheme code.
pub const GLOBAL_SCHEME_COUNTRY_CODES: &[&str] = &[COUNTRY_CODE_GLOBAL_SCHEME];

static ORGANIZATION_IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<scheme>[A-Z]{3})(?P<country>[A-Z]{2})(?:\+(?P<state_province>[^-]+))?(?:-(?P<reference>.+))?$"
    ).unwrap()
});


//------------ OrganizationIdentifier ----------------------------------------

/// A parsed organization identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrganizationIdentifier {
    pub scheme: String,
    pub country: String,
    pub state_province: Option<String>,
    pub reference: Option<String>,
}

impl OrganizationIdentifier {
    /// Parses an organization identifier from its attribute value.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let captures = ORGANIZATION_IDENTIFIER_RE.captures(value).ok_or(
            ParseError
        )?;
        let group = |name: &str| captures.name(name).map(|item| {
            String::from(item.as_str())
        });
        Ok(OrganizationIdentifier {
            scheme: group("scheme").ok_or(ParseError)?,
            country: group("country").ok_or(ParseError)?,
            state_province: group("state_province"),
            reference: group("reference"),
        })
    }
}

/// Returns the decoded value of an organizationIdentifier AttributeValue.
fn organization_identifier_value(node: Node<'_>) -> Option<&str> {
    if node.is_attribute_value_of(&oid::AT_ORGANIZATION_IDENTIFIER) {
        value_string(node)
    }
    else {
        None
    }
}


//------------ ParseError ----------------------------------------------------

/// A value isn’t a valid organization identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid organization identifier")
    }
}

impl std::error::Error for ParseError { }


//------------ SchemeAllowance -----------------------------------------------

/// What a registration scheme allows for the elements of an identifier.
#[derive(Clone, Copy, Debug)]
pub struct SchemeAllowance {
    /// The country codes the scheme can be used with.
    pub country_codes: &'static [&'static str],

    /// Whether the state or province element is used.
    pub state_province: Rfc2119Word,

    /// Whether the reference element is used.
    pub reference: Rfc2119Word,
}


//------------ OrganizationIdentifierAttributeValidator ----------------------

/// Checks organization identifiers against their registration scheme.
pub struct OrganizationIdentifierAttributeValidator {
    schemes: Vec<(&'static str, SchemeAllowance)>,
    reference_prohibited: Finding,
    findings: Vec<Finding>,
}

impl OrganizationIdentifierAttributeValidator {
    pub const INVALID_FORMAT: Finding = Finding::new(
        Severity::Error, "cabf.invalid_organization_identifier_format"
    );
    pub const INVALID_REGISTRATION_SCHEME: Finding = Finding::new(
        Severity::Error,
        "cabf.invalid_organization_identifier_registration_scheme"
    );
    pub const INVALID_COUNTRY: Finding = Finding::new(
        Severity::Error, "cabf.invalid_organization_identifier_country"
    );
    pub const STATE_PROVINCE_PROHIBITED: Finding = Finding::new(
        Severity::Error,
        "cabf.invalid_subject_organization_identifier_state_province_for_scheme"
    );
    pub const STATE_PROVINCE_MISSING: Finding = Finding::new(
        Severity::Error,
        "cabf.organization_identifier_state_province_missing_for_scheme"
    );
    pub const REFERENCE_MISSING: Finding = Finding::new(
        Severity::Error,
        "cabf.invalid_subject_organization_identifier_reference_missing_for_scheme"
    );

    /// Creates a validator for the given schemes.
    ///
    /// Because requirements differ, the finding for a reference present
    /// for a scheme that prohibits it has to be given.
    pub fn new(
        schemes: Vec<(&'static str, SchemeAllowance)>,
        reference_prohibited: Finding,
    ) -> Self {
        OrganizationIdentifierAttributeValidator {
            schemes,
            reference_prohibited,
            findings: vec![
                Self::INVALID_FORMAT,
                Self::INVALID_REGISTRATION_SCHEME,
                Self::INVALID_COUNTRY,
                Self::STATE_PROVINCE_PROHIBITED,
                Self::STATE_PROVINCE_MISSING,
                Self::REFERENCE_MISSING,
                reference_prohibited,
            ],
        }
    }

    fn check(
        &self, value: &str
    ) -> Result<Vec<FindingDescription>, FindingDescription> {
        let parsed = OrganizationIdentifier::parse(value).map_err(|_| {
            Self::INVALID_FORMAT.with_message(format!(
                "Invalid organization identifier format: \"{}\"", value
            ))
        })?;
        let allowance = self.schemes.iter().find_map(|(scheme, allowance)| {
            if *scheme == parsed.scheme { Some(allowance) } else { None }
        }).ok_or_else(|| {
            Self::INVALID_REGISTRATION_SCHEME.with_message(format!(
                "Invalid registration scheme: \"{}\"", parsed.scheme
            ))
        })?;

        let mut res = Vec::new();
        if !allowance.country_codes.contains(&parsed.country.as_str()) {
            res.push(Self::INVALID_COUNTRY.with_message(format!(
                "Invalid country code for scheme \"{}\": \"{}\"",
                parsed.scheme, parsed.country
            )))
        }
        match (allowance.state_province, parsed.state_province.as_ref()) {
            (Rfc2119Word::ShallNot, Some(state)) => {
                res.push(Self::STATE_PROVINCE_PROHIBITED.with_message(
                    format!(
                        "State or province \"{}\" present for scheme \"{}\"",
                        state, parsed.scheme
                    )
                ))
            }
            (Rfc2119Word::Shall, None) => {
                res.push(Self::STATE_PROVINCE_MISSING.with_message(format!(
                    "State or province missing for scheme \"{}\"",
                    parsed.scheme
                )))
            }
            _ => { }
        }
        match (allowance.reference, parsed.reference.as_ref()) {
            (Rfc2119Word::ShallNot, Some(reference)) => {
                res.push(self.reference_prohibited.with_message(format!(
                    "Reference \"{}\" present for scheme \"{}\"",
                    reference, parsed.scheme
                )))
            }
            (Rfc2119Word::Shall, None) => {
                res.push(Self::REFERENCE_MISSING.with_message(format!(
                    "Reference missing for scheme \"{}\"", parsed.scheme
                )))
            }
            _ => { }
        }
        Ok(res)
    }
}

impl Validator for OrganizationIdentifierAttributeValidator {
    fn name(&self) -> &'static str {
        "OrganizationIdentifierAttributeValidator"
    }

    fn findings(&self) -> &[Finding] {
        &self.findings
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.is_attribute_value_of(&oid::AT_ORGANIZATION_IDENTIFIER)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        match organization_identifier_value(node) {
            Some(value) => self.check(value),
            None => Ok(Vec::new())
        }
    }
}


//------------ OrganizationIdentifierLeiValidator ----------------------------

/// Checks the reference of organization identifiers using the LEI scheme.
///
/// The reference must be a Legal Entity Identifier as defined in ISO 17442:
/// 18 alphanumeric characters followed by two check digits verified with
/// ISO 7064 MOD 97-10.
pub struct OrganizationIdentifierLeiValidator;

impl OrganizationIdentifierLeiValidator {
    pub const INVALID_LEI: Finding = Finding::new(
        Severity::Error, "cabf.invalid_organization_identifier_lei"
    );

    pub const SCHEME: &'static str = "LEI";
}

impl Validator for OrganizationIdentifierLeiValidator {
    fn name(&self) -> &'static str {
        "OrganizationIdentifierLeiValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::INVALID_LEI]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.is_attribute_value_of(&oid::AT_ORGANIZATION_IDENTIFIER)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let parsed = match organization_identifier_value(node).and_then(
            |value| OrganizationIdentifier::parse(value).ok()
        ) {
            Some(parsed) => parsed,
            None => return Ok(Vec::new())
        };
        if parsed.scheme != Self::SCHEME {
            return Ok(Vec::new())
        }
        match parsed.reference {
            Some(reference) if !is_valid_lei(&reference) => {
                Err(Self::INVALID_LEI.with_message(format!(
                    "Invalid LEI: \"{}\"", reference
                )))
            }
            _ => Ok(Vec::new())
        }
    }
}

/// Returns whether a string is a valid Legal Entity Identifier.
pub fn is_valid_lei(lei: &str) -> bool {
    let lei = lei.as_bytes();
    if lei.len() != 20
        || !lei.iter().all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase())
        || !lei[18..].iter().all(|ch| ch.is_ascii_digit())
    {
        return false
    }
    let remainder = lei.iter().fold(0u32, |acc, &ch| {
        if ch.is_ascii_digit() {
            (acc * 10 + u32::from(ch - b'0')) % 97
        }
        else {
            (acc * 100 + u32::from(ch - b'A') + 10) % 97
        }
    });
    remainder == 1
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_identifiers() {
        assert_eq!(
            OrganizationIdentifier::parse("NTRUS+CA-12345").unwrap(),
            OrganizationIdentifier {
                scheme: "NTR".into(),
                country: "US".into(),
                state_province: Some("CA".into()),
                reference: Some("12345".into()),
            }
        );
        let parsed = OrganizationIdentifier::parse("GOVDE").unwrap();
        assert_eq!(parsed.country, "DE");
        assert_eq!(parsed.reference, None);
        let parsed = OrganizationIdentifier::parse(
            "LEIXG-5493001KJTIIGC8Y1R12"
        ).unwrap();
        assert_eq!(parsed.reference.as_deref(), Some("5493001KJTIIGC8Y1R12"));
        assert!(OrganizationIdentifier::parse("VATde-123").is_err());
        assert!(OrganizationIdentifier::parse("VA-123").is_err());
        assert!(OrganizationIdentifier::parse("").is_err());
    }

    #[test]
    fn lei_checksum() {
        assert!(is_valid_lei("5493001KJTIIGC8Y1R12"));
        assert!(is_valid_lei("529900T8BM49AURSDO55"));
        assert!(!is_valid_lei("5493001KJTIIGC8Y1R13"));
        assert!(!is_valid_lei("5493001KJTIIGC8Y1R1"));
        assert!(!is_valid_lei("5493001kjtiigc8y1r12"));
    }

    #[test]
    fn country_codes() {
        assert_eq!(ISO3166_1_COUNTRY_CODES.len(), 249);
        assert!(ISO3166_1_COUNTRY_CODES.contains(&"DE"));
        assert!(!ISO3166_1_COUNTRY_CODES.contains(&COUNTRY_CODE_GLOBAL_SCHEME));
        assert!(
            ISO3166_1_COUNTRY_CODES.windows(2).all(|pair| pair[0] < pair[1])
        );
    }
}
