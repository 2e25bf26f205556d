//! Name rules shared by the CA/Browser Forum requirements.

use crate::oid;
use crate::document::{Node, PduKind};
use crate::org_id::ISO3166_1_COUNTRY_CODES;
use crate::pkix::name::value_string;
use crate::validation::{
    Finding, Severity, Validator, ValidatorResult,
};


//------------ ValidCountryValidator -----------------------------------------

/// Checks that countryName attributes contain a known country code.
///
/// Besides the ISO 3166-1 alpha-2 codes, the user-assigned code `XX` is
/// allowed for subjects not associated with a country.
pub struct ValidCountryValidator;

impl ValidCountryValidator {
    pub const INVALID_COUNTRY_CODE: Finding = Finding::new(
        Severity::Error, "cabf.invalid_country_code"
    );

    pub const UNKNOWN_COUNTRY: &'static str = "XX";
}

impl Validator for ValidCountryValidator {
    fn name(&self) -> &'static str {
        "ValidCountryValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::INVALID_COUNTRY_CODE]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.is_attribute_value_of(&oid::AT_COUNTRY_NAME)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let value = match value_string(node) {
            Some(value) => value,
            None => return Ok(Vec::new())
        };
        if value == Self::UNKNOWN_COUNTRY
            || ISO3166_1_COUNTRY_CODES.contains(&value)
        {
            Ok(Vec::new())
        }
        else {
            Err(Self::INVALID_COUNTRY_CODE.with_message(format!(
                "Invalid country code: \"{}\"", value
            )))
        }
    }
}


//------------ RelativeDistinguishedNameContainsOneElementValidator ----------

/// Warns about multi-valued relative distinguished names.
pub struct RelativeDistinguishedNameContainsOneElementValidator;

impl RelativeDistinguishedNameContainsOneElementValidator {
    pub const MULTIPLE_ATVS: Finding = Finding::new(
        Severity::Warning, "cabf.rdn_contains_multiple_atvs"
    );
}

impl Validator for RelativeDistinguishedNameContainsOneElementValidator {
    fn name(&self) -> &'static str {
        "RelativeDistinguishedNameContainsOneElementValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::MULTIPLE_ATVS]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::RelativeDistinguishedName]
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        if node.children().count() > 1 {
            Err(Self::MULTIPLE_ATVS.describe())
        }
        else {
            Ok(Vec::new())
        }
    }
}


//------------ SignificantAttributeValueValidator ----------------------------

/// Rejects attribute values that consist of metadata only.
///
/// A value is considered insignificant if it is empty or contains nothing
/// but white space and punctuation, such as `"-"` or `" . "`.
pub struct SignificantAttributeValueValidator;

impl SignificantAttributeValueValidator {
    pub const INSIGNIFICANT_VALUE: Finding = Finding::new(
        Severity::Error, "cabf.insignificant_attribute_value_present"
    );
}

impl Validator for SignificantAttributeValueValidator {
    fn name(&self) -> &'static str {
        "SignificantAttributeValueValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::INSIGNIFICANT_VALUE]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let value = match value_string(node) {
            Some(value) => value,
            None => return Ok(Vec::new())
        };
        if is_significant(value) {
            return Ok(Vec::new())
        }
        let attr_type = node.parent().and_then(|atv| atv.attribute_type());
        Err(Self::INSIGNIFICANT_VALUE.with_message(match attr_type {
            Some(attr_type) => format!(
                "Attribute {} has insignificant value \"{}\"",
                attr_type, value
            ),
            None => format!("Insignificant value \"{}\"", value),
        }))
    }
}

fn is_significant(value: &str) -> bool {
    value.chars().any(|ch| {
        !ch.is_whitespace() && !ch.is_ascii_punctuation()
    })
}


//============ Tests =========================================================
