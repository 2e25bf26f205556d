//! The attribute tables for subscriber certificate subjects.

use bcder::ConstOid;
use crate::oid;
use crate::pkix::Rfc2119Word::{self, May, Shall, ShallNot};
use super::{Generation, ValidationLevel};


/// A row of an attribute table.
///
/// The requirement is given for the legacy, multipurpose, and strict
/// generations in that order.
pub type AttributeRow = (ConstOid, [Rfc2119Word; 3]);

const MAILBOX_ATTRIBUTES: &[AttributeRow] = &[
    (oid::AT_COMMON_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_ORGANIZATIONAL_UNIT_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_ORGANIZATION_IDENTIFIER, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_GIVEN_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_SURNAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_PSEUDONYM, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_SERIAL_NUMBER, [May, May, May]),
    (oid::EMAIL_ADDRESS, [May, May, May]),
    (oid::AT_TITLE, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_STREET_ADDRESS, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_LOCALITY_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_STATE_OR_PROVINCE_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_POSTAL_CODE, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_COUNTRY_NAME, [ShallNot, ShallNot, ShallNot]),
];

const ORGANIZATION_ATTRIBUTES: &[AttributeRow] = &[
    (oid::AT_COMMON_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_NAME, [Shall, Shall, Shall]),
    (oid::AT_ORGANIZATIONAL_UNIT_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_IDENTIFIER, [Shall, Shall, Shall]),
    (oid::AT_GIVEN_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_SURNAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_PSEUDONYM, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_SERIAL_NUMBER, [May, May, May]),
    (oid::EMAIL_ADDRESS, [May, May, May]),
    (oid::AT_TITLE, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_STREET_ADDRESS, [May, May, ShallNot]),
    (oid::AT_LOCALITY_NAME, [May, May, May]),
    (oid::AT_STATE_OR_PROVINCE_NAME, [May, May, May]),
    (oid::AT_POSTAL_CODE, [May, May, ShallNot]),
    (oid::AT_COUNTRY_NAME, [May, May, May]),
];

const SPONSORED_ATTRIBUTES: &[AttributeRow] = &[
    (oid::AT_COMMON_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_NAME, [Shall, Shall, Shall]),
    (oid::AT_ORGANIZATIONAL_UNIT_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_IDENTIFIER, [Shall, Shall, Shall]),
    (oid::AT_GIVEN_NAME, [May, May, May]),
    (oid::AT_SURNAME, [May, May, May]),
    (oid::AT_PSEUDONYM, [May, May, May]),
    (oid::AT_SERIAL_NUMBER, [May, May, May]),
    (oid::EMAIL_ADDRESS, [May, May, May]),
    (oid::AT_TITLE, [May, May, May]),
    (oid::AT_STREET_ADDRESS, [May, May, ShallNot]),
    (oid::AT_LOCALITY_NAME, [May, May, May]),
    (oid::AT_STATE_OR_PROVINCE_NAME, [May, May, May]),
    (oid::AT_POSTAL_CODE, [May, May, ShallNot]),
    (oid::AT_COUNTRY_NAME, [May, May, May]),
];

const INDIVIDUAL_ATTRIBUTES: &[AttributeRow] = &[
    (oid::AT_COMMON_NAME, [May, May, May]),
    (oid::AT_ORGANIZATION_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_ORGANIZATIONAL_UNIT_NAME, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_ORGANIZATION_IDENTIFIER, [ShallNot, ShallNot, ShallNot]),
    (oid::AT_GIVEN_NAME, [May, May, May]),
    (oid::AT_SURNAME, [May, May, May]),
    (oid::AT_PSEUDONYM, [May, May, May]),
    (oid::AT_SERIAL_NUMBER, [May, May, May]),
    (oid::EMAIL_ADDRESS, [May, May, May]),
    (oid::AT_TITLE, [May, May, May]),
    (oid::AT_STREET_ADDRESS, [May, May, ShallNot]),
    (oid::AT_LOCALITY_NAME, [May, May, May]),
    (oid::AT_STATE_OR_PROVINCE_NAME, [May, May, May]),
    (oid::AT_POSTAL_CODE, [May, May, ShallNot]),
    (oid::AT_COUNTRY_NAME, [May, May, May]),
];

const PERSONAL_NAME_ATTRIBUTES: &[ConstOid] = &[
    oid::AT_GIVEN_NAME, oid::AT_SURNAME, oid::AT_PSEUDONYM,
];

const LEGACY_PERSONAL_NAME_ATTRIBUTES: &[ConstOid] = &[
    oid::AT_GIVEN_NAME, oid::AT_SURNAME, oid::AT_PSEUDONYM,
    oid::AT_COMMON_NAME,
];

/// Attributes that require at least one of a set of other attributes.
pub const ATTRIBUTE_DEPENDENCIES: &[(ConstOid, &[ConstOid])] = &[
    (
        oid::AT_STREET_ADDRESS,
        &[oid::AT_LOCALITY_NAME, oid::AT_STATE_OR_PROVINCE_NAME]
    ),
    (oid::AT_STATE_OR_PROVINCE_NAME, &[oid::AT_COUNTRY_NAME]),
    (oid::AT_LOCALITY_NAME, &[oid::AT_COUNTRY_NAME]),
    (oid::AT_POSTAL_CODE, &[oid::AT_COUNTRY_NAME]),
];

/// Returns the attribute table for a validation level.
pub fn attribute_table(level: ValidationLevel) -> &'static [AttributeRow] {
    match level {
        ValidationLevel::Mailbox => MAILBOX_ATTRIBUTES,
        ValidationLevel::Organization => ORGANIZATION_ATTRIBUTES,
        ValidationLevel::Sponsored => SPONSORED_ATTRIBUTES,
        ValidationLevel::Individual => INDIVIDUAL_ATTRIBUTES,
    }
}

/// Returns the requirement for each attribute of a profile.
pub fn attribute_requirements(
    level: ValidationLevel, generation: Generation
) -> impl Iterator<Item = (ConstOid, Rfc2119Word)> {
    attribute_table(level).iter().map(move |(attr_type, words)| {
        (attr_type.clone(), words[generation.index()])
    })
}

/// Returns whether attributes not in the table are allowed.
pub fn allows_other_attributes(
    level: ValidationLevel, generation: Generation
) -> bool {
    level != ValidationLevel::Mailbox && generation == Generation::Legacy
}

/// Returns the attributes of which at least one has to be present.
pub fn required_one_of(
    level: ValidationLevel, generation: Generation
) -> Option<&'static [ConstOid]> {
    if !level.is_personal() {
        None
    }
    else if generation == Generation::Legacy {
        Some(LEGACY_PERSONAL_NAME_ATTRIBUTES)
    }
    else {
        Some(PERSONAL_NAME_ATTRIBUTES)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_are_named() {
        for level in [
            ValidationLevel::Mailbox, ValidationLevel::Organization,
            ValidationLevel::Sponsored, ValidationLevel::Individual,
        ] {
            assert_eq!(attribute_table(level).len(), 15);
            for (attr_type, _) in attribute_table(level) {
                assert!(oid::name(attr_type).is_some());
            }
        }
    }

    #[test]
    fn strict_drops_postal_address() {
        let strict: Vec<_> = attribute_requirements(
            ValidationLevel::Organization, Generation::Strict
        ).filter(|(_, word)| *word == ShallNot).map(|(attr_type, _)| {
            attr_type
        }).collect();
        assert!(strict.contains(&oid::AT_STREET_ADDRESS));
        assert!(strict.contains(&oid::AT_POSTAL_CODE));
        assert!(!attribute_requirements(
            ValidationLevel::Organization, Generation::Multipurpose
        ).any(|(attr_type, word)| {
            attr_type == oid::AT_POSTAL_CODE && word == ShallNot
        }));
    }

    #[test]
    fn other_attributes_and_one_of() {
        assert!(!allows_other_attributes(
            ValidationLevel::Mailbox, Generation::Legacy
        ));
        assert!(allows_other_attributes(
            ValidationLevel::Individual, Generation::Legacy
        ));
        assert!(!allows_other_attributes(
            ValidationLevel::Individual, Generation::Multipurpose
        ));
        assert_eq!(
            required_one_of(
                ValidationLevel::Sponsored, Generation::Legacy
            ).map(|oids| oids.len()),
            Some(4)
        );
        assert_eq!(
            required_one_of(
                ValidationLevel::Individual, Generation::Strict
            ).map(|oids| oids.len()),
            Some(3)
        );
        assert!(required_one_of(
            ValidationLevel::Organization, Generation::Legacy
        ).is_none());
    }
}
