//! The CA/Browser Forum S/MIME Baseline Requirements.
//!
//! The requirements define certificate profiles along two axes. The
//! [`ValidationLevel`] states what was validated about the subject, the
//! [`Generation`] how strictly the profile is applied. Together they form
//! a [`Profile`] which selects the rules for the subject of a subscriber
//! certificate.
//!
//! Use [`create_subscriber_certificate_subject_validator_container`] to
//! get all the rules for a profile.

use std::{error, fmt, str};
use crate::cabf;
use crate::document::PduKind;
use crate::org_id::OrganizationIdentifierLeiValidator;
use crate::validation::{Predicate, ValidatorContainer};
use self::name::{
    CommonNameValidator, OrganizationIdentifierCountryNameConsistentValidator,
    SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
    SubscriberAttributeDependencyValidator, SubscriberSubjectValidator,
};

pub mod name;
mod policy;


//------------ ValidationLevel -----------------------------------------------

/// What has been validated about the subject of a certificate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValidationLevel {
    /// Only control over the mailbox.
    Mailbox,

    /// The identity of an organization.
    Organization,

    /// An individual affiliated with a validated organization.
    Sponsored,

    /// The identity of an individual.
    Individual,
}

impl ValidationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationLevel::Mailbox => "mailbox",
            ValidationLevel::Organization => "organization",
            ValidationLevel::Sponsored => "sponsored",
            ValidationLevel::Individual => "individual",
        }
    }

    /// Returns whether the level describes a natural person.
    pub fn is_personal(self) -> bool {
        matches!(
            self, ValidationLevel::Sponsored | ValidationLevel::Individual
        )
    }
}

impl str::FromStr for ValidationLevel {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mailbox" => Ok(ValidationLevel::Mailbox),
            "organization" => Ok(ValidationLevel::Organization),
            "sponsored" => Ok(ValidationLevel::Sponsored),
            "individual" => Ok(ValidationLevel::Individual),
            _ => Err(ParseProfileError::BAD_LEVEL)
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Generation ----------------------------------------------------

/// The generation of a profile.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Generation {
    Legacy,
    Multipurpose,
    Strict,
}

impl Generation {
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Multipurpose => "multipurpose",
            Generation::Strict => "strict",
        }
    }

    /// Returns the column of the generation in the policy tables.
    fn index(self) -> usize {
        match self {
            Generation::Legacy => 0,
            Generation::Multipurpose => 1,
            Generation::Strict => 2,
        }
    }
}

impl str::FromStr for Generation {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Generation::Legacy),
            "multipurpose" => Ok(Generation::Multipurpose),
            "strict" => Ok(Generation::Strict),
            _ => Err(ParseProfileError::BAD_GENERATION)
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Profile -------------------------------------------------------

/// A certificate profile.
///
/// The string representation is the validation level and the generation
/// joined by a hyphen, e.g., `"mailbox-legacy"` or `"organization-strict"`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub level: ValidationLevel,
    pub generation: Generation,
}

impl Profile {
    pub fn new(level: ValidationLevel, generation: Generation) -> Self {
        Profile { level, generation }
    }
}

impl str::FromStr for Profile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, generation) = s.split_once('-').ok_or(
            ParseProfileError::MISSING_GENERATION
        )?;
        Ok(Profile::new(level.parse()?, generation.parse()?))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.level, self.generation)
    }
}


//------------ ParseProfileError ---------------------------------------------

/// A string didn’t describe a profile.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseProfileError(&'static str);

impl ParseProfileError {
    const BAD_LEVEL: Self = ParseProfileError("unknown validation level");
    const BAD_GENERATION: Self = ParseProfileError("unknown generation");
    const MISSING_GENERATION: Self = ParseProfileError("missing generation");
}

impl fmt::Display for ParseProfileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl error::Error for ParseProfileError { }


//------------ Container factory ---------------------------------------------

/// Creates the container with all rules for the subject of a certificate.
///
/// The container applies to the subject name only. The issuer and names
/// inside extensions are left alone.
pub fn create_subscriber_certificate_subject_validator_container(
    profile: Profile
) -> ValidatorContainer {
    ValidatorContainer::new("subscriber certificate subject")
        .with_shapes(&[PduKind::Name])
        .with_predicate(
            Predicate::path_is_not("certificate.tbsCertificate.issuer")
        )
        .with_predicate(
            Predicate::not_within("certificate.tbsCertificate.extensions")
        )
        .with_validator(SubscriberSubjectValidator::new(profile))
        .with_validator(SubscriberAttributeDependencyValidator)
        .with_validator(
            SubjectAlternativeNameContainsSubjectEmailAddressesValidator
        )
        .with_validator(cabf::ValidCountryValidator)
        .with_validator(CommonNameValidator::new(profile))
        .with_validator(name::organization_identifier_validator())
        .with_validator(OrganizationIdentifierLeiValidator)
        .with_validator(OrganizationIdentifierCountryNameConsistentValidator)
        .with_validator(
            cabf::RelativeDistinguishedNameContainsOneElementValidator
        )
        .with_validator(cabf::SignificantAttributeValueValidator)
}


//============ Tests =========================================================
