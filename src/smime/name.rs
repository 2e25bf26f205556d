//! Validators for the subject of subscriber certificates.

use std::sync::LazyLock;
use bcder::ConstOid;
use regex::Regex;
use crate::oid;
use crate::document::{Node, PduKind};
use crate::org_id::{
    COUNTRY_CODE_GLOBAL_SCHEME, GLOBAL_SCHEME_COUNTRY_CODES,
    ISO3166_1_COUNTRY_CODES, OrganizationIdentifier,
    OrganizationIdentifierAttributeValidator, SchemeAllowance,
};
use crate::pkix::Rfc2119Word;
use crate::pkix::general_name::get_email_addresses_from_san;
use crate::pkix::name::{
    attribute_types, contains_type, get_name_attributes_by_type, parent_name,
    string_value, value_string,
};
use crate::validation::{
    Finding, Severity, Validator, ValidatorResult,
};
use super::{policy, Profile, ValidationLevel, Generation};


/// The path of the issuer’s RDNSequence.
const ISSUER_RDN_SEQUENCE: &str =
    "certificate.tbsCertificate.issuer.rdnSequence";


//------------ SubscriberSubjectValidator ------------------------------------

/// Checks the attribute types present in the subject against a profile.
pub struct SubscriberSubjectValidator {
    /// The required attributes with their names.
    required: Vec<(ConstOid, &'static str)>,

    /// The prohibited attributes.
    prohibited: Vec<ConstOid>,

    /// All attributes listed in the table.
    known: Vec<ConstOid>,

    /// At least one of these attributes must be present.
    required_one_of: Option<&'static [ConstOid]>,

    /// Are attributes not in the table allowed?
    allow_other: bool,
}

impl SubscriberSubjectValidator {
    pub const MISSING_ATTRIBUTE: Finding = Finding::new(
        Severity::Error, "cabf.smime.missing_required_attribute"
    );
    pub const PROHIBITED_ATTRIBUTE: Finding = Finding::new(
        Severity::Error, "cabf.smime.prohibited_attribute"
    );
    pub const MIXED_NAME_AND_PSEUDONYM: Finding = Finding::new(
        Severity::Error, "cabf.smime.mixed_name_and_pseudonym_attributes"
    );

    /// Creates the validator for a profile.
    ///
    /// # Panics
    ///
    /// The function panics if a required attribute has no name. This is an
    /// error in the attribute tables.
    pub fn new(profile: Profile) -> Self {
        let mut required = Vec::new();
        let mut prohibited = Vec::new();
        let mut known = Vec::new();
        for (attr_type, word) in policy::attribute_requirements(
            profile.level, profile.generation
        ) {
            match word {
                Rfc2119Word::Shall => {
                    let name = oid::name(&attr_type).unwrap_or_else(|| {
                        panic!("required attribute {} has no name", attr_type)
                    });
                    required.push((attr_type.clone(), name))
                }
                Rfc2119Word::ShallNot => prohibited.push(attr_type.clone()),
                Rfc2119Word::May => { }
            }
            known.push(attr_type);
        }
        SubscriberSubjectValidator {
            required,
            prohibited,
            known,
            required_one_of: policy::required_one_of(
                profile.level, profile.generation
            ),
            allow_other: policy::allows_other_attributes(
                profile.level, profile.generation
            ),
        }
    }
}

impl Validator for SubscriberSubjectValidator {
    fn name(&self) -> &'static str {
        "SubscriberSubjectValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[
            Self::PROHIBITED_ATTRIBUTE,
            Self::MISSING_ATTRIBUTE,
            Self::MIXED_NAME_AND_PSEUDONYM,
        ]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::RdnSequence]
    }

    fn matches(&self, node: Node) -> bool {
        node.path() != ISSUER_RDN_SEQUENCE
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let attributes = attribute_types(node);
        let mut res = Vec::new();

        for (attr_type, name) in &self.required {
            if !contains_type(&attributes, attr_type) {
                res.push(Self::MISSING_ATTRIBUTE.with_message(*name))
            }
        }

        if let Some(one_of) = self.required_one_of {
            if !one_of.iter().any(|item| contains_type(&attributes, item)) {
                res.push(Self::MISSING_ATTRIBUTE.with_message(format!(
                    "Missing one of these required attributes: {}",
                    oid::format_oids(one_of)
                )))
            }
        }

        for attr_type in &self.prohibited {
            if contains_type(&attributes, attr_type) {
                res.push(Self::PROHIBITED_ATTRIBUTE.with_message(format!(
                    "Prohibited attribute: {}", attr_type
                )))
            }
        }

        if contains_type(&attributes, &oid::AT_PSEUDONYM)
            && (
                contains_type(&attributes, &oid::AT_GIVEN_NAME)
                || contains_type(&attributes, &oid::AT_SURNAME)
            )
        {
            res.push(Self::MIXED_NAME_AND_PSEUDONYM.describe())
        }

        if !self.allow_other {
            for attr_type in &attributes {
                if !self.known.iter().any(|known| known == *attr_type) {
                    res.push(Self::PROHIBITED_ATTRIBUTE.with_message(format!(
                        "Prohibited other attribute: {}", attr_type
                    )))
                }
            }
        }

        Ok(res)
    }
}


//------------ SubscriberAttributeDependencyValidator ------------------------

/// Checks that attributes are accompanied by the attributes they refine.
///
/// A street address, for instance, is meaningless without a locality or
/// state. Only the first unmet dependency is reported.
pub struct SubscriberAttributeDependencyValidator;

impl SubscriberAttributeDependencyValidator {
    pub const MISSING_REQUIRED_ATTRIBUTE: Finding = Finding::new(
        Severity::Error,
        "cabf.smime.required_attribute_missing_for_dependent_attribute"
    );
}

impl Validator for SubscriberAttributeDependencyValidator {
    fn name(&self) -> &'static str {
        "SubscriberAttributeDependencyValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::MISSING_REQUIRED_ATTRIBUTE]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::RdnSequence]
    }

    fn matches(&self, node: Node) -> bool {
        node.path() != ISSUER_RDN_SEQUENCE
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let attributes = attribute_types(node);
        for (dependent, required) in policy::ATTRIBUTE_DEPENDENCIES {
            if !contains_type(&attributes, dependent)
                || required.iter().any(|item| contains_type(&attributes, item))
            {
                continue
            }
            let oids = oid::format_oids(*required);
            return Err(Self::MISSING_REQUIRED_ATTRIBUTE.with_message(
                if required.len() > 1 {
                    format!(
                        "{} is present but one of {} is not present",
                        dependent, oids
                    )
                }
                else {
                    format!(
                        "{} is present but {} is not present", dependent, oids
                    )
                }
            ))
        }
        Ok(Vec::new())
    }
}


//------------ SubjectAlternativeNameContainsSubjectEmailAddressesValidator --

/// Checks that email addresses in attributes also appear in the SAN.
///
/// The emailAddress attribute itself is left to other rules.
pub struct SubjectAlternativeNameContainsSubjectEmailAddressesValidator;

impl SubjectAlternativeNameContainsSubjectEmailAddressesValidator {
    pub const EMAIL_ADDRESS_NOT_IN_SAN: Finding = Finding::new(
        Severity::Error, "cabf.smime.email_address_in_attribute_not_in_san"
    );
    pub const UNPARSED_ATTRIBUTE: Finding = Finding::new(
        Severity::Notice, "cabf.smime.unparsed_attribute_value_encountered"
    );
}

impl Validator for SubjectAlternativeNameContainsSubjectEmailAddressesValidator {
    fn name(&self) -> &'static str {
        "SubjectAlternativeNameContainsSubjectEmailAddressesValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::EMAIL_ADDRESS_NOT_IN_SAN, Self::UNPARSED_ATTRIBUTE]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeTypeAndValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.attribute_type().map(|attr_type| {
            *attr_type != oid::EMAIL_ADDRESS
        }).unwrap_or(false)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let attr_type = match node.attribute_type() {
            Some(attr_type) => attr_type,
            None => return Ok(Vec::new())
        };
        let value = string_value(node).ok_or_else(|| {
            Self::UNPARSED_ATTRIBUTE.with_message(format!(
                "Unparsed attribute {} encountered", attr_type
            ))
        })?;
        if is_email_address(value)
            && !get_email_addresses_from_san(node.document()).contains(&value)
        {
            return Err(Self::EMAIL_ADDRESS_NOT_IN_SAN.with_message(format!(
                "Attribute {} with value \"{}\" not found in SAN",
                attr_type, value
            )))
        }
        Ok(Vec::new())
    }
}

static EMAIL_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+",
        r"(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
        r"[A-Za-z]{2,63}$",
    )).unwrap()
});

/// Returns whether a string is a syntactically valid email address.
pub fn is_email_address(value: &str) -> bool {
    EMAIL_ADDRESS_RE.is_match(value)
}


//------------ CommonNameValidator -------------------------------------------

/// Checks that the common name is taken from another part of the subject.
///
/// Depending on the validation level, the common name may repeat a
/// personal name, a pseudonym, or the organization name. It may always be
/// one of the email addresses of the subject alternative name.
pub struct CommonNameValidator {
    profile: Profile,
}

impl CommonNameValidator {
    pub const UNKNOWN_VALUE_SOURCE: Finding = Finding::new(
        Severity::Error, "cabf.smime.common_name_value_unknown_source"
    );
    pub const UNPARSED_VALUE: Finding = Finding::new(
        Severity::Notice, "cabf.smime.unparsed_common_name_value"
    );

    pub fn new(profile: Profile) -> Self {
        CommonNameValidator { profile }
    }

    /// Returns whether the value is justified by the rest of the name.
    fn is_justified_by_name(&self, name: Option<Node>, value: &str) -> bool {
        let has_value = |attr_type: &ConstOid| {
            name.map(|name| {
                get_name_attributes_by_type(name, attr_type).into_iter().any(
                    |(atv, _)| string_value(atv) == Some(value)
                )
            }).unwrap_or(false)
        };
        let has_type = |attr_type: &ConstOid| {
            name.map(|name| {
                !get_name_attributes_by_type(name, attr_type).is_empty()
            }).unwrap_or(false)
        };

        match self.profile.level {
            ValidationLevel::Sponsored | ValidationLevel::Individual => {
                // Legacy profiles allow any personal name.
                self.profile.generation == Generation::Legacy
                    || has_value(&oid::AT_PSEUDONYM)
                    || has_type(&oid::AT_GIVEN_NAME)
                    || has_type(&oid::AT_SURNAME)
            }
            ValidationLevel::Organization => {
                has_value(&oid::AT_ORGANIZATION_NAME)
            }
            ValidationLevel::Mailbox => false,
        }
    }
}

impl Validator for CommonNameValidator {
    fn name(&self) -> &'static str {
        "CommonNameValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::UNKNOWN_VALUE_SOURCE, Self::UNPARSED_VALUE]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.is_attribute_value_of(&oid::AT_COMMON_NAME)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let value = value_string(node).ok_or_else(|| {
            Self::UNPARSED_VALUE.describe()
        })?;
        if self.is_justified_by_name(parent_name(node), value)
            || get_email_addresses_from_san(node.document()).contains(&value)
        {
            Ok(Vec::new())
        }
        else {
            Err(Self::UNKNOWN_VALUE_SOURCE.with_message(format!(
                "Unknown CN value source: \"{}\"", value
            )))
        }
    }
}


//------------ Organization identifiers --------------------------------------

/// A reference is present for a scheme that doesn’t use one.
pub const PROHIBITED_ORGANIZATION_IDENTIFIER_REFERENCE: Finding = Finding::new(
    Severity::Error,
    "cabf.smime.prohibited_organization_identifier_reference_present_for_scheme"
);

/// Creates the validator for the registration schemes of S/MIME subjects.
pub fn organization_identifier_validator(
) -> OrganizationIdentifierAttributeValidator {
    OrganizationIdentifierAttributeValidator::new(
        vec![
            ("LEI", SchemeAllowance {
                country_codes: GLOBAL_SCHEME_COUNTRY_CODES,
                state_province: Rfc2119Word::ShallNot,
                reference: Rfc2119Word::Shall,
            }),
            ("GOV", SchemeAllowance {
                country_codes: ISO3166_1_COUNTRY_CODES,
                state_province: Rfc2119Word::May,
                reference: Rfc2119Word::ShallNot,
            }),
            ("INT", SchemeAllowance {
                country_codes: GLOBAL_SCHEME_COUNTRY_CODES,
                state_province: Rfc2119Word::ShallNot,
                reference: Rfc2119Word::ShallNot,
            }),
        ],
        PROHIBITED_ORGANIZATION_IDENTIFIER_REFERENCE,
    )
}


//------------ OrganizationIdentifierCountryNameConsistentValidator ----------

/// Checks that the countryName agrees with the organization identifiers.
///
/// Organization identifiers of global schemes and those that cannot be
/// parsed are skipped.
pub struct OrganizationIdentifierCountryNameConsistentValidator;

impl OrganizationIdentifierCountryNameConsistentValidator {
    pub const INCONSISTENT: Finding = Finding::new(
        Severity::Error,
        "cabf.smime.org_identifier_and_country_name_attribute_inconsistent"
    );
}

impl Validator for OrganizationIdentifierCountryNameConsistentValidator {
    fn name(&self) -> &'static str {
        "OrganizationIdentifierCountryNameConsistentValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::INCONSISTENT]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AttributeValue]
    }

    fn matches(&self, node: Node) -> bool {
        node.is_attribute_value_of(&oid::AT_COUNTRY_NAME)
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let country = match value_string(node) {
            Some(country) => country,
            None => return Ok(Vec::new())
        };
        let org_ids = node.document().get_subject_attributes_by_type(
            &oid::AT_ORGANIZATION_IDENTIFIER
        );
        for (atv, _) in org_ids {
            let parsed = match string_value(atv).and_then(|value| {
                OrganizationIdentifier::parse(value).ok()
            }) {
                Some(parsed) => parsed,
                None => continue
            };
            if parsed.country == COUNTRY_CODE_GLOBAL_SCHEME {
                continue
            }
            if parsed.country != country {
                return Err(Self::INCONSISTENT.with_message(format!(
                    "CountryName attribute value: \"{}\", \
                     OrganizationIdentifier attribute country name \
                     value: \"{}\"",
                    country, parsed.country
                )))
            }
        }
        Ok(Vec::new())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::Document;
    use crate::test::{CertBuilder, SanEntry};
    use crate::validation::{
        validate, FindingDescription, ValidatorContainer,
    };

    fn profile(s: &str) -> Profile {
        s.parse().unwrap()
    }

    fn subject_container(
        validator: impl Validator + 'static
    ) -> ValidatorContainer {
        ValidatorContainer::new("subject")
            .with_shapes(&[PduKind::Name])
            .with_predicate(crate::validation::Predicate::path_is_not(
                "certificate.tbsCertificate.issuer"
            ))
            .with_validator(validator)
    }

    fn run(
        validator: impl Validator + 'static, doc: &Document
    ) -> Vec<FindingDescription> {
        validate(doc, &[subject_container(validator)]).iter().flat_map(
            |result| result.findings().iter().cloned()
        ).collect()
    }

    fn codes(findings: &[FindingDescription]) -> Vec<&'static str> {
        findings.iter().map(|finding| finding.code()).collect()
    }

    fn messages(findings: &[FindingDescription]) -> Vec<String> {
        findings.iter().map(|finding| {
            String::from(finding.message().unwrap_or_default())
        }).collect()
    }

    #[test]
    fn missing_required_attributes() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Example Corp")
            .document();
        let findings = run(
            SubscriberSubjectValidator::new(profile("organization-strict")),
            &doc
        );
        assert_eq!(
            codes(&findings),
            [
                "cabf.smime.missing_required_attribute",
                "cabf.smime.missing_required_attribute",
            ]
        );
        assert_eq!(
            messages(&findings),
            ["organizationName", "organizationIdentifier"]
        );

        let doc = CertBuilder::new()
            .subject_attr(oid::AT_ORGANIZATION_NAME, "Example Corp")
            .subject_attr(
                oid::AT_ORGANIZATION_IDENTIFIER, "LEIXG-5493001KJTIIGC8Y1R12"
            )
            .document();
        assert!(run(
            SubscriberSubjectValidator::new(profile("organization-strict")),
            &doc
        ).is_empty());
    }

    #[test]
    fn prohibited_attributes_in_any_order() {
        let forward = CertBuilder::new()
            .subject_attr(oid::AT_ORGANIZATION_NAME, "Example Corp")
            .subject_attr(oid::AT_STREET_ADDRESS, "Main St 1")
            .subject_attr(oid::AT_POSTAL_CODE, "12345")
            .document();
        let backward = CertBuilder::new()
            .subject_attr(oid::AT_POSTAL_CODE, "12345")
            .subject_attr(oid::AT_STREET_ADDRESS, "Main St 1")
            .subject_attr(oid::AT_ORGANIZATION_NAME, "Example Corp")
            .document();
        for doc in [forward, backward] {
            let findings = run(
                SubscriberSubjectValidator::new(profile("mailbox-strict")),
                &doc
            );
            let mut found = messages(&findings);
            found.sort();
            assert_eq!(
                found,
                [
                    "Prohibited attribute: 2.5.4.10",
                    "Prohibited attribute: 2.5.4.17",
                    "Prohibited attribute: 2.5.4.9",
                ]
            );
        }
    }

    #[test]
    fn other_attributes() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_GIVEN_NAME, "Jane")
            .subject_attr(oid::AT_BUSINESS_CATEGORY, "Private")
            .document();
        let legacy = run(
            SubscriberSubjectValidator::new(profile("individual-legacy")),
            &doc
        );
        assert!(legacy.is_empty());
        let strict = run(
            SubscriberSubjectValidator::new(profile("individual-strict")),
            &doc
        );
        assert_eq!(
            messages(&strict), ["Prohibited other attribute: 2.5.4.15"]
        );
        assert_eq!(codes(&strict), ["cabf.smime.prohibited_attribute"]);
    }

    #[test]
    fn one_of_and_mixed_names() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COUNTRY_NAME, "DE")
            .document();
        let findings = run(
            SubscriberSubjectValidator::new(profile("individual-multipurpose")),
            &doc
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message(),
            Some(
                "Missing one of these required attributes: \
                 givenName (2.5.4.42), surname (2.5.4.4), \
                 pseudonym (2.5.4.65)"
            )
        );

        let doc = CertBuilder::new()
            .subject_attr(oid::AT_PSEUDONYM, "Zorro")
            .subject_attr(oid::AT_SURNAME, "de la Vega")
            .document();
        let findings = run(
            SubscriberSubjectValidator::new(profile("individual-strict")),
            &doc
        );
        assert_eq!(
            codes(&findings),
            ["cabf.smime.mixed_name_and_pseudonym_attributes"]
        );
        assert_eq!(findings[0].message(), None);
    }

    #[test]
    fn issuer_is_ignored() {
        let doc = CertBuilder::new()
            .issuer_attr(oid::AT_ORGANIZATION_NAME, "Example CA")
            .subject_attr(oid::AT_COMMON_NAME, "a@example.com")
            .san(SanEntry::Rfc822("a@example.com"))
            .document();
        assert!(run(
            SubscriberSubjectValidator::new(profile("mailbox-strict")),
            &doc
        ).is_empty());
    }

    #[test]
    fn postal_code_needs_country() {
        let without = CertBuilder::new()
            .subject_attr(oid::AT_POSTAL_CODE, "12345")
            .document();
        let findings = run(SubscriberAttributeDependencyValidator, &without);
        assert_eq!(
            codes(&findings),
            ["cabf.smime.required_attribute_missing_for_dependent_attribute"]
        );
        assert_eq!(
            findings[0].message(),
            Some(
                "2.5.4.17 is present but countryName (2.5.4.6) is not present"
            )
        );

        let with = CertBuilder::new()
            .subject_attr(oid::AT_POSTAL_CODE, "12345")
            .subject_attr(oid::AT_COUNTRY_NAME, "DE")
            .document();
        assert!(run(SubscriberAttributeDependencyValidator, &with).is_empty());
    }

    #[test]
    fn first_unmet_dependency_only() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_STREET_ADDRESS, "Main St 1")
            .subject_attr(oid::AT_POSTAL_CODE, "12345")
            .document();
        let findings = run(SubscriberAttributeDependencyValidator, &doc);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message(),
            Some(
                "2.5.4.9 is present but one of localityName (2.5.4.7), \
                 stateOrProvinceName (2.5.4.8) is not present"
            )
        );
    }

    #[test]
    fn email_addresses() {
        assert!(is_email_address("jane.doe@example.com"));
        assert!(is_email_address("j+d@mail.example.org"));
        assert!(!is_email_address("Jane Doe"));
        assert!(!is_email_address("jane@localhost"));
        assert!(!is_email_address("jane..doe@example.com"));
    }

    #[test]
    fn email_in_attribute_must_be_in_san() {
        let missing = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "jane@example.com")
            .san(SanEntry::Rfc822("john@example.com"))
            .document();
        let findings = run(
            SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
            &missing
        );
        assert_eq!(
            codes(&findings),
            ["cabf.smime.email_address_in_attribute_not_in_san"]
        );
        assert_eq!(
            findings[0].message(),
            Some(
                "Attribute 2.5.4.3 with value \"jane@example.com\" \
                 not found in SAN"
            )
        );

        for entry in [
            SanEntry::Rfc822("jane@example.com"),
            SanEntry::SmtpUtf8("jane@example.com"),
        ] {
            let present = CertBuilder::new()
                .subject_attr(oid::AT_COMMON_NAME, "jane@example.com")
                .san(entry)
                .document();
            assert!(run(
                SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
                &present
            ).is_empty());
        }
    }

    #[test]
    fn email_attribute_and_plain_values_are_skipped() {
        let doc = CertBuilder::new()
            .subject_attr(oid::EMAIL_ADDRESS, "jane@example.com")
            .subject_attr(oid::AT_GIVEN_NAME, "Jane")
            .document();
        assert!(run(
            SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
            &doc
        ).is_empty());
    }

    #[test]
    fn email_in_attribute_outside_policy_tables() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_DOMAIN_COMPONENT, "example")
            .subject_attr_as(
                oid::AT_USER_ID, "other@example.com", bcder::Tag::UTF8_STRING
            )
            .san(SanEntry::Rfc822("jane@example.com"))
            .document();
        let findings = run(
            SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
            &doc
        );
        assert_eq!(
            codes(&findings),
            ["cabf.smime.email_address_in_attribute_not_in_san"]
        );
        assert_eq!(
            messages(&findings),
            [
                "Attribute 0.9.2342.19200300.100.1.1 with value \
                 \"other@example.com\" not found in SAN"
            ]
        );
    }

    #[test]
    fn unparsed_attribute_is_a_notice() {
        let doc = CertBuilder::new()
            .subject_attr_as(
                oid::AT_COMMON_NAME, "jane@example.com",
                bcder::Tag::OCTET_STRING
            )
            .document();
        let findings = run(
            SubjectAlternativeNameContainsSubjectEmailAddressesValidator,
            &doc
        );
        assert_eq!(
            codes(&findings),
            ["cabf.smime.unparsed_attribute_value_encountered"]
        );
        assert_eq!(findings[0].severity(), Severity::Notice);
    }

    #[test]
    fn common_name_of_organization() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Example Corp")
            .subject_attr(oid::AT_ORGANIZATION_NAME, "Example Corp")
            .document();
        assert!(run(
            CommonNameValidator::new(profile("organization-strict")), &doc
        ).is_empty());

        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Example Corp")
            .subject_attr(oid::AT_ORGANIZATION_NAME, "Other Corp")
            .san(SanEntry::Rfc822("info@example.com"))
            .document();
        let findings = run(
            CommonNameValidator::new(profile("organization-strict")), &doc
        );
        assert_eq!(
            codes(&findings), ["cabf.smime.common_name_value_unknown_source"]
        );
        assert_eq!(
            findings[0].message(),
            Some("Unknown CN value source: \"Example Corp\"")
        );
    }

    #[test]
    fn common_name_of_individual() {
        let with_given_name = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Jane Doe")
            .subject_attr(oid::AT_GIVEN_NAME, "Janet")
            .document();
        assert!(run(
            CommonNameValidator::new(profile("individual-strict")),
            &with_given_name
        ).is_empty());

        let with_pseudonym = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Zorro")
            .subject_attr(oid::AT_PSEUDONYM, "Zorro")
            .document();
        assert!(run(
            CommonNameValidator::new(profile("sponsored-multipurpose")),
            &with_pseudonym
        ).is_empty());

        let unrelated = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Jane Doe")
            .subject_attr(oid::AT_PSEUDONYM, "Zorro")
            .document();
        assert_eq!(
            codes(&run(
                CommonNameValidator::new(profile("individual-strict")),
                &unrelated
            )),
            ["cabf.smime.common_name_value_unknown_source"]
        );
        assert!(run(
            CommonNameValidator::new(profile("individual-legacy")),
            &unrelated
        ).is_empty());
    }

    #[test]
    fn common_name_of_mailbox() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "jane@example.com")
            .san(SanEntry::SmtpUtf8("jane@example.com"))
            .document();
        assert!(run(
            CommonNameValidator::new(profile("mailbox-strict")), &doc
        ).is_empty());

        let doc = CertBuilder::new()
            .subject_attr_as(
                oid::AT_COMMON_NAME, "Jane", bcder::Tag::OCTET_STRING
            )
            .document();
        let findings = run(
            CommonNameValidator::new(profile("mailbox-strict")), &doc
        );
        assert_eq!(
            codes(&findings), ["cabf.smime.unparsed_common_name_value"]
        );
        assert_eq!(findings[0].message(), None);
    }

    #[test]
    fn organization_identifier_schemes() {
        let check = |value: &str| {
            let doc = CertBuilder::new()
                .subject_attr(oid::AT_ORGANIZATION_IDENTIFIER, value)
                .document();
            codes(&run(organization_identifier_validator(), &doc))
        };
        assert!(check("LEIXG-5493001KJTIIGC8Y1R12").is_empty());
        assert!(check("GOVUS+CA").is_empty());
        assert!(check("INTXG").is_empty());
        assert_eq!(
            check("LEIUS-5493001KJTIIGC8Y1R12"),
            ["cabf.invalid_organization_identifier_country"]
        );
        assert_eq!(
            check("LEIXG"),
            ["cabf.invalid_subject_organization_identifier_reference_missing_for_scheme"]
        );
        assert_eq!(
            check("GOVUS-1234"),
            ["cabf.smime.prohibited_organization_identifier_reference_present_for_scheme"]
        );
        assert_eq!(
            check("INTXG+NY"),
            ["cabf.invalid_subject_organization_identifier_state_province_for_scheme"]
        );
        assert_eq!(
            check("GOVZZ"),
            ["cabf.invalid_organization_identifier_country"]
        );
        assert_eq!(
            check("NTRUS-1234"),
            ["cabf.invalid_organization_identifier_registration_scheme"]
        );
        assert_eq!(
            check("lei"), ["cabf.invalid_organization_identifier_format"]
        );
    }

    #[test]
    fn organization_identifier_lei() {
        let check = |value: &str| {
            let doc = CertBuilder::new()
                .subject_attr(oid::AT_ORGANIZATION_IDENTIFIER, value)
                .document();
            codes(&run(
                crate::org_id::OrganizationIdentifierLeiValidator, &doc
            ))
        };
        assert!(check("LEIXG-5493001KJTIIGC8Y1R12").is_empty());
        assert!(check("GOVUS").is_empty());
        assert_eq!(
            check("LEIXG-5493001KJTIIGC8Y1R13"),
            ["cabf.invalid_organization_identifier_lei"]
        );
    }

    #[test]
    fn organization_identifier_country() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_ORGANIZATION_IDENTIFIER, "GOVUS")
            .subject_attr(oid::AT_COUNTRY_NAME, "DE")
            .document();
        let findings = run(
            OrganizationIdentifierCountryNameConsistentValidator, &doc
        );
        assert_eq!(
            codes(&findings),
            ["cabf.smime.org_identifier_and_country_name_attribute_inconsistent"]
        );
        assert_eq!(
            findings[0].message(),
            Some(
                "CountryName attribute value: \"DE\", OrganizationIdentifier \
                 attribute country name value: \"US\""
            )
        );

        for org_id in ["LEIXG-5493001KJTIIGC8Y1R12", "GOVDE", "not an id"] {
            let doc = CertBuilder::new()
                .subject_attr(oid::AT_ORGANIZATION_IDENTIFIER, org_id)
                .subject_attr(oid::AT_COUNTRY_NAME, "DE")
                .document();
            assert!(run(
                OrganizationIdentifierCountryNameConsistentValidator, &doc
            ).is_empty());
        }
    }
}
