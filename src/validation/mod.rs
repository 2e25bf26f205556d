//! Validators and the validation of documents.
//!
//! A [`Validator`] is a single rule. It declares the kinds of values it
//! applies to, may narrow this down further through a predicate over the
//! node, and checks one node at a time producing findings.
//!
//! Validators are grouped into a [`ValidatorContainer`] which applies its
//! own filter before handing nodes to the validators and containers it
//! contains. Finally, [`validate`] walks a document and runs all containers
//! over every node.

use std::fmt;
use log::{debug, trace};
use crate::document::{Document, Node, PduKind};


//------------ Severity ------------------------------------------------------

/// The importance of a finding.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        })
    }
}


//------------ Finding -------------------------------------------------------

/// A kind of deviation from a rule.
///
/// The code identifies the rule. It is stable and never reused for a
/// different rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Finding {
    severity: Severity,
    code: &'static str,
}

impl Finding {
    pub const fn new(severity: Severity, code: &'static str) -> Self {
        Finding { severity, code }
    }

    pub fn severity(self) -> Severity {
        self.severity
    }

    pub fn code(self) -> &'static str {
        self.code
    }

    /// Returns a description of the finding without a message.
    pub fn describe(self) -> FindingDescription {
        FindingDescription { finding: self, message: None }
    }

    /// Returns a description of the finding with the given message.
    pub fn with_message(self, message: impl Into<String>) -> FindingDescription {
        FindingDescription { finding: self, message: Some(message.into()) }
    }
}


//------------ FindingDescription --------------------------------------------

/// A finding reported for a node together with an optional message.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FindingDescription {
    finding: Finding,
    message: Option<String>,
}

impl FindingDescription {
    pub fn finding(&self) -> Finding {
        self.finding
    }

    pub fn severity(&self) -> Severity {
        self.finding.severity
    }

    pub fn code(&self) -> &'static str {
        self.finding.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<Finding> for FindingDescription {
    fn from(finding: Finding) -> Self {
        finding.describe()
    }
}

impl fmt::Display for FindingDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.finding.severity, self.finding.code)?;
        if let Some(message) = self.message.as_ref() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}


//------------ ValidationResult ----------------------------------------------

/// The findings of one validator at one node.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationResult {
    validator: &'static str,
    node_path: String,
    findings: Vec<FindingDescription>,
}

impl ValidationResult {
    /// Returns the name of the validator that produced the findings.
    pub fn validator(&self) -> &'static str {
        self.validator
    }

    /// Returns the path of the node the findings were reported for.
    pub fn node_path(&self) -> &str {
        &self.node_path
    }

    pub fn findings(&self) -> &[FindingDescription] {
        &self.findings
    }
}


//------------ Validator -----------------------------------------------------

/// The outcome of checking a node.
///
/// A check either returns any number of findings or stops early reporting
/// exactly one. Both count the same.
pub type ValidatorResult = Result<Vec<FindingDescription>, FindingDescription>;

/// A rule checking nodes of a document.
///
/// Validators are configured when they are created and don’t keep state
/// between invocations. They can be shared between threads.
pub trait Validator: Send + Sync {
    /// Returns the name of the validator used in results.
    fn name(&self) -> &'static str;

    /// Returns all findings the validator may report.
    fn findings(&self) -> &[Finding];

    /// Returns the kinds of values the validator applies to.
    fn shapes(&self) -> &[PduKind];

    /// Returns whether the validator applies to a node of a matching kind.
    fn matches(&self, _node: Node) -> bool {
        true
    }

    /// Checks a node.
    fn validate(&self, node: Node) -> ValidatorResult;
}


//------------ Predicate -----------------------------------------------------

/// A condition over a node.
///
/// Predicates only look at the node and its document. They must not keep
/// state.
pub struct Predicate(Box<dyn Fn(Node<'_>) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(
        op: impl Fn(Node<'_>) -> bool + Send + Sync + 'static
    ) -> Self {
        Predicate(Box::new(op))
    }

    /// A predicate accepting only the node with the given path.
    pub fn path_is(path: &'static str) -> Self {
        Self::new(move |node| node.path() == path)
    }

    /// A predicate accepting every node but the one with the given path.
    pub fn path_is_not(path: &'static str) -> Self {
        Self::new(move |node| node.path() != path)
    }

    /// A predicate accepting nodes with one of the given paths.
    pub fn path_in(paths: &'static [&'static str]) -> Self {
        Self::new(move |node| paths.contains(&node.path()))
    }

    /// A predicate accepting nodes that are not in the subtree at `path`.
    pub fn not_within(path: &'static str) -> Self {
        Self::new(move |node| {
            !std::iter::once(node).chain(node.parents()).any(|node| {
                node.path() == path
            })
        })
    }

    /// Returns a predicate that accepts if both predicates accept.
    pub fn and(self, other: Predicate) -> Self {
        Self::new(move |node| self.check(node) && other.check(node))
    }

    pub fn check(&self, node: Node) -> bool {
        (self.0)(node)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Predicate")
    }
}


//------------ ValidatorContainer --------------------------------------------

/// A named group of validators and containers sharing a filter.
///
/// The container applies to the subtrees rooted at the nodes whose kind is
/// one of the container’s shapes and that are accepted by its predicate.
/// A container without shapes matches nodes of any kind and, unless its
/// predicate says otherwise, thus applies to the whole document. Nodes
/// within the subtrees are handed to the items of the container.
pub struct ValidatorContainer {
    name: &'static str,
    shapes: Vec<PduKind>,
    predicate: Option<Predicate>,
    items: Vec<Item>,
}

enum Item {
    Validator(Box<dyn Validator>),
    Container(ValidatorContainer),
}

impl ValidatorContainer {
    /// Creates a new empty container that applies to all nodes.
    pub fn new(name: &'static str) -> Self {
        ValidatorContainer {
            name,
            shapes: Vec::new(),
            predicate: None,
            items: Vec::new(),
        }
    }

    /// Restricts the container to the given kinds of values.
    pub fn with_shapes(mut self, shapes: &[PduKind]) -> Self {
        self.shapes = shapes.into();
        self
    }

    /// Restricts the container to nodes accepted by the predicate.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.and(predicate),
            None => predicate,
        });
        self
    }

    /// Adds a validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.push_validator(validator);
        self
    }

    /// Adds a nested container.
    pub fn with_container(mut self, container: ValidatorContainer) -> Self {
        self.push_container(container);
        self
    }

    pub fn push_validator(&mut self, validator: impl Validator + 'static) {
        self.items.push(Item::Validator(Box::new(validator)))
    }

    pub fn push_container(&mut self, container: ValidatorContainer) {
        self.items.push(Item::Container(container))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the names of all validators in registration order.
    pub fn validator_names(&self) -> Vec<&'static str> {
        let mut res = Vec::new();
        self.for_each_validator(&mut |validator| res.push(validator.name()));
        res
    }

    /// Returns all findings the validators of the container may report.
    pub fn findings(&self) -> Vec<Finding> {
        let mut res = Vec::new();
        self.for_each_validator(&mut |validator| {
            for finding in validator.findings() {
                if !res.contains(finding) {
                    res.push(*finding)
                }
            }
        });
        res
    }

    fn for_each_validator(&self, op: &mut dyn FnMut(&dyn Validator)) {
        for item in &self.items {
            match *item {
                Item::Validator(ref validator) => op(validator.as_ref()),
                Item::Container(ref container) => {
                    container.for_each_validator(op)
                }
            }
        }
    }

    /// Returns whether the container applies to the subtree at `node`.
    fn is_scope(&self, node: Node) -> bool {
        (self.shapes.is_empty() || self.shapes.contains(&node.kind()))
        && self.predicate.as_ref().map(|p| p.check(node)).unwrap_or(true)
    }

    /// Returns whether the node lies within one of the container’s scopes.
    fn contains(&self, node: Node) -> bool {
        std::iter::once(node).chain(node.parents()).any(|node| {
            self.is_scope(node)
        })
    }

    fn validate_node(&self, node: Node, results: &mut Vec<ValidationResult>) {
        if !self.contains(node) {
            return
        }
        for item in &self.items {
            match *item {
                Item::Validator(ref validator) => {
                    if validator.shapes().contains(&node.kind())
                        && validator.matches(node)
                    {
                        invoke(validator.as_ref(), node, results)
                    }
                }
                Item::Container(ref container) => {
                    container.validate_node(node, results)
                }
            }
        }
    }
}

impl fmt::Debug for ValidatorContainer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ValidatorContainer")
            .field("name", &self.name)
            .field("shapes", &self.shapes)
            .field("validators", &self.validator_names())
            .finish()
    }
}

fn invoke(
    validator: &dyn Validator, node: Node, results: &mut Vec<ValidationResult>
) {
    trace!("running {} on {}", validator.name(), node.path());
    let findings = match validator.validate(node) {
        Ok(findings) => findings,
        Err(finding) => vec![finding],
    };
    debug_assert!(
        findings.iter().all(|item| {
            validator.findings().contains(&item.finding)
        }),
        "{} reported an undeclared finding", validator.name()
    );
    if !findings.is_empty() {
        results.push(ValidationResult {
            validator: validator.name(),
            node_path: node.path().into(),
            findings,
        })
    }
}


//------------ validate ------------------------------------------------------

/// Validates a document.
///
/// Every node is visited once in pre-order. At each node, the containers
/// are run in the given order. The result contains an entry for each
/// validator that reported findings for a node.
pub fn validate(
    document: &Document, containers: &[ValidatorContainer]
) -> Vec<ValidationResult> {
    let mut res = Vec::new();
    for node in document.pre_order() {
        for container in containers {
            container.validate_node(node, &mut res);
        }
    }
    debug!(
        "validated {} nodes with {} containers: {} results",
        document.len(), containers.len(), res.len()
    );
    res
}

/// Returns all findings of a list of results.
pub fn all_findings(
    results: &[ValidationResult]
) -> impl Iterator<Item = &FindingDescription> {
    results.iter().flat_map(|result| result.findings.iter())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::oid;
    use crate::test::CertBuilder;

    const EARLY: Finding = Finding::new(Severity::Error, "test.early");
    const LATE: Finding = Finding::new(Severity::Notice, "test.late");

    /// Reports once per attribute through an early exit.
    struct Aborting;

    impl Validator for Aborting {
        fn name(&self) -> &'static str { "Aborting" }
        fn findings(&self) -> &[Finding] { &[EARLY] }
        fn shapes(&self) -> &[PduKind] {
            &[PduKind::AttributeTypeAndValue]
        }
        fn validate(&self, _node: Node) -> ValidatorResult {
            Err(EARLY.with_message("stop"))
        }
    }

    /// Reports twice per attribute value.
    struct Listing;

    impl Validator for Listing {
        fn name(&self) -> &'static str { "Listing" }
        fn findings(&self) -> &[Finding] { &[LATE] }
        fn shapes(&self) -> &[PduKind] {
            &[PduKind::AttributeTypeAndValue]
        }
        fn matches(&self, node: Node) -> bool {
            node.attribute_type().map(|attr_type| {
                *attr_type == oid::AT_COMMON_NAME
            }).unwrap_or(false)
        }
        fn validate(&self, _node: Node) -> ValidatorResult {
            Ok(vec![LATE.describe(), LATE.describe()])
        }
    }

    fn container() -> ValidatorContainer {
        ValidatorContainer::new("test")
            .with_shapes(&[PduKind::Name])
            .with_predicate(Predicate::path_is_not(
                "certificate.tbsCertificate.issuer"
            ))
            .with_validator(Aborting)
            .with_container(ValidatorContainer::new("inner").with_validator(Listing))
    }

    #[test]
    fn early_exit_does_not_suppress_others() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Jane")
            .subject_attr(oid::AT_SURNAME, "Doe")
            .document();
        let results = validate(&doc, &[container()]);
        assert_eq!(
            results.iter().map(|item| {
                (item.validator(), item.node_path(), item.findings().len())
            }).collect::<Vec<_>>(),
            [
                (
                    "Aborting",
                    "certificate.tbsCertificate.subject.rdnSequence.0.0",
                    1
                ),
                (
                    "Listing",
                    "certificate.tbsCertificate.subject.rdnSequence.0.0",
                    2
                ),
                (
                    "Aborting",
                    "certificate.tbsCertificate.subject.rdnSequence.1.0",
                    1
                ),
            ]
        );
        assert_eq!(
            results[0].findings()[0].to_string(), "ERROR test.early: stop"
        );
    }

    #[test]
    fn unscoped_container_covers_everything() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_SURNAME, "Doe")
            .document();
        let container = ValidatorContainer::new("all").with_validator(Aborting);
        let results = validate(&doc, &[container]);
        assert_eq!(
            results.iter().map(|item| item.node_path()).collect::<Vec<_>>(),
            [
                "certificate.tbsCertificate.issuer.rdnSequence.0.0",
                "certificate.tbsCertificate.subject.rdnSequence.0.0",
            ]
        );
    }

    #[test]
    fn validation_is_repeatable() {
        let doc = CertBuilder::new()
            .subject_attr(oid::AT_COMMON_NAME, "Jane")
            .document();
        let containers = [container()];
        assert_eq!(validate(&doc, &containers), validate(&doc, &containers));
    }

    #[test]
    fn container_metadata() {
        let container = container();
        assert_eq!(container.validator_names(), ["Aborting", "Listing"]);
        assert_eq!(container.findings(), [EARLY, LATE]);
        assert!(Severity::Notice < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
