//! Linting X.509 certificates against issuance profiles.
//!
//! Certificates are decoded into a [`Document`], a tree of typed nodes
//! addressed by dotted paths such as
//! `certificate.tbsCertificate.subject.rdnSequence.0.0`. Rules are
//! expressed as [validators][validation::Validator] which are grouped into
//! [containers][validation::ValidatorContainer] and run over every node of
//! the document by [`validate`]. Each deviation from a rule is reported as
//! a finding with a severity and a stable code.
//!
//! The crate provides the rules of the CA/Browser Forum S/MIME Baseline
//! Requirements for the subject of subscriber certificates in [`smime`]
//! and the encoding restrictions for signature algorithms in
//! [`pkix::algorithm`].
//!
//! ```no_run
//! use x509lint::{validate, Document};
//! use x509lint::pkix::algorithm;
//! use x509lint::smime;
//!
//! let data = std::fs::read("cert.der").unwrap();
//! let document = Document::decode(data).unwrap();
//! let containers = [
//!     smime::create_subscriber_certificate_subject_validator_container(
//!         "mailbox-strict".parse().unwrap()
//!     ),
//!     algorithm::create_signature_algorithm_validator_container(),
//! ];
//! for result in validate(&document, &containers) {
//!     for finding in result.findings() {
//!         println!("{}: {}", result.node_path(), finding);
//!     }
//! }
//! ```

//--- Re-exports
//
pub use self::document::Document;
pub use self::error::DocumentError;
pub use self::validation::{validate, ValidationResult};


//--- Modules
//
pub mod cabf;
pub mod document;
pub mod error;
pub mod oid;
pub mod org_id;
pub mod pkix;
pub mod smime;
pub mod validation;

mod util;

#[cfg(test)]
mod test;
