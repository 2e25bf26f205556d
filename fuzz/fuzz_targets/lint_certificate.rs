#![no_main]

use libfuzzer_sys::fuzz_target;
use x509lint::{validate, Document};
use x509lint::pkix::algorithm;
use x509lint::smime::{self, Generation, Profile, ValidationLevel};

const LEVELS: [ValidationLevel; 4] = [
    ValidationLevel::Mailbox, ValidationLevel::Organization,
    ValidationLevel::Sponsored, ValidationLevel::Individual,
];

const GENERATIONS: [Generation; 3] = [
    Generation::Legacy, Generation::Multipurpose, Generation::Strict,
];

fuzz_target!(|data: &[u8]| {
    let (which, data) = match data.split_first() {
        Some((first, data)) => (*first as usize, data),
        None => return,
    };
    let document = match Document::decode(data.to_vec()) {
        Ok(document) => document,
        Err(_) => return,
    };
    let profile = Profile::new(
        LEVELS[which % 4], GENERATIONS[(which / 4) % 3]
    );
    let _ = validate(&document, &[
        smime::create_subscriber_certificate_subject_validator_container(
            profile
        ),
        algorithm::create_signature_algorithm_validator_container(),
    ]);
});
