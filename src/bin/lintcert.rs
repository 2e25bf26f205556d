use std::{env, fs, process};
use x509lint::{validate, Document};
use x509lint::pkix::algorithm;
use x509lint::smime::{self, Profile};
use x509lint::validation::{all_findings, Severity};


fn main() {
    let (profile, path) = match (env::args().nth(1), env::args().nth(2)) {
        (Some(profile), Some(path)) => (profile, path),
        _ => {
            println!("Usage: lintcert <profile> <path>");
            println!("Profiles are <level>-<generation>, e.g., mailbox-strict");
            process::exit(2)
        }
    };
    let profile = match profile.parse::<Profile>() {
        Ok(profile) => profile,
        Err(err) => {
            println!("Invalid profile {}: {}", profile, err);
            process::exit(2)
        }
    };
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(err) => {
            println!("Can’t read file: {}", err);
            process::exit(2)
        }
    };
    let document = match Document::decode(data) {
        Ok(document) => document,
        Err(err) => {
            println!("Can’t decode cert: {}", err);
            process::exit(2)
        }
    };

    let containers = [
        smime::create_subscriber_certificate_subject_validator_container(
            profile
        ),
        algorithm::create_signature_algorithm_validator_container(),
    ];
    let results = validate(&document, &containers);
    for result in &results {
        for finding in result.findings() {
            println!(
                "{} ({}): {}",
                result.node_path(), result.validator(), finding
            );
        }
    }
    if all_findings(&results).any(|finding| {
        finding.severity() == Severity::Error
    }) {
        process::exit(1)
    }
}
