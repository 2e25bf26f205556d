//! Error handling.
//!
//! Findings are the regular output of validation and never errors. The
//! only error a caller can observe is a failure to turn encoded data into a
//! document in the first place.

use std::{error, fmt};
use std::convert::Infallible;
use bcder::decode::DecodeError;


//------------ DocumentError -------------------------------------------------

/// Encoded data could not be decoded into a document.
#[derive(Debug)]
pub struct DocumentError {
    inner: DocumentErrorKind,
}

#[derive(Debug)]
enum DocumentErrorKind {
    Decoding(DecodeError<Infallible>),
    Empty,
}

impl DocumentError {
    pub(crate) fn empty() -> Self {
        DocumentError { inner: DocumentErrorKind::Empty }
    }
}

impl From<DecodeError<Infallible>> for DocumentError {
    fn from(err: DecodeError<Infallible>) -> Self {
        DocumentError { inner: DocumentErrorKind::Decoding(err) }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            DocumentErrorKind::Decoding(ref inner) => {
                write!(f, "malformed certificate: {}", inner)
            }
            DocumentErrorKind::Empty => f.write_str("empty input"),
        }
    }
}

impl error::Error for DocumentError { }
