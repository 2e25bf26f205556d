//! Test data shared by the unit tests.

pub use self::cert::{CertBuilder, DerData, SanEntry};
