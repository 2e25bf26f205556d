//! Rules and helpers for the Internet X.509 PKI profile.

pub mod algorithm;
pub mod general_name;
pub mod name;


//------------ Rfc2119Word ---------------------------------------------------

/// The requirement levels used by policy tables.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rfc2119Word {
    Shall,
    ShallNot,
    May,
}
