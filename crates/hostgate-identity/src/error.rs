//! Identity resolution errors.

use thiserror::Error;

/// Errors from acquiring a caller identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The transport handed over an unparsable source address. Fatal to
    /// the request: an identity that cannot be established must not be
    /// evaluated, and the boundary surfaces it as an authorization
    /// failure.
    #[error("invalid remote address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Reverse lookup failed for a reason other than "not found".
    /// Callers may proceed with no hostname, but the event narrows rule
    /// matching to address rules and must stay observable.
    #[error("reverse lookup failed: {0}")]
    Resolution(#[from] hickory_resolver::ResolveError),

    /// The system resolver configuration could not be read.
    #[error("resolver config: {0}")]
    Config(String),
}
