//! Caller identity resolution for hostgate.
//!
//! Turns transport-level connection data into the
//! [`CallerIdentity`](hostgate_rules::CallerIdentity) the rule engine
//! evaluates: the source address (mandatory, parse failure is fatal) and
//! an optional hostname, taken from a transport hint when available or
//! from a bounded reverse-DNS lookup otherwise.
//!
//! # Example
//!
//! ```rust,no_run
//! use hostgate_identity::{DnsIdentityResolver, IdentityResolver};
//!
//! # async fn example() -> Result<(), hostgate_identity::IdentityError> {
//! let resolver = DnsIdentityResolver::from_system_conf()?;
//! let caller = resolver.resolve("203.0.113.9", None).await?;
//! println!("caller: {:?}", caller);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resolver;

pub use error::IdentityError;
pub use resolver::{
    DnsIdentityResolver, IdentityResolver, StaticIdentityResolver, DEFAULT_LOOKUP_TIMEOUT,
};
