//! # hostgate
//!
//! Host-based access control for REST APIs: authenticate inbound
//! requests by network origin (IP address, CIDR network, or resolved
//! hostname) instead of credentials.
//!
//! ## Crates
//!
//! - [`hostgate_rules`] - Entry classification, rule model, storage, and
//!   the two default-policy evaluators
//! - [`hostgate_identity`] - Caller identity acquisition (transport
//!   address parsing, reverse-DNS fallback)

pub use hostgate_identity as identity;
pub use hostgate_rules as rules;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use hostgate_identity::{
        DnsIdentityResolver, IdentityError, IdentityResolver, StaticIdentityResolver,
    };
    pub use hostgate_rules::{Access, CallerIdentity, HostGate, Kind, Rule, RuleStore, Verdict};
}
