//! Host-based access-control rules for hostgate.
//!
//! Authenticates REST API callers by network origin instead of
//! credentials: an ordered set of allow/deny rules over IP addresses,
//! CIDR networks, hostname suffixes, and exact hostnames, evaluated
//! under one of two default policies chosen by the authentication
//! surface.
//!
//! # Architecture
//!
//! - **Classification**: [`classify`] / [`ClassifiedEntry`] sort raw entry
//!   text into one of four categories, totally and in fixed priority order
//! - **Rules**: [`Rule`] pairs a classified entry with an access polarity
//!   and a kind; [`RuleRecord`] is the serde form
//! - **Storage**: [`RuleSet`] snapshots with lock-free reads via
//!   [`RuleStore`]
//! - **Evaluation**: [`Policy`] (default-deny for `user`, default-allow
//!   for `application`) and [`HostGate`] as the per-request entry point
//!
//! # Example
//!
//! ```
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::sync::Arc;
//! use hostgate_rules::{Access, CallerIdentity, HostGate, Kind, Rule, RuleStore, Verdict};
//!
//! let store = Arc::new(RuleStore::new(vec![
//!     Rule::new("10.0.0.0/8", Access::Allow, Kind::User),
//!     Rule::new("10.0.5.5", Access::Deny, Kind::User),
//! ]));
//! let gate = HostGate::new(store);
//!
//! let caller = CallerIdentity::from_address(IpAddr::V4(Ipv4Addr::new(10, 0, 1, 1)));
//! assert_eq!(gate.authorize(Kind::User, &caller), Verdict::Allow);
//! ```

pub mod entry;
pub mod error;
pub mod gate;
pub mod policy;
pub mod provider;
pub mod rule;
pub mod store;

pub use entry::{classify, ClassifiedEntry, EntryType};
pub use error::RulesError;
pub use gate::HostGate;
pub use policy::{Policy, Verdict};
pub use rule::{Access, CallerIdentity, Kind, Rule, RuleRecord};
pub use store::{RuleSet, RuleStore};
