//! Rule and caller-identity types.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::entry::{ClassifiedEntry, EntryType};

/// Rule polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Allow,
    Deny,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Access::Allow => "allow",
            Access::Deny => "deny",
        })
    }
}

/// The authentication surface a rule governs.
///
/// `Application` guards trusted backend-to-backend calls and evaluates
/// under the default-allow policy; `User` guards end-user-facing
/// operations and evaluates under default-deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Application,
    User,
}

impl Kind {
    /// Generic message the boundary layer returns with a 401 on deny.
    ///
    /// Deliberately rule-free: probing clients learn nothing about the
    /// rule set from a denial.
    pub fn denial_message(&self) -> &'static str {
        match self {
            Kind::Application => "Error authenticating application",
            Kind::User => "Error authenticating user",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Kind::Application => "application",
            Kind::User => "user",
        })
    }
}

/// One access-control entry.
///
/// The entry text is classified exactly once, at construction; the stored
/// parsed form is what matching runs against. There is no way to set the
/// entry type independently of the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    entry: String,
    parsed: ClassifiedEntry,
    access: Access,
    kind: Kind,
}

impl Rule {
    /// Build a rule, classifying the entry text.
    pub fn new(entry: impl Into<String>, access: Access, kind: Kind) -> Self {
        let entry = entry.into();
        let parsed = ClassifiedEntry::parse(&entry);
        Self {
            entry,
            parsed,
            access,
            kind,
        }
    }

    /// The raw entry text.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// The derived entry category.
    pub fn entry_type(&self) -> EntryType {
        self.parsed.entry_type()
    }

    /// The parsed entry.
    pub fn parsed(&self) -> &ClassifiedEntry {
        &self.parsed
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Check this rule against a caller.
    ///
    /// A caller without an address matches nothing, host rules included.
    pub fn matches(&self, address: Option<IpAddr>, hostname: Option<&str>) -> bool {
        match address {
            Some(addr) => self.parsed.matches(addr, hostname),
            None => false,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} as {} from {}", self.access, self.kind, self.entry)
    }
}

/// Persistence record for a rule.
///
/// `entry_type` is written out for external consumers but never trusted on
/// input: conversion to [`Rule`] reclassifies the entry, so stale or
/// hand-edited types cannot drift from the entry text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRecord {
    pub entry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    pub access: Access,
    pub kind: Kind,
}

impl From<RuleRecord> for Rule {
    fn from(record: RuleRecord) -> Self {
        Rule::new(record.entry, record.access, record.kind)
    }
}

impl From<&Rule> for RuleRecord {
    fn from(rule: &Rule) -> Self {
        RuleRecord {
            entry: rule.entry.clone(),
            entry_type: Some(rule.entry_type()),
            access: rule.access,
            kind: rule.kind,
        }
    }
}

/// The network identity extracted for one incoming request.
///
/// `address` is absent only in synthetic contexts; `hostname` is absent
/// whenever the transport supplied none and reverse resolution found
/// nothing (or was not attempted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub address: Option<IpAddr>,
    pub hostname: Option<String>,
}

impl CallerIdentity {
    /// Identity with an address and no hostname.
    pub fn from_address(address: IpAddr) -> Self {
        Self {
            address: Some(address),
            hostname: None,
        }
    }

    /// Identity with both parts known.
    pub fn new(address: IpAddr, hostname: impl Into<String>) -> Self {
        Self {
            address: Some(address),
            hostname: Some(hostname.into()),
        }
    }

    /// Identity with neither part known. Matches no rule.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn addr(a: u8, b: u8, c: u8, d: u8) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
    }

    #[test]
    fn rule_classifies_on_construction() {
        let rule = Rule::new("10.0.0.0/16", Access::Allow, Kind::User);
        assert_eq!(rule.entry_type(), EntryType::IpNetwork);
        assert_eq!(rule.entry(), "10.0.0.0/16");
    }

    #[test]
    fn no_address_matches_nothing() {
        // Even host rules need the minimal identity of an address.
        let suffix = Rule::new(".example.com", Access::Allow, Kind::User);
        assert!(!suffix.matches(None, Some("a.example.com")));

        let exact = Rule::new("a.example.com", Access::Allow, Kind::User);
        assert!(!exact.matches(None, Some("a.example.com")));
    }

    #[test]
    fn network_rule_matches_members() {
        let rule = Rule::new("10.0.0.0/8", Access::Allow, Kind::User);
        assert!(rule.matches(addr(10, 0, 1, 1), None));
        assert!(!rule.matches(addr(192, 168, 1, 1), None));
    }

    #[test]
    fn host_rules_need_hostname() {
        let rule = Rule::new(".example.com", Access::Allow, Kind::User);
        assert!(rule.matches(addr(10, 0, 0, 1), Some("a.example.com")));
        assert!(!rule.matches(addr(10, 0, 0, 1), None));
    }

    #[test]
    fn record_recomputes_entry_type() {
        // A stored record claiming the wrong type is corrected on load.
        let record = RuleRecord {
            entry: "10.0.0.1".into(),
            entry_type: Some(EntryType::HostExact),
            access: Access::Deny,
            kind: Kind::Application,
        };
        let rule = Rule::from(record);
        assert_eq!(rule.entry_type(), EntryType::IpAddress);
    }

    #[test]
    fn record_round_trip() {
        let rule = Rule::new(".campus.edu", Access::Allow, Kind::User);
        let record = RuleRecord::from(&rule);
        assert_eq!(record.entry_type, Some(EntryType::HostSuffix));
        let back = Rule::from(record);
        assert_eq!(back, rule);
    }

    #[test]
    fn display_form() {
        let rule = Rule::new("10.0.5.5", Access::Deny, Kind::User);
        assert_eq!(rule.to_string(), "deny as user from 10.0.5.5");
    }

    #[test]
    fn denial_messages_are_generic() {
        assert_eq!(
            Kind::Application.denial_message(),
            "Error authenticating application"
        );
        assert_eq!(Kind::User.denial_message(), "Error authenticating user");
    }
}
