//! The two default-policy evaluation strategies.
//!
//! Both policies run over the same matcher and the same kind/access
//! partitioning; only the scan order and the default differ. Evaluation
//! is pure and never fails: every caller gets a verdict.

use crate::rule::{Access, CallerIdentity, Kind};
use crate::store::RuleSet;

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verdict::Allow => "ALLOW",
            Verdict::Deny => "DENY",
        })
    }
}

/// Evaluation strategy over a rule partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Deny unless an allow rule matches; a matching deny rule revokes
    /// the allowance. Used for end-user traffic.
    DefaultDeny,
    /// Allow unless a deny rule matches; a matching allow rule re-admits
    /// a caller inside a denied range. Used for application traffic.
    DefaultAllow,
}

impl Policy {
    /// The policy a rule kind evaluates under.
    pub fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::User => Policy::DefaultDeny,
            Kind::Application => Policy::DefaultAllow,
        }
    }

    /// Evaluate a caller against the rules of one kind.
    ///
    /// Scans short-circuit on the first match; since only the existence
    /// of a match is tested, a full scan would produce the same verdict.
    pub fn evaluate(&self, rules: &RuleSet, kind: Kind, caller: &CallerIdentity) -> Verdict {
        let any_match = |access: Access| {
            rules
                .filter(kind, access)
                .any(|rule| rule.matches(caller.address, caller.hostname()))
        };

        match self {
            Policy::DefaultDeny => {
                if !any_match(Access::Allow) {
                    return Verdict::Deny;
                }
                if any_match(Access::Deny) {
                    return Verdict::Deny;
                }
                Verdict::Allow
            }
            Policy::DefaultAllow => {
                if !any_match(Access::Deny) {
                    return Verdict::Allow;
                }
                if any_match(Access::Allow) {
                    return Verdict::Allow;
                }
                Verdict::Deny
            }
        }
    }
}
