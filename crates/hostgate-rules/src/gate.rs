//! Per-request authorization gate.

use std::sync::Arc;

use tracing::{debug, info};

use crate::policy::{Policy, Verdict};
use crate::rule::{CallerIdentity, Kind};
use crate::store::RuleStore;

/// The entry point the web layer calls once per request.
///
/// Holds a shared [`RuleStore`]; each check runs against the snapshot
/// current at call time, so concurrent checks and rule edits never
/// interfere. `authorize` is synchronous and never fails.
#[derive(Clone)]
pub struct HostGate {
    store: Arc<RuleStore>,
}

impl HostGate {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store, e.g. for admin edits.
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Decide whether a caller may use the given authentication surface.
    ///
    /// Deny events log the caller, never the rule that matched. The
    /// boundary layer pairs the verdict with [`Kind::denial_message`] and
    /// a 401, and probing clients learn nothing about the rule set.
    pub fn authorize(&self, kind: Kind, caller: &CallerIdentity) -> Verdict {
        let rules = self.store.snapshot();
        let policy = Policy::for_kind(kind);
        let verdict = policy.evaluate(&rules, kind, caller);

        match verdict {
            Verdict::Allow => debug!(
                kind = %kind,
                address = ?caller.address,
                hostname = caller.hostname(),
                "caller authorized"
            ),
            Verdict::Deny => info!(
                kind = %kind,
                address = ?caller.address,
                hostname = caller.hostname(),
                "caller denied"
            ),
        }

        verdict
    }
}

impl std::fmt::Debug for HostGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostGate")
            .field("store", &self.store)
            .finish()
    }
}
