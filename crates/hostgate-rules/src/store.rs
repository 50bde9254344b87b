//! Rule storage: immutable snapshots and a shared, reloadable store.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use crate::rule::{Access, Kind, Rule};

/// An immutable, ordered collection of rules.
///
/// Iteration is insertion-ordered. Order does not change any policy
/// outcome (each policy only asks whether a match exists in a partition),
/// but deterministic order keeps evaluation reproducible.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules for one kind and access, in insertion order.
    pub fn filter(&self, kind: Kind, access: Access) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.kind() == kind && rule.access() == access)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Shared rule store with snapshot reads and serialized writes.
///
/// Reads are lock-free: `snapshot` hands out the current `Arc<RuleSet>`,
/// and any number of authorization checks may hold snapshots
/// concurrently. Writers take the mutex, rebuild a copy, and publish it
/// atomically; in-flight readers keep the set they started with.
pub struct RuleStore {
    snapshot: ArcSwap<RuleSet>,
    write_lock: Mutex<()>,
}

impl RuleStore {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            snapshot: ArcSwap::new(Arc::new(RuleSet::new(rules))),
            write_lock: Mutex::new(()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The current rule set.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.snapshot.load_full()
    }

    /// Replace the entire rule set.
    pub fn replace(&self, rules: Vec<Rule>) {
        let _guard = self.write_lock.lock();
        let count = rules.len();
        self.snapshot.store(Arc::new(RuleSet::new(rules)));
        debug!(rules = count, "rule set replaced");
    }

    /// Append a rule.
    pub fn insert(&self, rule: Rule) {
        let _guard = self.write_lock.lock();
        let mut rules = self.snapshot.load().rules.clone();
        rules.push(rule);
        self.snapshot.store(Arc::new(RuleSet::new(rules)));
    }

    /// Remove every rule whose entry text equals `entry`.
    ///
    /// Returns the number of rules removed.
    pub fn remove_entry(&self, entry: &str) -> usize {
        let _guard = self.write_lock.lock();
        let mut rules = self.snapshot.load().rules.clone();
        let before = rules.len();
        rules.retain(|rule| rule.entry() != entry);
        let removed = before - rules.len();
        if removed > 0 {
            self.snapshot.store(Arc::new(RuleSet::new(rules)));
        }
        removed
    }
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("rules", &self.snapshot.load().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(entry: &str, access: Access, kind: Kind) -> Rule {
        Rule::new(entry, access, kind)
    }

    #[test]
    fn filter_partitions_by_kind_and_access() {
        let set = RuleSet::new(vec![
            rule("10.0.0.0/8", Access::Allow, Kind::User),
            rule("10.0.5.5", Access::Deny, Kind::User),
            rule("192.168.0.0/16", Access::Deny, Kind::Application),
        ]);

        let user_allow: Vec<_> = set.filter(Kind::User, Access::Allow).collect();
        assert_eq!(user_allow.len(), 1);
        assert_eq!(user_allow[0].entry(), "10.0.0.0/8");

        let app_allow: Vec<_> = set.filter(Kind::Application, Access::Allow).collect();
        assert!(app_allow.is_empty());
    }

    #[test]
    fn filter_preserves_insertion_order() {
        let set = RuleSet::new(vec![
            rule("first.example.com", Access::Allow, Kind::User),
            rule("10.0.0.0/8", Access::Deny, Kind::User),
            rule("second.example.com", Access::Allow, Kind::User),
        ]);
        let entries: Vec<_> = set
            .filter(Kind::User, Access::Allow)
            .map(Rule::entry)
            .collect();
        assert_eq!(entries, vec!["first.example.com", "second.example.com"]);
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let store = RuleStore::new(vec![rule("10.0.0.0/8", Access::Allow, Kind::User)]);
        let before = store.snapshot();

        store.insert(rule("10.0.5.5", Access::Deny, Kind::User));

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn replace_swaps_the_whole_set() {
        let store = RuleStore::new(vec![rule("old.example.com", Access::Allow, Kind::User)]);
        store.replace(vec![
            rule("new.example.com", Access::Allow, Kind::User),
            rule("10.0.0.0/8", Access::Deny, Kind::Application),
        ]);
        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(snap.iter().all(|r| r.entry() != "old.example.com"));
    }

    #[test]
    fn remove_entry_removes_all_occurrences() {
        let store = RuleStore::new(vec![
            rule("10.0.0.1", Access::Allow, Kind::User),
            rule("10.0.0.1", Access::Allow, Kind::Application),
            rule("10.0.0.2", Access::Allow, Kind::User),
        ]);
        assert_eq!(store.remove_entry("10.0.0.1"), 2);
        assert_eq!(store.remove_entry("10.0.0.1"), 0);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn store_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleStore>();
    }
}
