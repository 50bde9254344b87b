//! File-based rule loading.
//!
//! Rules live in a YAML document with a `rules:` sequence of records:
//!
//! ```yaml
//! rules:
//!   - entry: 10.0.0.0/8
//!     access: allow
//!     kind: user
//!   - entry: .campus.edu
//!     access: allow
//!     kind: user
//! ```
//!
//! An `entry_type` field in a record is accepted and ignored; the type is
//! always recomputed from the entry text on load.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::RulesError;
use crate::rule::{Rule, RuleRecord};

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<RuleRecord>,
}

/// Load rules from a YAML file, preserving file order.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>, RulesError> {
    let content = std::fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;
    debug!(path = %path.display(), rules = rules.len(), "rule file loaded");
    Ok(rules)
}

/// Parse rules from YAML text.
///
/// Unknown `access` or `kind` values fail deserialization; entry text
/// itself cannot fail, since classification is total.
pub fn parse_rules(content: &str) -> Result<Vec<Rule>, RulesError> {
    let file: RuleFile = serde_yaml::from_str(content)?;
    Ok(file.rules.into_iter().map(Rule::from).collect())
}
