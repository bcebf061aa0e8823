//! Record inclusion filter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use exomag_model::{Record, Value};

/// One field/allowed-values constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub field: String,
    pub allowed: BTreeSet<String>,
}

impl FilterRule {
    pub fn new<V>(field: impl Into<String>, allowed: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<String>,
    {
        Self {
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// A record matches when the named field carries a text value in the
    /// allowed set. Absent, empty, and non-scalar fields never match.
    pub fn matches(&self, record: &Record) -> bool {
        match record.get(&self.field) {
            Some(Value::Text(text)) => self.allowed.contains(text),
            _ => false,
        }
    }
}

/// Conjunction over all rules; no rules means every record passes.
pub fn passes(record: &Record, rules: &[FilterRule]) -> bool {
    rules.iter().all(|rule| rule.matches(record))
}
