//! Symptom input models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered symptom identifiers for a single prediction.
///
/// Entries are kept as raw JSON values: only the classifier decides whether
/// an entry is a usable feature. Order is significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SymptomSet(Vec<Value>);

impl SymptomSet {
    /// Build a set from symptom names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(|n| Value::String(n.into())).collect())
    }

    /// Wrap a request's `symptoms` value without altering it.
    ///
    /// An array becomes the entry list; any other value becomes a single entry.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(entries) => Self(entries),
            other => Self(vec![other]),
        }
    }

    pub fn entries(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SymptomSet {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}
