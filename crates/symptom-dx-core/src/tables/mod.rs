//! Reference tables keyed by normalized condition name.
//!
//! Two tables are built once at startup: merged precautions and descriptions.
//! Both are immutable afterwards.

mod loader;

pub use loader::*;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::resolver::normalize_key;

/// Reference table loading errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to open {table} table at {}: {source}", .path.display())]
    Io {
        table: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {table} table: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    #[error("{table} table row at line {line} has no Disease value")]
    MissingDisease { table: &'static str, line: u64 },
}

pub type TableResult<T> = Result<T, TableError>;

/// Immutable mapping from normalized condition name to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: HashMap<String, String>,
}

impl ReferenceTable {
    /// Insert under the normalized key. Returns the replaced value, if any.
    pub(crate) fn insert(&mut self, condition: &str, value: String) -> Option<String> {
        self.entries.insert(normalize_key(condition), value)
    }

    /// Look up a condition, normalizing the probe the same way keys were.
    pub fn get(&self, condition: &str) -> Option<&str> {
        self.entries.get(&normalize_key(condition)).map(String::as_str)
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.entries.contains_key(&normalize_key(condition))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ReferenceTable
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ReferenceTable::default();
        for (condition, value) in iter {
            table.insert(condition.as_ref(), value.into());
        }
        table
    }
}

/// The precaution and description tables, loaded together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTables {
    pub precautions: ReferenceTable,
    pub descriptions: ReferenceTable,
}

impl ReferenceTables {
    pub fn new(precautions: ReferenceTable, descriptions: ReferenceTable) -> Self {
        Self {
            precautions,
            descriptions,
        }
    }

    /// Load both tables from CSV files.
    pub fn load(
        precautions_path: impl AsRef<std::path::Path>,
        descriptions_path: impl AsRef<std::path::Path>,
    ) -> TableResult<Self> {
        let precautions = load_precautions_path(precautions_path)?;
        let descriptions = load_descriptions_path(descriptions_path)?;

        tracing::info!(
            precautions = precautions.len(),
            descriptions = descriptions.len(),
            "Reference tables loaded"
        );

        Ok(Self::new(precautions, descriptions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table: ReferenceTable = [("Diabetes Type 2", "watch sugar")].into_iter().collect();

        assert_eq!(table.get("Diabetes Type 2"), Some("watch sugar"));
        assert_eq!(table.get("diabetes type 2"), Some("watch sugar"));
        assert_eq!(table.get("  DIABETES TYPE 2 "), Some("watch sugar"));
    }

    #[test]
    fn test_miss_is_none() {
        let table: ReferenceTable = [("Malaria", "consult nearest hospital")].into_iter().collect();

        assert_eq!(table.get("malaria"), Some("consult nearest hospital"));
        assert_eq!(table.get("zzz_unknown"), None);
        assert!(!table.contains("zzz_unknown"));
    }

    #[test]
    fn test_empty_value_is_a_hit() {
        let table: ReferenceTable = [("Acne", "")].into_iter().collect();

        assert!(table.contains("acne"));
        assert_eq!(table.get("acne"), Some(""));
    }

    #[test]
    fn test_keys_are_normalized() {
        let table: ReferenceTable = [(" Common Cold ", "rest")].into_iter().collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("common cold"), Some("rest"));
    }
}
