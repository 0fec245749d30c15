//! Condition label normalization.
//!
//! Handles:
//! - Case folding for override matching
//! - Lookup key canonicalization (trim + case fold) shared with the table loader

/// Case-fold a predicted label. Whitespace is left as is.
pub fn fold_case(label: &str) -> String {
    label.to_lowercase()
}

/// Canonical reference-table key for a condition name.
///
/// Every key stored in a [`ReferenceTable`](crate::tables::ReferenceTable) and
/// every probe against one goes through this function.
pub fn normalize_key(condition: &str) -> String {
    condition.trim().to_lowercase()
}
