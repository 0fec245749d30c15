//! Diagnosis resolver for predicted condition labels.
//!
//! Pipeline: Label → Case fold → Override rules → Table lookup (with sentinel)

mod normalizer;
mod overrides;

pub use normalizer::*;
pub use overrides::*;

use crate::models::{DiagnosisResult, NOT_AVAILABLE};
use crate::tables::ReferenceTables;

/// Which path produced a [`DiagnosisResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A hardcoded override rule matched
    Override { rule: String },
    /// Table lookups; `false` means the sentinel was used
    Table {
        precautions_hit: bool,
        descriptions_hit: bool,
    },
}

/// Resolves predicted labels against override rules and reference tables.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisResolver {
    tables: ReferenceTables,
    overrides: OverrideRules,
}

impl DiagnosisResolver {
    /// Create a new resolver.
    pub fn new(tables: ReferenceTables, overrides: OverrideRules) -> Self {
        Self { tables, overrides }
    }

    /// Resolve a predicted label. Never fails: misses become "Not available".
    pub fn resolve(&self, raw_label: &str) -> DiagnosisResult {
        self.resolve_traced(raw_label).0
    }

    /// Resolve and report which path was taken.
    pub fn resolve_traced(&self, raw_label: &str) -> (DiagnosisResult, Resolution) {
        // Step 1: Case fold for override matching
        let folded = fold_case(raw_label);

        // Step 2: Overrides take precedence over the tables
        if let Some(rule) = self.overrides.find(&folded) {
            let result = DiagnosisResult {
                disease: raw_label.to_string(),
                precautions: rule.precautions.clone(),
                description: rule.description.clone(),
            };
            return (
                result,
                Resolution::Override {
                    rule: rule.name.clone(),
                },
            );
        }

        // Step 3: Table lookups (tables normalize the probe key)
        let precautions = self.tables.precautions.get(raw_label);
        let description = self.tables.descriptions.get(raw_label);
        let resolution = Resolution::Table {
            precautions_hit: precautions.is_some(),
            descriptions_hit: description.is_some(),
        };

        let result = DiagnosisResult {
            disease: raw_label.to_string(),
            precautions: precautions.unwrap_or(NOT_AVAILABLE).to_string(),
            description: description.unwrap_or(NOT_AVAILABLE).to_string(),
        };

        (result, resolution)
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }
}
