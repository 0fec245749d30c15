//! Diagnosis payload models.

use serde::{Deserialize, Serialize};

/// Returned for precautions/description when no mapping exists for a label.
pub const NOT_AVAILABLE: &str = "Not available";

/// Response payload for a single diagnosis request.
///
/// Serializes to exactly three string keys: `disease`, `precautions`,
/// `description`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosisResult {
    /// Condition label as returned by the classifier
    pub disease: String,
    /// Comma-joined precautions, or [`NOT_AVAILABLE`]
    pub precautions: String,
    /// Free-text description, or [`NOT_AVAILABLE`]
    pub description: String,
}

impl DiagnosisResult {
    /// Whether both precautions and description fell back to [`NOT_AVAILABLE`].
    pub fn is_unmapped(&self) -> bool {
        self.precautions == NOT_AVAILABLE && self.description == NOT_AVAILABLE
    }
}
