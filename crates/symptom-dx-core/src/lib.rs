//! Symptom-DX Core Library
//!
//! Symptom-based diagnosis: a pre-trained classifier predicts a condition
//! label, which is resolved against precaution and description tables.
//!
//! # Architecture
//!
//! ```text
//! Request body ──► Handler ──► Classifier ──► Resolver ──► DiagnosisResult
//!                   │              │              │
//!                   │ 400          │ 500          ├─ Override rules (first match)
//!                   ▼              ▼              └─ Reference tables ("Not available" on miss)
//!              {"error": ...}  {"error": ...}
//! ```
//!
//! Tables and model are loaded once into a [`DiagnosisService`] at startup
//! and shared read-only afterwards.
//!
//! # Modules
//!
//! - [`models`]: Domain types (SymptomSet, DiagnosisResult)
//! - [`tables`]: Reference tables and their CSV loaders
//! - [`classifier`]: Classifier adapter and the decision-forest backend
//! - [`resolver`]: Label normalization, override rules, table fallback
//! - [`handler`]: Request validation and error → status mapping

pub mod classifier;
pub mod handler;
pub mod models;
pub mod resolver;
pub mod service;
pub mod tables;

// Re-export commonly used types
pub use classifier::{
    ClassifierInfo, ForestModel, ModelBackend, ModelLoadError, PredictionError, Serialized,
    SymptomClassifier,
};
pub use handler::{DiagnosisError, ValidationError};
pub use models::{DiagnosisResult, SymptomSet, NOT_AVAILABLE};
pub use resolver::{DiagnosisResolver, OverrideRule, OverrideRules};
pub use service::{DiagnosisService, ServiceConfig, StartupLoadError};
pub use tables::{ReferenceTable, ReferenceTables, TableError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SymptomDxError {
    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prediction error: {0}")]
    PredictionError(String),
}

impl From<StartupLoadError> for SymptomDxError {
    fn from(e: StartupLoadError) -> Self {
        SymptomDxError::LoadError(e.to_string())
    }
}

impl From<classifier::PredictionError> for SymptomDxError {
    fn from(e: classifier::PredictionError) -> Self {
        SymptomDxError::PredictionError(e.to_string())
    }
}

impl From<DiagnosisError> for SymptomDxError {
    fn from(e: DiagnosisError) -> Self {
        match e {
            DiagnosisError::Validation(v) => SymptomDxError::InvalidInput(v.to_string()),
            DiagnosisError::Prediction(p) => p.into(),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load the model and reference tables from the given files.
#[uniffi::export]
pub fn open_service(
    model_path: String,
    precautions_path: String,
    descriptions_path: String,
) -> Result<Arc<SymptomDxCore>, SymptomDxError> {
    let config = ServiceConfig {
        model_path: model_path.into(),
        precautions_path: precautions_path.into(),
        descriptions_path: descriptions_path.into(),
    };
    let service = DiagnosisService::load(&config)?;
    Ok(Arc::new(SymptomDxCore { service }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
#[derive(uniffi::Object)]
pub struct SymptomDxCore {
    service: DiagnosisService,
}

#[uniffi::export]
impl SymptomDxCore {
    /// Diagnose an ordered list of symptom identifiers.
    ///
    /// An empty list is a prediction error, as on the HTTP path.
    pub fn diagnose(&self, symptoms: Vec<String>) -> Result<FfiDiagnosis, SymptomDxError> {
        let result = self.service.diagnose(&SymptomSet::from(symptoms))?;
        Ok(result.into())
    }

    /// Resolve a condition label without running the classifier.
    pub fn resolve_label(&self, label: String) -> FfiDiagnosis {
        self.service.resolve(&label).into()
    }

    /// Hex SHA-256 of the loaded model artifact.
    pub fn model_fingerprint(&self) -> Option<String> {
        self.service.classifier_info().map(|info| info.sha256)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe diagnosis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiagnosis {
    pub disease: String,
    pub precautions: String,
    pub description: String,
}

impl From<DiagnosisResult> for FfiDiagnosis {
    fn from(result: DiagnosisResult) -> Self {
        Self {
            disease: result.disease,
            precautions: result.precautions,
            description: result.description,
        }
    }
}
