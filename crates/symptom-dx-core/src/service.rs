//! The diagnosis service: classifier + resolver, built once at startup.
//!
//! Lifecycle: [`DiagnosisService::load`] (or `new` for injected parts) runs
//! before any request is served; the service is then shared read-only,
//! typically behind an `Arc`. Dropping it releases the model and tables.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::classifier::{
    ClassifierInfo, ForestModel, ModelLoadError, PredictionResult, SymptomClassifier,
};
use crate::handler::{extract_symptoms, DiagnosisError};
use crate::models::{DiagnosisResult, SymptomSet};
use crate::resolver::{DiagnosisResolver, OverrideRules, Resolution};
use crate::tables::{ReferenceTables, TableError};

pub const DEFAULT_MODEL_PATH: &str = "./disease_model.json";
pub const DEFAULT_PRECAUTIONS_PATH: &str = "./data/Disease precaution.csv";
pub const DEFAULT_DESCRIPTIONS_PATH: &str = "./data/DiseaseDescription.csv";

/// Startup failures. The process must not serve traffic after one of these.
#[derive(Error, Debug)]
pub enum StartupLoadError {
    #[error("Reference tables failed to load: {0}")]
    Tables(#[from] TableError),

    #[error("Classifier failed to load: {0}")]
    Model(#[from] ModelLoadError),
}

/// Artifact locations for [`DiagnosisService::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub precautions_path: PathBuf,
    pub descriptions_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.into(),
            precautions_path: DEFAULT_PRECAUTIONS_PATH.into(),
            descriptions_path: DEFAULT_DESCRIPTIONS_PATH.into(),
        }
    }
}

/// Immutable service object passed into the request path.
#[derive(Clone)]
pub struct DiagnosisService {
    classifier: Arc<dyn SymptomClassifier>,
    resolver: DiagnosisResolver,
}

impl std::fmt::Debug for DiagnosisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosisService")
            .field("classifier", &self.classifier.info())
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl DiagnosisService {
    /// Assemble a service from already-built parts.
    pub fn new(
        classifier: Arc<dyn SymptomClassifier>,
        tables: ReferenceTables,
        overrides: OverrideRules,
    ) -> Self {
        Self {
            classifier,
            resolver: DiagnosisResolver::new(tables, overrides),
        }
    }

    /// One-time initialization from the configured files.
    pub fn load(config: &ServiceConfig) -> Result<Self, StartupLoadError> {
        let tables = ReferenceTables::load(&config.precautions_path, &config.descriptions_path)?;
        let model = ForestModel::load(&config.model_path)?;
        Ok(Self::new(Arc::new(model), tables, OverrideRules::default()))
    }

    /// Full request path: validate the body, predict, resolve.
    pub fn handle(&self, payload: &Value) -> Result<DiagnosisResult, DiagnosisError> {
        let symptoms = extract_symptoms(payload).map_err(|e| {
            tracing::debug!(error = %e, "Rejected diagnosis request");
            e
        })?;
        Ok(self.diagnose(&symptoms)?)
    }

    /// Predict a label for the symptoms and resolve it.
    pub fn diagnose(&self, symptoms: &SymptomSet) -> PredictionResult<DiagnosisResult> {
        tracing::debug!(symptoms = ?symptoms.entries(), "Predicting");

        let label = self.classifier.predict(symptoms).map_err(|e| {
            tracing::warn!(error = %e, "Prediction failed");
            e
        })?;

        let (result, resolution) = self.resolver.resolve_traced(&label);
        match &resolution {
            Resolution::Override { rule } => {
                tracing::info!(disease = %label, rule = %rule, "Diagnosis resolved by override");
            }
            Resolution::Table { .. } if result.is_unmapped() => {
                tracing::warn!(disease = %label, "No reference data for predicted label");
            }
            Resolution::Table {
                precautions_hit,
                descriptions_hit,
            } => {
                tracing::info!(
                    disease = %label,
                    precautions_hit,
                    descriptions_hit,
                    "Diagnosis resolved from tables"
                );
            }
        }

        Ok(result)
    }

    /// Resolve a label directly, skipping the classifier.
    pub fn resolve(&self, label: &str) -> DiagnosisResult {
        self.resolver.resolve(label)
    }

    pub fn classifier_info(&self) -> Option<ClassifierInfo> {
        self.classifier.info()
    }

    /// Symptom names the loaded classifier accepts, sorted; empty if unknown.
    pub fn symptom_vocabulary(&self) -> Vec<String> {
        self.classifier.vocabulary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PredictionError;
    use crate::handler::ValidationError;
    use crate::models::NOT_AVAILABLE;
    use crate::resolver::DIABETES_PRECAUTIONS;
    use crate::tables::ReferenceTable;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed label (or error) and counts invocations.
    struct FixedClassifier {
        outcome: Result<String, PredictionError>,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn label(label: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(label.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: PredictionError) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(err),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SymptomClassifier for FixedClassifier {
        fn predict(&self, _symptoms: &SymptomSet) -> PredictionResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn tables() -> ReferenceTables {
        let precautions: ReferenceTable = [
            ("Fungal infection", "bath twice, use detol or neem in bathing water, keep infected area dry, use clean cloths"),
            ("Gestational Diabetes", "from the table"),
        ]
        .into_iter()
        .collect();
        let descriptions: ReferenceTable = [(
            "Fungal infection",
            "In humans, fungal infections occur when an invading fungus takes over an area of the body.",
        )]
        .into_iter()
        .collect();
        ReferenceTables::new(precautions, descriptions)
    }

    fn service(classifier: Arc<FixedClassifier>) -> DiagnosisService {
        DiagnosisService::new(classifier, tables(), OverrideRules::default())
    }

    #[test]
    fn test_handle_success() {
        let classifier = FixedClassifier::label("Fungal infection");
        let service = service(classifier.clone());

        let result = service
            .handle(&json!({"symptoms": ["itching", "skin_rash", "nodal_skin_eruptions"]}))
            .unwrap();

        assert_eq!(result.disease, "Fungal infection");
        assert!(result.precautions.starts_with("bath twice"));
        assert!(result.description.starts_with("In humans"));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_missing_symptoms_skips_classifier() {
        let classifier = FixedClassifier::label("Fungal infection");
        let service = service(classifier.clone());

        let err = service.handle(&json!({})).unwrap_err();

        assert_eq!(err, DiagnosisError::Validation(ValidationError::MissingSymptoms));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_body(), json!({"error": "No symptoms provided"}));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handle_prediction_failure() {
        let classifier = FixedClassifier::failing(PredictionError::Dimensionality { expected: 17, got: 20 });
        let service = service(classifier);

        let err = service.handle(&json!({"symptoms": ["a"]})).unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.error_body(),
            json!({"error": "Feature vector has 20 entries, but the model accepts at most 17"})
        );
    }

    #[test]
    fn test_handle_override_precedence() {
        let service = service(FixedClassifier::label("Gestational Diabetes"));
        let result = service.handle(&json!({"symptoms": ["polyuria"]})).unwrap();

        assert_eq!(result.disease, "Gestational Diabetes");
        assert_eq!(result.precautions, DIABETES_PRECAUTIONS);
    }

    #[test]
    fn test_handle_unmapped_label() {
        let service = service(FixedClassifier::label("zzz_unknown"));
        let result = service.handle(&json!({"symptoms": ["cough"]})).unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "disease": "zzz_unknown",
                "precautions": NOT_AVAILABLE,
                "description": NOT_AVAILABLE
            })
        );
    }

    #[test]
    fn test_symptom_vocabulary_from_classifier() {
        let injected = service(FixedClassifier::label("Fungal infection"));
        assert!(injected.symptom_vocabulary().is_empty());

        let artifact = json!({
            "n_features": 1,
            "symptom_codes": {"itching": 1, " Chills": 2},
            "classes": ["Fungal infection"],
            "estimators": [{"nodes": [{"leaf": {"class": 0}}]}]
        });
        let model = ForestModel::from_bytes(artifact.to_string().as_bytes()).unwrap();
        let loaded = DiagnosisService::new(Arc::new(model), tables(), OverrideRules::default());
        assert_eq!(loaded.symptom_vocabulary(), vec!["chills", "itching"]);
    }

    #[test]
    fn test_handle_is_idempotent() {
        let service = service(FixedClassifier::label("Fungal infection"));
        let payload = json!({"symptoms": ["itching"]});
        assert_eq!(service.handle(&payload).unwrap(), service.handle(&payload).unwrap());
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        let service = Arc::new(service(FixedClassifier::label("Fungal infection")));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.diagnose(&SymptomSet::from_names(["itching"])).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().disease, "Fungal infection");
        }
    }

    #[test]
    fn test_load_missing_files_is_fatal() {
        let config = ServiceConfig {
            model_path: "/nonexistent/model.json".into(),
            precautions_path: "/nonexistent/p.csv".into(),
            descriptions_path: "/nonexistent/d.csv".into(),
        };
        let err = DiagnosisService::load(&config).unwrap_err();
        assert!(matches!(err, StartupLoadError::Tables(TableError::Io { .. })));
    }

    #[test]
    fn test_default_config_paths() {
        let config = ServiceConfig::default();
        assert!(config.model_path.ends_with("disease_model.json"));
        assert!(config.precautions_path.ends_with("Disease precaution.csv"));
        assert!(config.descriptions_path.ends_with("DiseaseDescription.csv"));
    }
}
