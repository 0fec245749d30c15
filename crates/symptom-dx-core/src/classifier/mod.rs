//! Classifier adapter: symptoms → predicted condition label.
//!
//! The model itself is opaque to callers. [`ForestModel`] is the shipped
//! backend; anything implementing [`SymptomClassifier`] can be injected into
//! [`DiagnosisService`](crate::DiagnosisService).

mod forest;

pub use forest::*;

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SymptomSet;

/// Per-request prediction failure. Never fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Empty feature vector: no symptoms given")]
    EmptyInput,

    #[error("Feature vector has {got} entries, but the model accepts at most {expected}")]
    Dimensionality { expected: usize, got: usize },

    #[error("Unknown symptom: '{0}'")]
    UnknownSymptom(String),

    #[error("Malformed feature at position {position}: {value}")]
    MalformedFeature { position: usize, value: String },

    #[error("Model backend failure: {0}")]
    Backend(String),
}

pub type PredictionResult<T> = Result<T, PredictionError>;

/// Model artifact loading errors. Fatal at startup.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// Metadata describing a loaded model artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierInfo {
    /// Hex SHA-256 of the artifact bytes
    pub sha256: String,
    pub n_features: usize,
    pub n_classes: usize,
    pub n_estimators: usize,
}

/// A pre-trained model predicting one condition label per symptom set.
///
/// Implementations must be safe to call from concurrent requests. Backends
/// that are not reentrant go through [`Serialized`].
pub trait SymptomClassifier: Send + Sync {
    /// Predict the condition label for a single sample. Must not mutate input.
    fn predict(&self, symptoms: &SymptomSet) -> PredictionResult<String>;

    /// Artifact metadata, when the backend has any.
    fn info(&self) -> Option<ClassifierInfo> {
        None
    }

    /// Symptom names the backend can encode; empty when it does not say.
    fn vocabulary(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A model that needs exclusive access while predicting.
pub trait ModelBackend: Send {
    fn predict_one(&mut self, symptoms: &SymptomSet) -> PredictionResult<String>;
}

/// Serializes access to a non-reentrant [`ModelBackend`].
pub struct Serialized<B> {
    backend: Mutex<B>,
}

impl<B: ModelBackend> Serialized<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }
}

impl<B: ModelBackend> SymptomClassifier for Serialized<B> {
    fn predict(&self, symptoms: &SymptomSet) -> PredictionResult<String> {
        let mut backend = self
            .backend
            .lock()
            .map_err(|e| PredictionError::Backend(format!("Lock poisoned: {}", e)))?;
        backend.predict_one(symptoms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Counts calls; panics if entered concurrently.
    struct CountingBackend {
        calls: usize,
        busy: bool,
    }

    impl ModelBackend for CountingBackend {
        fn predict_one(&mut self, symptoms: &SymptomSet) -> PredictionResult<String> {
            assert!(!self.busy, "backend entered concurrently");
            self.busy = true;
            self.calls += 1;
            let label = format!("label-{}", symptoms.len());
            self.busy = false;
            Ok(label)
        }
    }

    #[test]
    fn test_serialized_forwards_predictions() {
        let classifier = Serialized::new(CountingBackend {
            calls: 0,
            busy: false,
        });
        let symptoms = SymptomSet::from_names(["cough", "chills"]);

        assert_eq!(classifier.predict(&symptoms).unwrap(), "label-2");
        assert_eq!(classifier.predict(&symptoms).unwrap(), "label-2");
        assert!(classifier.info().is_none());
    }

    #[test]
    fn test_serialized_across_threads() {
        let classifier = Arc::new(Serialized::new(CountingBackend {
            calls: 0,
            busy: false,
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                thread::spawn(move || {
                    let symptoms = SymptomSet::from_names(["headache"]);
                    for _ in 0..50 {
                        assert_eq!(classifier.predict(&symptoms).unwrap(), "label-1");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(classifier.backend.lock().unwrap().calls, 400);
    }

    #[test]
    fn test_prediction_error_messages() {
        assert_eq!(
            PredictionError::UnknownSymptom("purple_toes".into()).to_string(),
            "Unknown symptom: 'purple_toes'"
        );
        assert_eq!(
            PredictionError::Dimensionality { expected: 17, got: 18 }.to_string(),
            "Feature vector has 18 entries, but the model accepts at most 17"
        );
    }
}
