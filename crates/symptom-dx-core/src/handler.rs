//! Request validation and error mapping for the diagnosis endpoint.
//!
//! Transport-agnostic: callers hand in the decoded JSON body and get back
//! either a [`DiagnosisResult`](crate::models::DiagnosisResult) or a
//! [`DiagnosisError`] that knows its HTTP status and JSON error body.

use serde_json::{json, Value};
use thiserror::Error;

use crate::classifier::PredictionError;
use crate::models::SymptomSet;

/// Request-shape failures. Client errors; the classifier is never invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No symptoms provided")]
    MissingSymptoms,

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),
}

/// Per-request failure of the diagnosis path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl DiagnosisError {
    /// 400 for validation failures, 500 for prediction failures.
    pub fn status_code(&self) -> u16 {
        match self {
            DiagnosisError::Validation(_) => 400,
            DiagnosisError::Prediction(_) => 500,
        }
    }

    /// `{"error": <message>}`
    pub fn error_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Decode a raw request body. An empty body counts as "no symptoms".
pub fn parse_body(bytes: &[u8]) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::MissingSymptoms);
    }
    serde_json::from_slice(bytes).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

/// Pull the `symptoms` field out of a request body, unmodified.
///
/// A body that is not an object, a missing key, and an explicit `null` are
/// all treated as absent.
pub fn extract_symptoms(payload: &Value) -> Result<SymptomSet, ValidationError> {
    match payload.get("symptoms") {
        None | Some(Value::Null) => Err(ValidationError::MissingSymptoms),
        Some(symptoms) => Ok(SymptomSet::from_value(symptoms.clone())),
    }
}
