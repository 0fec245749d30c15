//! `POST /api/symptoms`: free text in, vocabulary symptoms out.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use symptom_dx_extract::ExtractedSymptoms;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

pub const NO_TEXT: &str = "No text provided";

pub async fn extract(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<ExtractedSymptoms>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let text = payload
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(NO_TEXT.into()))?;

    let extracted = ctx.extractor.extract(text);
    tracing::debug!(found = extracted.symptoms.len(), "Extracted symptoms from text");
    Ok(Json(extracted))
}
