//! `POST /` and `POST /api/diagnose`: symptoms in, diagnosis out.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use symptom_dx_core::handler::parse_body;
use symptom_dx_core::DiagnosisResult;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Takes the raw body so that a missing `Content-Type` or invalid JSON maps
/// onto the same `{"error": ...}` shape as every other failure.
pub async fn diagnose(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("diagnose", %request_id);

    span.in_scope(|| -> Result<_, ApiError> {
        let payload = parse_body(&body)?;
        let result = ctx.service.handle(&payload)?;
        Ok(Json(result))
    })
}
