//! `GET /api/health`: liveness plus loaded-model metadata.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use symptom_dx_core::ClassifierInfo;

use crate::api::types::ApiContext;
use crate::config::APP_VERSION;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: String,
    pub model: Option<ClassifierInfo>,
}

pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: APP_VERSION,
        started_at: ctx.started_at.clone(),
        model: ctx.service.classifier_info(),
    })
}
