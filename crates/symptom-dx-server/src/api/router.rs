//! Router assembly.
//!
//! The diagnosis handler is mounted at `/` for existing clients and at
//! `/api/diagnose` alongside the other `/api/` routes. CORS is permissive:
//! the browser front end is served from a different origin.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", post(endpoints::diagnose::diagnose))
        .route("/api/diagnose", post(endpoints::diagnose::diagnose))
        .route("/api/symptoms", post(endpoints::symptoms::extract))
        .route("/api/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
