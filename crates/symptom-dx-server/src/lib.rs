//! HTTP front end for the symptom diagnosis service.
//!
//! - [`config`]: environment-driven configuration and app constants
//! - [`api`]: axum router, endpoints and error mapping
//! - [`server`]: bind, serve, graceful shutdown

pub mod api;
pub mod config;
pub mod server;
