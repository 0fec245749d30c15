use std::sync::Arc;

use anyhow::Context;
use symptom_dx_core::DiagnosisService;
use symptom_dx_server::api::ApiContext;
use symptom_dx_server::config::{self, ServerConfig, APP_NAME, APP_VERSION};
use symptom_dx_server::server::start_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{} starting", APP_NAME, APP_VERSION);

    let config = ServerConfig::from_env()?;

    // Nothing is served unless both tables and the model load.
    let service = DiagnosisService::load(&config.service).with_context(|| {
        format!(
            "loading model {} and tables {}, {}",
            config.service.model_path.display(),
            config.service.precautions_path.display(),
            config.service.descriptions_path.display()
        )
    })?;

    let ctx = ApiContext::from_service(Arc::new(service));
    let mut server = start_server(ctx, config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    server.shutdown();
    server.wait().await;
    Ok(())
}
