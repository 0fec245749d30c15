use std::net::SocketAddr;
use std::path::PathBuf;

use symptom_dx_core::ServiceConfig;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "symptom-dx";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port existing browser clients already target.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

pub const ENV_BIND: &str = "SYMPTOM_DX_BIND";
pub const ENV_MODEL: &str = "SYMPTOM_DX_MODEL";
pub const ENV_PRECAUTIONS: &str = "SYMPTOM_DX_PRECAUTIONS";
pub const ENV_DESCRIPTIONS: &str = "SYMPTOM_DX_DESCRIPTIONS";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "symptom_dx_server=info,symptom_dx_core=info,tower_http=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub service: ServiceConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_value = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: ENV_BIND,
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let defaults = ServiceConfig::default();
        let path_or = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Ok(Self {
            bind,
            service: ServiceConfig {
                model_path: path_or(ENV_MODEL, defaults.model_path),
                precautions_path: path_or(ENV_PRECAUTIONS, defaults.precautions_path),
                descriptions_path: path_or(ENV_DESCRIPTIONS, defaults.descriptions_path),
            },
        })
    }
}
