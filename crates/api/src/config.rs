//! Application Configuration
//!
//! Built-in defaults, overridden by an optional `solar-monitor.toml` and then
//! by `SOLAR_MONITOR__<SECTION>__<KEY>` environment variables.

use crate::rate_limit::RateLimitConfig;
use alerting::{AlertConfig, AlertConfigError};
use live_feed::FeedConfig;
use predict_client::PredictConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default configuration file name (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "solar-monitor";

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid alerts section: {0}")]
    Alerts(#[from] AlertConfigError),

    #[error("feed.history_capacity must be > 0")]
    EmptyHistory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub alerts: AlertConfig,
    pub predict: PredictConfig,
    pub rate_limit: RateLimitConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the default file name and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from `file` (missing file is not an error) and the environment
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("SOLAR_MONITOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.alerts.validate()?;
        if config.feed.history_capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(config)
    }

    /// Log the loaded configuration
    pub fn log_config(&self) {
        info!("Configuration loaded:");
        info!("  server.addr          : {}", self.server.addr);
        info!("  feed.interval_ms     : {}", self.feed.interval_ms);
        info!("  feed.history_capacity: {}", self.feed.history_capacity);
        info!("  alerts               : {:?}", self.alerts);
        info!("  predict.base_url     : {}", self.predict.base_url);
        info!("  rate_limit           : {:?}", self.rate_limit);
    }
}
