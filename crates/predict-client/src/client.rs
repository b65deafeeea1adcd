//! Prediction Service Client

use crate::error::PredictError;
use crate::model::{SolarPredictRequest, SolarPredictResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Prediction client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Base URL of the prediction service
    pub base_url: String,
    /// Request timeout in milliseconds (default: 8000)
    pub timeout_ms: u64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 8000,
        }
    }
}

/// Client for the `/predict/solar` endpoint
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl PredictClient {
    pub fn new(config: PredictConfig) -> Result<Self, PredictError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        info!(
            "Prediction client targeting {} (timeout {}ms)",
            config.base_url, config.timeout_ms
        );
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate the readings and request a prediction
    pub async fn predict(
        &self,
        request: &SolarPredictRequest,
    ) -> Result<SolarPredictResponse, PredictError> {
        request.validate()?;

        let url = format!("{}/predict/solar", self.base_url);
        debug!("Requesting prediction from {}", url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Prediction service returned {}", status);
            return Err(PredictError::Status(status.as_u16()));
        }

        response.json::<SolarPredictResponse>().await.map_err(|e| {
            if e.is_timeout() {
                PredictError::Timeout(self.timeout_ms)
            } else {
                PredictError::Decode(e.to_string())
            }
        })
    }

    /// Check the service health endpoint
    pub async fn health(&self) -> Result<bool, PredictError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        Ok(response.status().is_success())
    }

    fn request_error(&self, err: reqwest::Error) -> PredictError {
        if err.is_timeout() {
            warn!("Prediction request timed out after {}ms", self.timeout_ms);
            PredictError::Timeout(self.timeout_ms)
        } else {
            warn!("Prediction request failed: {}", err);
            PredictError::Transport(err.to_string())
        }
    }
}
