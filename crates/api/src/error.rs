//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use maintenance::MaintenanceError;
use metrics_exporter_prometheus::BuildError;
use predict_client::PredictError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Alert {0} not found")]
    AlertNotFound(Uuid),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error(transparent)]
    Maintenance(#[from] MaintenanceError),
}

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("Failed to build application state: {0}")]
    State(#[from] ApiError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Predict(PredictError::InvalidInput { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Predict(PredictError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Predict(_) => StatusCode::BAD_GATEWAY,
            ApiError::Maintenance(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
