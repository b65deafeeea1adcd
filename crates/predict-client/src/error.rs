//! Prediction Client Error Types

use thiserror::Error;

/// Errors raised while requesting a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    /// Request field outside the accepted bounds
    #[error("{field} value {value} is invalid: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// No response within the configured timeout
    #[error("Prediction service did not respond within {0}ms")]
    Timeout(u64),

    /// Non-success HTTP status from the service
    #[error("Prediction service returned HTTP {0}")]
    Status(u16),

    /// Connection or request failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Invalid prediction response: {0}")]
    Decode(String),
}
