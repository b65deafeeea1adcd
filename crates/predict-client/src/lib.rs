//! Solar Prediction Client
//!
//! Validates hand-entered inverter readings and forwards them to the
//! external prediction service.

mod client;
mod error;
mod model;

pub use client::{PredictClient, PredictConfig};
pub use error::PredictError;
pub use model::{RiskLevel, SolarPredictRequest, SolarPredictResponse};
