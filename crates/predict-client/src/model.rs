//! Prediction Request and Response

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Inverter readings sent for prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPredictRequest {
    /// DC power (W)
    pub dc_power: f64,
    /// AC power (W)
    pub ac_power: f64,
    /// Ambient temperature (°C)
    pub ambient_temperature: f64,
    /// Module temperature (°C)
    pub module_temperature: f64,
    /// Solar irradiation (W/m²)
    pub irradiation: f64,
}

impl Default for SolarPredictRequest {
    fn default() -> Self {
        Self {
            dc_power: 1200.0,
            ac_power: 1100.0,
            ambient_temperature: 28.0,
            module_temperature: 40.0,
            irradiation: 900.0,
        }
    }
}

impl SolarPredictRequest {
    /// Check the bounds the prediction service enforces
    pub fn validate(&self) -> Result<(), PredictError> {
        positive("dc_power", self.dc_power)?;
        positive("ac_power", self.ac_power)?;
        positive("irradiation", self.irradiation)?;
        within("ambient_temperature", self.ambient_temperature, -40.0, 80.0)?;
        within("module_temperature", self.module_temperature, -40.0, 120.0)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), PredictError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PredictError::InvalidInput {
            field,
            value,
            reason: "must be greater than 0",
        })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), PredictError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PredictError::InvalidInput {
            field,
            value,
            reason: "out of realistic bounds",
        })
    }
}

/// Failure risk reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Prediction returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPredictResponse {
    pub efficiency_prediction: f64,
    pub anomaly_score: f64,
    pub anomaly_label: i64,
    pub risk_level: RiskLevel,
}
