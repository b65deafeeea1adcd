//! Alert Records and Identifiers

use chrono::{DateTime, Utc};
use panel_telemetry::Measurement;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a raised alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        }
    }
}

/// A raised alert. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    /// Measurement that triggered the alert
    pub sensor_type: Measurement,
    /// Value of the triggering measurement
    pub value: f64,
    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
}

/// Source of unique alert identifiers
pub trait IdGenerator {
    fn next_id(&mut self) -> Uuid;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Counter-based identifiers (1, 2, 3, ...) for reproducible logs
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}
