//! Sensor Reading and Status Classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

/// Measurements that take part in status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    Temperature,
    Efficiency,
    Vibration,
}

impl Measurement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::Temperature => "temperature",
            Measurement::Efficiency => "efficiency",
            Measurement::Vibration => "vibration",
        }
    }
}

/// One threshold tier. Temperature and vibration trip above their limit,
/// efficiency trips below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Temperature limit (°C)
    pub temperature: f64,
    /// Output efficiency floor (%)
    pub efficiency: f64,
    /// Vibration limit (g)
    pub vibration: f64,
}

/// Critical tier
pub const CRITICAL: Thresholds = Thresholds {
    temperature: 70.0,
    efficiency: 70.0,
    vibration: 3.5,
};

/// Warning tier
pub const WARNING: Thresholds = Thresholds {
    temperature: 55.0,
    efficiency: 80.0,
    vibration: 2.5,
};

impl Thresholds {
    pub fn temperature_exceeded(&self, temperature: f64) -> bool {
        temperature > self.temperature
    }

    pub fn efficiency_exceeded(&self, efficiency: f64) -> bool {
        efficiency < self.efficiency
    }

    pub fn vibration_exceeded(&self, vibration: f64) -> bool {
        vibration > self.vibration
    }

    /// First measurement breaching this tier, in temperature, efficiency,
    /// vibration order
    pub fn first_breach(
        &self,
        temperature: f64,
        efficiency: f64,
        vibration: f64,
    ) -> Option<Measurement> {
        if self.temperature_exceeded(temperature) {
            Some(Measurement::Temperature)
        } else if self.efficiency_exceeded(efficiency) {
            Some(Measurement::Efficiency)
        } else if self.vibration_exceeded(vibration) {
            Some(Measurement::Vibration)
        } else {
            None
        }
    }

    pub fn breached(&self, temperature: f64, efficiency: f64, vibration: f64) -> bool {
        self.first_breach(temperature, efficiency, vibration).is_some()
    }
}

/// Classify a set of measurements. Critical is checked before warning.
pub fn classify(temperature: f64, efficiency: f64, vibration: f64) -> Status {
    if CRITICAL.breached(temperature, efficiency, vibration) {
        Status::Critical
    } else if WARNING.breached(temperature, efficiency, vibration) {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// Half-open value range `[min, max)` with a fixed rounding resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    pub min: f64,
    pub max: f64,
    /// Rounding steps per unit (10.0 rounds to 0.1)
    pub scale: f64,
}

impl MeasurementRange {
    pub const fn new(min: f64, max: f64, scale: f64) -> Self {
        Self { min, max, scale }
    }

    /// Map a uniform draw in `[0, 1)` onto the range and round it
    pub fn sample(&self, draw: f64) -> f64 {
        let draw = draw.clamp(0.0, 1.0);
        self.round(draw * (self.max - self.min) + self.min)
    }

    /// Round to the range resolution. A value that would land on the
    /// exclusive upper bound is stepped down one unit.
    pub fn round(&self, value: f64) -> f64 {
        let rounded = (value * self.scale).round() / self.scale;
        if rounded >= self.max {
            (self.max * self.scale - 1.0) / self.scale
        } else {
            rounded
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// A single sensor sample. The status is derived from the other fields at
/// construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    temperature: f64,
    irradiance: f64,
    output_efficiency: f64,
    vibration: f64,
    timestamp: DateTime<Utc>,
    status: Status,
}

impl SensorReading {
    pub fn new(
        temperature: f64,
        irradiance: f64,
        output_efficiency: f64,
        vibration: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            temperature,
            irradiance,
            output_efficiency,
            vibration,
            timestamp,
            status: classify(temperature, output_efficiency, vibration),
        }
    }

    /// Same measurements observed at another instant
    pub fn with_timestamp(&self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn irradiance(&self) -> f64 {
        self.irradiance
    }

    pub fn output_efficiency(&self) -> f64 {
        self.output_efficiency
    }

    pub fn vibration(&self) -> f64 {
        self.vibration
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Value of a classified measurement
    pub fn value_of(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Efficiency => self.output_efficiency,
            Measurement::Vibration => self.vibration,
        }
    }

    /// Status of one measurement taken on its own
    pub fn measurement_status(&self, measurement: Measurement) -> Status {
        let value = self.value_of(measurement);
        let tripped = |tier: &Thresholds| match measurement {
            Measurement::Temperature => tier.temperature_exceeded(value),
            Measurement::Efficiency => tier.efficiency_exceeded(value),
            Measurement::Vibration => tier.vibration_exceeded(value),
        };

        if tripped(&CRITICAL) {
            Status::Critical
        } else if tripped(&WARNING) {
            Status::Warning
        } else {
            Status::Normal
        }
    }
}
