//! Solar Panel Telemetry
//!
//! Synthetic sensor readings for a solar installation: value ranges and
//! rounding, threshold-based status classification, and a generator driven
//! by injectable random and clock sources.

mod generator;
mod reading;
mod source;

pub use generator::ReadingGenerator;
pub use reading::{
    classify, Measurement, MeasurementRange, SensorReading, Status, Thresholds, CRITICAL,
    WARNING,
};
pub use source::{Clock, ManualClock, RandomSource, SequenceRandom, SystemClock, ThreadRandom};

/// Measurement ranges used by the generator
pub mod ranges {
    use crate::MeasurementRange;

    /// Panel temperature (°C), 0.1 resolution
    pub const TEMPERATURE: MeasurementRange = MeasurementRange::new(25.0, 85.0, 10.0);
    /// Irradiance (W/m²), integer resolution
    pub const IRRADIANCE: MeasurementRange = MeasurementRange::new(200.0, 1100.0, 1.0);
    /// Output efficiency (%), 0.1 resolution
    pub const OUTPUT_EFFICIENCY: MeasurementRange = MeasurementRange::new(60.0, 98.0, 10.0);
    /// Vibration (g), 0.01 resolution
    pub const VIBRATION: MeasurementRange = MeasurementRange::new(0.1, 5.0, 100.0);
}
