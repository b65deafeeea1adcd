//! Alert Classifier Implementation

use crate::log::{AlertLog, DEFAULT_LOG_CAPACITY};
use crate::record::{AlertRecord, IdGenerator, Severity, UuidGenerator};
use panel_telemetry::{
    Clock, Measurement, RandomSource, SensorReading, Status, SystemClock, ThreadRandom, CRITICAL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Chance that a warning reading raises an alert (default: 0.3)
    pub warning_probability: f64,
    /// Maximum alerts retained in the log (default: 50)
    pub log_capacity: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            warning_probability: 0.3,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Invalid alert configuration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AlertConfigError {
    #[error("warning_probability {0} must be within [0, 1]")]
    Probability(f64),
    #[error("log_capacity must be > 0")]
    EmptyLog,
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), AlertConfigError> {
        if !(0.0..=1.0).contains(&self.warning_probability) {
            return Err(AlertConfigError::Probability(self.warning_probability));
        }
        if self.log_capacity == 0 {
            return Err(AlertConfigError::EmptyLog);
        }
        Ok(())
    }

    /// A warning is raised when the draw exceeds `1 - warning_probability`
    pub fn warning_raised(&self, draw: f64) -> bool {
        draw > 1.0 - self.warning_probability
    }
}

/// What an alert reports about the reading that raised it
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTrigger {
    pub sensor_type: Measurement,
    pub value: f64,
    pub message: String,
}

impl AlertTrigger {
    /// Trigger for a critical reading, checking temperature, then
    /// efficiency, then vibration
    pub fn critical(reading: &SensorReading) -> Self {
        let sensor_type = CRITICAL
            .first_breach(
                reading.temperature(),
                reading.output_efficiency(),
                reading.vibration(),
            )
            .unwrap_or(Measurement::Vibration);
        let value = reading.value_of(sensor_type);

        let message = match sensor_type {
            Measurement::Temperature => format!("High temperature detected: {value}°C"),
            Measurement::Efficiency => format!("Low efficiency detected: {value}%"),
            Measurement::Vibration => format!("High vibration detected: {value}g"),
        };

        Self {
            sensor_type,
            value,
            message,
        }
    }

    /// Trigger for a warning reading
    pub fn efficiency_anomaly(reading: &SensorReading) -> Self {
        let value = reading.output_efficiency();
        Self {
            sensor_type: Measurement::Efficiency,
            value,
            message: format!("Sensor anomaly detected - efficiency at {value}%"),
        }
    }
}

/// Observes readings and records alerts into its log
pub struct AlertClassifier<R = ThreadRandom, I = UuidGenerator, C = SystemClock> {
    config: AlertConfig,
    random: R,
    ids: I,
    clock: C,
    log: AlertLog,
}

impl AlertClassifier {
    /// Create a classifier with an entropy-seeded RNG, v4 ids and the system clock
    pub fn new(config: AlertConfig) -> Self {
        Self::with_sources(config, ThreadRandom::default(), UuidGenerator, SystemClock)
    }
}

impl Default for AlertClassifier {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

impl<R: RandomSource, I: IdGenerator, C: Clock> AlertClassifier<R, I, C> {
    pub fn with_sources(config: AlertConfig, random: R, ids: I, clock: C) -> Self {
        info!("Creating alert classifier with config: {:?}", config);
        let log = AlertLog::new(config.log_capacity);
        Self {
            config,
            random,
            ids,
            clock,
            log,
        }
    }

    /// Classify a reading, logging and returning the alert it raised, if any.
    ///
    /// Critical readings always raise an alert. Warning readings raise one
    /// with the configured probability. Normal readings never do.
    pub fn on_reading(&mut self, reading: &SensorReading) -> Option<&AlertRecord> {
        let (severity, trigger) = match reading.status() {
            Status::Critical => (Severity::Critical, AlertTrigger::critical(reading)),
            Status::Warning => {
                let draw = self.random.next_f64();
                if !self.config.warning_raised(draw) {
                    debug!("Warning suppressed: draw {:.3}", draw);
                    metrics::counter!("alerts_suppressed_total").increment(1);
                    return None;
                }
                (Severity::Warning, AlertTrigger::efficiency_anomaly(reading))
            }
            Status::Normal => return None,
        };

        let record = AlertRecord {
            id: self.ids.next_id(),
            severity,
            message: trigger.message,
            sensor_type: trigger.sensor_type,
            value: trigger.value,
            timestamp: self.clock.now(),
        };

        match severity {
            Severity::Critical => warn!("Alert raised: {}", record.message),
            Severity::Warning => info!("Alert raised: {}", record.message),
        }
        metrics::counter!("alerts_raised_total", "severity" => severity.as_str()).increment(1);

        self.log.push(record);
        self.log.newest()
    }

    pub fn log(&self) -> &AlertLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut AlertLog {
        &mut self.log
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Clear all logged alerts
    pub fn clear(&mut self) {
        self.log.clear();
    }
}
