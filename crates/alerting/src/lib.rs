//! Alerting System
//!
//! Turns sensor readings into alert records and keeps them in a capped,
//! newest-first log with per-alert resolution tracking.

mod classifier;
mod log;
mod record;

pub use classifier::{AlertClassifier, AlertConfig, AlertConfigError, AlertTrigger};
pub use log::{AlertLog, DEFAULT_LOG_CAPACITY};
pub use record::{AlertRecord, IdGenerator, SequentialIds, Severity, UuidGenerator};
