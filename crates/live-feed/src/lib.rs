//! Live Reading Feed
//!
//! Drives the reading generator from a recurring timer, keeping the current
//! reading, a rolling history and the alert log in one owned monitor.

mod monitor;
mod scheduler;

pub use monitor::{lock, start, FeedConfig, SharedMonitor, SolarMonitor};
pub use scheduler::{
    ManualScheduler, ManualTaskHandle, Scheduler, Task, TaskHandle, TokioScheduler,
    TokioTaskHandle,
};
