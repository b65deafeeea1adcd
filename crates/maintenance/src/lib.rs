//! Maintenance Planner
//!
//! Planned maintenance tasks with cost and savings totals, ROI, a
//! reactive-versus-proactive cost comparison, and report export.

mod plan;
mod planner;

pub use plan::{CostComparison, MaintenancePlan, PlanStatus, Priority};
pub use planner::{ExportFormat, MaintenancePlanner};

use thiserror::Error;

/// Maintenance planner errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MaintenanceError {
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}
