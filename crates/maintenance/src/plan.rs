//! Maintenance Plan Types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Scheduled,
    Pending,
}

/// A planned maintenance task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlan {
    pub id: u32,
    pub title: String,
    pub date: NaiveDate,
    /// Cost of doing the work now
    pub cost: f64,
    /// Expected savings against letting the fault develop
    pub savings: f64,
    pub priority: Priority,
    pub status: PlanStatus,
}

/// Cost of a maintenance category handled reactively versus proactively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    pub category: String,
    pub reactive: f64,
    pub proactive: f64,
}

impl CostComparison {
    pub fn new(category: &str, reactive: f64, proactive: f64) -> Self {
        Self {
            category: category.to_string(),
            reactive,
            proactive,
        }
    }

    pub fn saving(&self) -> f64 {
        self.reactive - self.proactive
    }
}
