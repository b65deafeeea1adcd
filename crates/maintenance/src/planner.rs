//! Maintenance Planner Implementation

use crate::plan::{CostComparison, MaintenancePlan, PlanStatus, Priority};
use crate::MaintenanceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Report export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Text,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Text => "text/plain",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "solara-maintenance-report.csv",
            ExportFormat::Text => "solara-maintenance-report.txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = MaintenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" | "excel" => Ok(ExportFormat::Csv),
            "text" | "txt" | "pdf" => Ok(ExportFormat::Text),
            other => Err(MaintenanceError::UnknownFormat(other.to_string())),
        }
    }
}

/// Holds planned maintenance and derives cost figures from it
#[derive(Debug, Clone, Default)]
pub struct MaintenancePlanner {
    plans: Vec<MaintenancePlan>,
    comparison: Vec<CostComparison>,
}

impl MaintenancePlanner {
    pub fn new(plans: Vec<MaintenancePlan>, comparison: Vec<CostComparison>) -> Self {
        Self { plans, comparison }
    }

    /// Planner preloaded with the sample plans shown on the dashboard
    pub fn with_sample_plans() -> Self {
        let plan = |id, title: &str, (y, m, d), cost, savings, priority, status| MaintenancePlan {
            id,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            cost,
            savings,
            priority,
            status,
        };

        Self::new(
            vec![
                plan(1, "Panel Array A - Cleaning", (2026, 2, 20), 450.0, 1200.0, Priority::High, PlanStatus::Scheduled),
                plan(2, "Inverter #3 - Replacement", (2026, 3, 5), 2800.0, 8500.0, Priority::Critical, PlanStatus::Pending),
                plan(3, "Wiring Check - Section B", (2026, 3, 15), 200.0, 600.0, Priority::Medium, PlanStatus::Scheduled),
                plan(4, "Panel Array C - Realignment", (2026, 4, 1), 1500.0, 4200.0, Priority::Low, PlanStatus::Pending),
            ],
            vec![
                CostComparison::new("Panel Cleaning", 1800.0, 450.0),
                CostComparison::new("Inverter Repair", 12000.0, 2800.0),
                CostComparison::new("Wiring", 900.0, 200.0),
                CostComparison::new("Realignment", 6000.0, 1500.0),
            ],
        )
    }

    /// Add a plan, assigning the next id
    pub fn add_plan(&mut self, mut plan: MaintenancePlan) -> Result<u32, MaintenanceError> {
        if plan.title.trim().is_empty() {
            return Err(MaintenanceError::InvalidPlan("title is empty".to_string()));
        }
        if !(plan.cost >= 0.0 && plan.savings >= 0.0) {
            return Err(MaintenanceError::InvalidPlan(
                "cost and savings must be non-negative".to_string(),
            ));
        }

        plan.id = self.plans.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        info!("Maintenance plan added: {} ({})", plan.title, plan.id);
        let id = plan.id;
        self.plans.push(plan);
        Ok(id)
    }

    pub fn plans(&self) -> &[MaintenancePlan] {
        &self.plans
    }

    pub fn cost_comparison(&self) -> &[CostComparison] {
        &self.comparison
    }

    pub fn total_cost(&self) -> f64 {
        self.plans.iter().map(|p| p.cost).sum()
    }

    pub fn total_savings(&self) -> f64 {
        self.plans.iter().map(|p| p.savings).sum()
    }

    /// Return on the planned spend, in percent. None when nothing is spent.
    pub fn roi_percent(&self) -> Option<f64> {
        let cost = self.total_cost();
        if cost == 0.0 {
            return None;
        }
        Some((self.total_savings() - cost) / cost * 100.0)
    }

    pub fn export(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Csv => self.export_csv(),
            ExportFormat::Text => self.export_text(),
        }
    }

    pub fn export_csv(&self) -> String {
        let rows: Vec<String> = self
            .plans
            .iter()
            .map(|p| format!("{},{},{},{}", csv_field(&p.title), p.date, p.cost, p.savings))
            .collect();
        format!("Title,Date,Cost,Savings\n{}", rows.join("\n"))
    }

    pub fn export_text(&self) -> String {
        let lines: Vec<String> = self
            .plans
            .iter()
            .map(|p| format!("{} - {} - ${}", p.title, p.date, p.cost))
            .collect();
        format!("SOLARA.AI Maintenance Report\n\n{}", lines.join("\n"))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_totals() {
        let planner = MaintenancePlanner::with_sample_plans();
        assert_eq!(planner.plans().len(), 4);
        assert_eq!(planner.total_cost(), 4950.0);
        assert_eq!(planner.total_savings(), 14500.0);

        let roi = planner.roi_percent().unwrap();
        assert_eq!(roi.round(), 193.0);
    }

    #[test]
    fn test_roi_without_cost() {
        assert_eq!(MaintenancePlanner::default().roi_percent(), None);
    }

    #[test]
    fn test_export_csv() {
        let planner = MaintenancePlanner::with_sample_plans();
        let csv = planner.export_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Title,Date,Cost,Savings"));
        assert_eq!(lines.next(), Some("Panel Array A - Cleaning,2026-02-20,450,1200"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_export_text() {
        let planner = MaintenancePlanner::with_sample_plans();
        let text = planner.export(ExportFormat::Text);
        assert!(text.starts_with("SOLARA.AI Maintenance Report\n\n"));
        assert!(text.contains("Inverter #3 - Replacement - 2026-03-05 - $2800"));
    }

    #[test]
    fn test_csv_quotes_commas() {
        assert_eq!(csv_field("Array A, west"), "\"Array A, west\"");
        assert_eq!(csv_field("say \"hi\", ok"), "\"say \"\"hi\"\", ok\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_add_plan_assigns_id() {
        let mut planner = MaintenancePlanner::with_sample_plans();
        let id = planner
            .add_plan(MaintenancePlan {
                id: 0,
                title: "Combiner Box - Inspection".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
                cost: 150.0,
                savings: 400.0,
                priority: Priority::Medium,
                status: PlanStatus::Scheduled,
            })
            .unwrap();
        assert_eq!(id, 5);
        assert_eq!(planner.total_cost(), 5100.0);
    }

    #[test]
    fn test_add_plan_rejects_negative_cost() {
        let mut planner = MaintenancePlanner::default();
        let result = planner.add_plan(MaintenancePlan {
            id: 0,
            title: "Bad".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            cost: -1.0,
            savings: 0.0,
            priority: Priority::Low,
            status: PlanStatus::Pending,
        });
        assert!(matches!(result, Err(MaintenanceError::InvalidPlan(_))));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert_eq!(
            "xml".parse::<ExportFormat>(),
            Err(MaintenanceError::UnknownFormat("xml".to_string()))
        );
    }
}
