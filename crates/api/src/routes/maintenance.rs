//! Maintenance Routes

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use maintenance::{CostComparison, ExportFormat, MaintenancePlan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Maintenance overview
#[derive(Debug, Serialize)]
pub struct MaintenanceResponse {
    pub plans: Vec<MaintenancePlan>,
    pub total_cost: f64,
    pub total_savings: f64,
    /// Whole-percent ROI, absent when nothing is spent
    pub roi_percent: Option<f64>,
    pub planned_tasks: usize,
    pub cost_comparison: Vec<CostComparison>,
}

/// Query parameters for the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// Get planned maintenance with cost figures
pub async fn get_maintenance(State(state): State<Arc<AppState>>) -> Json<MaintenanceResponse> {
    let planner = &state.planner;
    Json(MaintenanceResponse {
        plans: planner.plans().to_vec(),
        total_cost: planner.total_cost(),
        total_savings: planner.total_savings(),
        roi_percent: planner.roi_percent().map(f64::round),
        planned_tasks: planner.plans().len(),
        cost_comparison: planner.cost_comparison().to_vec(),
    })
}

/// Download the maintenance report
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format: ExportFormat = params.format.parse()?;
    let body = state.planner.export(format);
    let disposition = format!("attachment; filename=\"{}\"", format.file_name());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
