//! Alert Routes

use alerting::{AlertRecord, Severity};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use live_feed::lock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Severity filter. The dashboard also offers `info`, which no alert
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    Critical,
    Warning,
    Info,
}

impl SeverityFilter {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::Critical => severity == Severity::Critical,
            SeverityFilter::Warning => severity == Severity::Warning,
            SeverityFilter::Info => false,
        }
    }
}

/// Query parameters for alerts endpoint
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Filter by severity
    pub severity: Option<SeverityFilter>,
    /// Filter by resolved status
    pub resolved: Option<bool>,
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Logged alert with its resolution state
#[derive(Debug, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub record: AlertRecord,
    pub resolved: bool,
}

/// Response for alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub data: Vec<AlertView>,
    pub count: usize,
    pub unresolved_count: usize,
}

/// Get alerts, newest first
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlertQuery>,
) -> Json<AlertResponse> {
    let monitor = lock(&state.monitor);
    let log = monitor.alerts();

    let data: Vec<AlertView> = log
        .iter()
        .filter(|a| params.severity.map_or(true, |s| s.matches(a.severity)))
        .map(|a| AlertView {
            record: a.clone(),
            resolved: log.is_resolved(a.id),
        })
        .filter(|v| params.resolved.map_or(true, |r| v.resolved == r))
        .take(params.limit)
        .collect();

    Json(AlertResponse {
        count: data.len(),
        unresolved_count: log.unresolved_count(),
        data,
    })
}

/// Mark an alert resolved
pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut monitor = lock(&state.monitor);
    if monitor.alerts_mut().resolve(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::AlertNotFound(id))
    }
}
