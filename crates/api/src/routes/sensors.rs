//! Sensor Routes

use axum::{
    extract::{Query, State},
    Json,
};
use live_feed::lock;
use panel_telemetry::{Measurement, SensorReading, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of most recent readings to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    60
}

/// Per-measurement status shown on the metric cards
#[derive(Debug, Serialize)]
pub struct MeasurementStatus {
    pub temperature: Status,
    pub efficiency: Status,
    pub vibration: Status,
}

/// Response for the live endpoint
#[derive(Debug, Serialize)]
pub struct LiveResponse {
    pub reading: SensorReading,
    pub measurements: MeasurementStatus,
    pub ticks: u64,
}

/// Response for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<SensorReading>,
    pub meta: HistoryMeta,
}

#[derive(Debug, Serialize)]
pub struct HistoryMeta {
    pub count: usize,
    pub capacity: usize,
}

/// Get the current reading
pub async fn get_live(State(state): State<Arc<AppState>>) -> Json<LiveResponse> {
    let monitor = lock(&state.monitor);
    let reading = monitor.current().clone();

    Json(LiveResponse {
        measurements: MeasurementStatus {
            temperature: reading.measurement_status(Measurement::Temperature),
            efficiency: reading.measurement_status(Measurement::Efficiency),
            vibration: reading.measurement_status(Measurement::Vibration),
        },
        reading,
        ticks: monitor.ticks(),
    })
}

/// Get the rolling history, oldest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let monitor = lock(&state.monitor);
    let history = monitor.history();
    let skip = history.len().saturating_sub(params.limit);
    let data: Vec<SensorReading> = history.iter().skip(skip).cloned().collect();

    Json(HistoryResponse {
        meta: HistoryMeta {
            count: data.len(),
            capacity: history.capacity(),
        },
        data,
    })
}
