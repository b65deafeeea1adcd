//! Prediction Routes

use axum::{extract::State, Json};
use predict_client::{SolarPredictRequest, SolarPredictResponse};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Forward hand-entered inverter readings to the prediction service
pub async fn post_prediction(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SolarPredictRequest>,
) -> Result<Json<SolarPredictResponse>, ApiError> {
    let prediction = state.predictor.predict(&request).await?;
    info!(
        "Prediction: efficiency {:.1}, risk {:?}",
        prediction.efficiency_prediction, prediction.risk_level
    );
    Ok(Json(prediction))
}
