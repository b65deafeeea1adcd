//! Prediction client against a local stub service

use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
use predict_client::{
    PredictClient, PredictConfig, PredictError, RiskLevel, SolarPredictRequest,
    SolarPredictResponse,
};
use std::time::Duration;

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout_ms: u64) -> PredictClient {
    PredictClient::new(PredictConfig {
        base_url,
        timeout_ms,
    })
    .unwrap()
}

#[tokio::test]
async fn test_predict_round_trip() {
    let app = Router::new().route(
        "/predict/solar",
        post(|Json(req): Json<SolarPredictRequest>| async move {
            Json(SolarPredictResponse {
                efficiency_prediction: req.ac_power / req.dc_power * 100.0,
                anomaly_score: 0.05,
                anomaly_label: 0,
                risk_level: RiskLevel::Low,
            })
        }),
    );
    let base = spawn_stub(app).await;

    let request = SolarPredictRequest {
        dc_power: 1000.0,
        ac_power: 900.0,
        ..Default::default()
    };
    let response = client(base, 8000).predict(&request).await.unwrap();

    assert_eq!(response.efficiency_prediction, 90.0);
    assert_eq!(response.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let app = Router::new().route(
        "/predict/solar",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal model error") }),
    );
    let base = spawn_stub(app).await;

    let err = client(base, 8000)
        .predict(&SolarPredictRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictError::Status(500)));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let app = Router::new().route(
        "/predict/solar",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            StatusCode::OK
        }),
    );
    let base = spawn_stub(app).await;

    let err = client(base, 50)
        .predict(&SolarPredictRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictError::Timeout(50)));
}

#[tokio::test]
async fn test_invalid_input_skips_network() {
    // Nothing listens here; validation must fail first
    let err = client("http://127.0.0.1:9".to_string(), 8000)
        .predict(&SolarPredictRequest {
            irradiation: 0.0,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PredictError::InvalidInput {
            field: "irradiation",
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let app = Router::new().route("/predict/solar", post(|| async { "not json" }));
    let base = spawn_stub(app).await;

    let err = client(base, 8000)
        .predict(&SolarPredictRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictError::Decode(_)));
}

#[tokio::test]
async fn test_health() {
    let app = Router::new().route("/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }));
    let base = spawn_stub(app).await;

    assert!(client(base, 8000).health().await.unwrap());
}
