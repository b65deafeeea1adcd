//! End-to-end tests against a locally bound server

use alerting::{AlertRecord, Severity};
use api::{create_router, AppConfig, AppState, RateLimitConfig};
use axum::{routing::post, Json, Router};
use chrono::{DateTime, Utc};
use live_feed::lock;
use panel_telemetry::Measurement;
use predict_client::{RiskLevel, SolarPredictRequest, SolarPredictResponse};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

fn lenient() -> RateLimitConfig {
    RateLimitConfig {
        per_second: 1,
        burst_size: 1000,
    }
}

async fn spawn_app(config: AppConfig) -> (String, Arc<AppState>) {
    let state = Arc::new(AppState::new(&config).unwrap());
    lock(&state.monitor).seed();

    let app = create_router(Arc::clone(&state), &config.rate_limit);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (format!("http://{addr}"), state)
}

fn test_config() -> AppConfig {
    AppConfig {
        rate_limit: lenient(),
        ..Default::default()
    }
}

async fn spawn_predict_stub() -> String {
    let app = Router::new().route(
        "/predict/solar",
        post(|Json(req): Json<SolarPredictRequest>| async move {
            Json(SolarPredictResponse {
                efficiency_prediction: req.ac_power / req.dc_power * 100.0,
                anomaly_score: 0.42,
                anomaly_label: 1,
                risk_level: RiskLevel::Medium,
            })
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn critical_alert() -> AlertRecord {
    AlertRecord {
        id: Uuid::new_v4(),
        severity: Severity::Critical,
        message: "High temperature detected: 78°C".to_string(),
        sensor_type: Measurement::Temperature,
        value: 78.0,
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn test_health() {
    let (base, _) = spawn_app(test_config()).await;
    let body: Value = reqwest::get(format!("{base}/api/v1/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["feed"]["history_len"], 20);
}

#[tokio::test]
async fn test_live_reading_within_ranges() {
    let (base, _) = spawn_app(test_config()).await;
    let body: Value = reqwest::get(format!("{base}/api/v1/sensors/live"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let reading = &body["reading"];
    let temperature = reading["temperature"].as_f64().unwrap();
    let efficiency = reading["outputEfficiency"].as_f64().unwrap();
    assert!((25.0..85.0).contains(&temperature));
    assert!((60.0..98.0).contains(&efficiency));
    assert!(reading["status"].is_string());
    assert!(body["measurements"]["vibration"].is_string());
}

#[tokio::test]
async fn test_history_limit_and_order() {
    let (base, state) = spawn_app(test_config()).await;
    for _ in 0..5 {
        lock(&state.monitor).tick();
    }

    let body: Value = reqwest::get(format!("{base}/api/v1/sensors/history?limit=10"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(body["meta"]["capacity"], 60);

    let stamps: Vec<DateTime<Utc>> = data
        .iter()
        .map(|r| r["timestamp"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_resolve_alert() {
    let (base, state) = spawn_app(test_config()).await;
    let alert = critical_alert();
    let id = alert.id;
    {
        let mut monitor = lock(&state.monitor);
        monitor.alerts_mut().clear();
        monitor.alerts_mut().push(alert);
    }

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/alerts/{id}/resolve"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let body: Value = client
        .get(format!("{base}/api/v1/alerts?resolved=true&severity=critical"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["unresolved_count"], 0);
    assert_eq!(body["data"][0]["id"], id.to_string());
    assert_eq!(body["data"][0]["sensorType"], "temperature");
    assert_eq!(body["data"][0]["resolved"], true);

    let missing = client
        .post(format!("{base}/api/v1/alerts/{}/resolve", Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_alerts_newest_first() {
    let (base, state) = spawn_app(test_config()).await;
    let first = critical_alert();
    let second = critical_alert();
    let newest = second.id;
    {
        let mut monitor = lock(&state.monitor);
        monitor.alerts_mut().clear();
        monitor.alerts_mut().push(first);
        monitor.alerts_mut().push(second);
    }

    let body: Value = reqwest::get(format!("{base}/api/v1/alerts?limit=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["unresolved_count"], 2);
    assert_eq!(body["data"][0]["id"], newest.to_string());
}

#[tokio::test]
async fn test_info_severity_filter_is_empty() {
    let (base, state) = spawn_app(test_config()).await;
    lock(&state.monitor).alerts_mut().push(critical_alert());

    let resp = reqwest::get(format!("{base}/api/v1/alerts?severity=info"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let unknown = reqwest::get(format!("{base}/api/v1/alerts?severity=debug"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), 400);
}

#[tokio::test]
async fn test_maintenance_summary_and_export() {
    let (base, _) = spawn_app(test_config()).await;
    let body: Value = reqwest::get(format!("{base}/api/v1/maintenance"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total_cost"], 4950.0);
    assert_eq!(body["total_savings"], 14500.0);
    assert_eq!(body["roi_percent"], 193.0);
    assert_eq!(body["planned_tasks"], 4);

    let resp = reqwest::get(format!("{base}/api/v1/maintenance/export?format=csv"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    assert!(resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("solara-maintenance-report.csv"));
    assert!(resp.text().await.unwrap().starts_with("Title,Date,Cost,Savings"));

    let bad = reqwest::get(format!("{base}/api/v1/maintenance/export?format=xml"))
        .await
        .unwrap();
    assert_eq!(bad.status(), 400);
}

#[tokio::test]
async fn test_prediction_proxy() {
    let mut config = test_config();
    config.predict.base_url = spawn_predict_stub().await;
    let (base, _) = spawn_app(config).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/predictions"))
        .json(&json!({
            "dc_power": 1000.0,
            "ac_power": 950.0,
            "ambient_temperature": 28.0,
            "module_temperature": 40.0,
            "irradiation": 900.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!((body["efficiency_prediction"].as_f64().unwrap() - 95.0).abs() < 1e-9);
    assert_eq!(body["risk_level"], "Medium");

    let invalid = client
        .post(format!("{base}/api/v1/predictions"))
        .json(&json!({
            "dc_power": 0.0,
            "ac_power": 950.0,
            "ambient_temperature": 28.0,
            "module_temperature": 40.0,
            "irradiation": 900.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), 422);
}

#[tokio::test]
async fn test_prediction_upstream_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed = listener.local_addr().unwrap();
    drop(listener);

    let mut config = test_config();
    config.predict.base_url = format!("http://{closed}");
    let (base, _) = spawn_app(config).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/v1/predictions"))
        .json(&SolarPredictRequest::default())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (base, _) = spawn_app(test_config()).await;
    let resp = reqwest::get(format!("{base}/metrics")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let config = AppConfig {
        rate_limit: RateLimitConfig {
            per_second: 60,
            burst_size: 2,
        },
        ..Default::default()
    };
    let (base, _) = spawn_app(config).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .get(format!("{base}/api/v1/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    let limited = client
        .get(format!("{base}/api/v1/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(limited.status(), 429);
}
