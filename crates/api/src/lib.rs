//! Solar Panel Monitoring API Server
//!
//! REST server for the monitoring dashboard: live and historical sensor
//! readings, the alert log, maintenance planning and a proxy to the
//! efficiency prediction service.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use live_feed::{lock, SharedMonitor, SolarMonitor, TaskHandle, TokioScheduler};
use maintenance::MaintenancePlanner;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use predict_client::PredictClient;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use error::{ApiError, ServerError};
pub use rate_limit::{create_governor_config, RateLimitConfig};

/// Application state shared across handlers
pub struct AppState {
    /// Live reading feed, history and alert log
    pub monitor: SharedMonitor,
    /// Planned maintenance
    pub planner: MaintenancePlanner,
    /// Prediction service client
    pub predictor: PredictClient,
    /// Prometheus scrape handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state from the loaded configuration
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let monitor = SolarMonitor::new(config.feed.clone(), config.alerts.clone());
        Ok(Self {
            monitor: Arc::new(Mutex::new(monitor)),
            planner: MaintenancePlanner::with_sample_plans(),
            predictor: PredictClient::new(config.predict.clone())?,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub version: String,
    pub uptime_seconds: u64,
    pub feed: FeedHealth,
}

/// Live feed counters
#[derive(Debug, Serialize)]
pub struct FeedHealth {
    pub ticks: u64,
    pub history_len: usize,
    pub alert_count: usize,
    pub unresolved_alerts: usize,
}

/// Create the application router
///
/// `rate_limit` applies to every route; the prediction proxy additionally
/// uses [`RateLimitConfig::strict`]. Serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: Arc<AppState>, rate_limit: &RateLimitConfig) -> Router {
    let mut predictions = Router::new().route(
        "/api/v1/predictions",
        post(routes::predictions::post_prediction),
    );
    if let Some(config) = create_governor_config(&RateLimitConfig::strict()) {
        predictions = predictions.layer(GovernorLayer { config });
    }

    let mut router = Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/sensors/live", get(routes::sensors::get_live))
        .route("/api/v1/sensors/history", get(routes::sensors::get_history))
        .route("/api/v1/alerts", get(routes::alerts::get_alerts))
        .route(
            "/api/v1/alerts/:id/resolve",
            post(routes::alerts::resolve_alert),
        )
        .route("/api/v1/maintenance", get(routes::maintenance::get_maintenance))
        .route(
            "/api/v1/maintenance/export",
            get(routes::maintenance::export_report),
        )
        .route("/metrics", get(metrics_handler))
        .merge(predictions)
        .with_state(state);

    match create_governor_config(rate_limit) {
        Some(config) => router = router.layer(GovernorLayer { config }),
        None => warn!("Rate limiting disabled: {:?}", rate_limit),
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let monitor = lock(&state.monitor);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        feed: FeedHealth {
            ticks: monitor.ticks(),
            history_len: monitor.history().len(),
            alert_count: monitor.alerts().len(),
            unresolved_alerts: monitor.alerts().unresolved_count(),
        },
    })
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Initialize logging
///
/// `RUST_LOG` overrides the default `info` filter. Safe to call more than
/// once; later calls are ignored.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Run the server until ctrl-c
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::new(&config)?.with_metrics(handle));

    let mut scheduler = TokioScheduler::current();
    let feed = live_feed::start(&state.monitor, &mut scheduler);

    let app = create_router(Arc::clone(&state), &config.rate_limit);

    info!("Starting API server on {}", config.server.addr);
    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    feed.cancel();
    info!("Server stopped after {} ticks", lock(&state.monitor).ticks());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
    }
    info!("Shutdown signal received");
}
