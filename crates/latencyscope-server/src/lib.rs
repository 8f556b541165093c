//! HTTP latency metrics server.
//!
//! Serves per-region latency/uptime statistics over a telemetry dataset that
//! is loaded once at startup and shared read-only by every request.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Deserializer, Serialize, de};
use tower_http::cors::{Any, CorsLayer};

use latencyscope_core::{Query, RegionReport, RegionSummary, TelemetryDataset};

/// Shared server state.
struct AppState {
    dataset: Arc<TelemetryDataset>,
}

/// Body of `POST /latency-metrics`.
#[derive(Debug, Deserialize)]
struct MetricsRequest {
    regions: Vec<String>,
    #[serde(deserialize_with = "whole_number")]
    threshold_ms: i64,
}

impl From<MetricsRequest> for Query {
    fn from(request: MetricsRequest) -> Self {
        Query::new(request.regions, request.threshold_ms as f64)
    }
}

/// Integer field that also accepts floats with no fractional part (`150.0`).
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(de::Error::custom(format!(
            "invalid value: {number}, expected an integer"
        ))),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
    regions: usize,
}

#[derive(Serialize)]
struct RegionsResponse {
    regions: Vec<RegionSummary>,
    total: usize,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// A request that could not be served, rendered as `{"error": "..."}`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

async fn handle_metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> Result<Json<RegionReport>, ApiError> {
    let Json(request) = payload.inspect_err(|e| log::debug!("rejected metrics request: {e}"))?;
    log::debug!(
        "metrics query: regions={:?} threshold_ms={}",
        request.regions,
        request.threshold_ms
    );
    Ok(Json(Query::from(request).evaluate(&state.dataset)))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.dataset.len(),
        regions: state.dataset.regions().len(),
    })
}

async fn handle_regions(State(state): State<Arc<AppState>>) -> Json<RegionsResponse> {
    let regions = state.dataset.regions();
    let total = regions.len();
    Json(RegionsResponse { regions, total })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "latencyscope",
        "version": latencyscope_core::VERSION,
        "records": state.dataset.len(),
        "endpoints": {
            "/": "This API index",
            "/latency-metrics": {
                "method": "POST",
                "description": "Per-region latency and uptime statistics",
                "body": {
                    "regions": "Region identifiers to report on",
                    "threshold_ms": "Latency above which a record counts as a breach (integer)",
                },
            },
            "/regions": "Regions present in the dataset with record counts",
            "/health": "Health check",
        },
    }))
}

/// CORS policy: any origin and header, `POST` only.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any)
}

/// Build the axum router over a loaded dataset.
pub fn build_router(dataset: Arc<TelemetryDataset>) -> Router {
    let state = Arc::new(AppState { dataset });

    Router::new()
        .route("/", get(handle_index))
        .route("/latency-metrics", post(handle_metrics))
        .route("/health", get(handle_health))
        .route("/regions", get(handle_regions))
        .with_state(state)
        .layer(cors_layer())
}

/// Run the HTTP metrics server until it fails.
pub async fn run_server(
    dataset: Arc<TelemetryDataset>,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    let app = build_router(dataset);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
