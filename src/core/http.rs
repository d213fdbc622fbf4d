//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::Config;
use crate::indicators::compute_indicators;
use crate::ingestion::Ingestor;
use crate::metrics::Metrics;
use crate::models::decision::Decision;
use crate::models::indicators::{Candle, IndicatorSnapshot};
use crate::scanner::{AgentConfig, AgentConfigUpdate, MarketScanner, ScanMarket, ScanSignal};
use crate::services::ClobClient;
use crate::strategies::StrategyEngine;

pub const SERVICE_NAME: &str = "polywrath-signal-engine";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<StrategyEngine>,
    pub scanner: Arc<MarketScanner>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.to_string() })),
    )
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// UP probability assumed when the caller sends none
const DEFAULT_PROBABILITY: f64 = 0.5;

fn default_probability() -> f64 {
    DEFAULT_PROBABILITY
}

#[derive(Debug, Deserialize)]
struct EvaluateQuery {
    #[serde(default = "default_probability", alias = "polyUpProb")]
    probability: f64,
}

/// Run one evaluation cycle for the given UP probability
async fn evaluate(
    State(state): State<AppState>,
    Query(query): Query<EvaluateQuery>,
) -> Result<Json<Decision>, ApiError> {
    state
        .engine
        .evaluate(query.probability)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "Rejected evaluation request");
            bad_request(e)
        })
}

#[derive(Debug, Deserialize)]
struct IndicatorsRequest {
    candles: Vec<Candle>,
}

async fn indicators(
    Json(request): Json<IndicatorsRequest>,
) -> Result<Json<IndicatorSnapshot>, ApiError> {
    compute_indicators(&request.candles)
        .map(Json)
        .map_err(bad_request)
}

async fn get_agent_config(State(state): State<AppState>) -> Json<AgentConfig> {
    Json(state.scanner.config().await)
}

async fn update_agent_config(
    State(state): State<AppState>,
    Json(update): Json<AgentConfigUpdate>,
) -> Result<Json<AgentConfig>, ApiError> {
    if update.max_position_size.is_some_and(|v| !v.is_finite() || v < 0.0) {
        return Err(bad_request("max_position_size must be a non-negative number"));
    }
    if update
        .signal_threshold
        .is_some_and(|v| !(0.0..=100.0).contains(&v))
    {
        return Err(bad_request("signal_threshold must be within [0, 100]"));
    }
    Ok(Json(state.scanner.update_config(update).await))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    markets: Vec<ScanMarket>,
}

async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Json<Vec<ScanSignal>> {
    Json(state.scanner.scan(&request.markets).await)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/evaluate", get(evaluate))
        .route("/api/indicators", post(indicators))
        .route(
            "/api/agent/config",
            get(get_agent_config).put(update_agent_config),
        )
        .route("/api/agent/scan", post(scan))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the providers, engine and scanner from configuration
pub fn build_state(
    config: &Config,
    metrics: Arc<Metrics>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let ingestor = Ingestor::from_config(&config.providers)?.with_metrics(metrics.clone());
    let engine = StrategyEngine::new(Arc::new(ingestor), config.strategy.clone())
        .with_metrics(metrics.clone());
    let scanner = MarketScanner::new(
        Arc::new(ClobClient::new(&config.providers)?),
        AgentConfig::default(),
    )
    .with_metrics(metrics.clone());

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        engine: Arc::new(engine),
        scanner: Arc::new(scanner),
    })
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let state = build_state(&config, metrics)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
