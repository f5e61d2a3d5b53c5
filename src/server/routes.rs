use super::catalog::ExampleCatalog;
use super::error::ApiError;
use super::state::AppState;
use crate::core::{InferenceError, SentimentError};
use crate::pipelines::sentiment_analysis_pipeline::{
    sentiment_scale, validate_batch, validate_text, ScaleEntry, SentimentAnalysisPipeline,
    SentimentResult,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::{Any, CorsLayer};

pub const SERVICE_NAME: &str = "Multi-Scale Sentiment Analyzer API";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchTextInput {
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub model_loaded: bool,
    /// Load failure, reported while degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Any origin may call the API, so a browser frontend served elsewhere works.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .route("/examples", get(examples))
        .route("/sentiment-scale", get(scale))
        .layer(cors)
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.pipeline().ok().map(|p| p.model_id().to_string()),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthCheck> {
    let model_loaded = state.is_ready();
    Json(HealthCheck {
        status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
        model_loaded,
        detail: state.unavailable_reason().map(str::to_string),
    })
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<TextInput>, JsonRejection>,
) -> Result<Json<SentimentResult>, ApiError> {
    const CONTEXT: &str = "Error analyzing text";

    let Json(TextInput { text }) = payload?;
    validate_text(&text)?;
    let pipeline = state
        .pipeline()
        .map_err(|e| ApiError::from_sentiment(e, CONTEXT))?;

    tracing::debug!(chars = text.chars().count(), "analyze");
    let result = run_blocking(pipeline, move |p| p.predict(&text))
        .await
        .map_err(|e| ApiError::from_sentiment(e, CONTEXT))?;
    Ok(Json(result))
}

async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchTextInput>, JsonRejection>,
) -> Result<Json<Vec<SentimentResult>>, ApiError> {
    const CONTEXT: &str = "Error analyzing batch";

    let Json(BatchTextInput { texts }) = payload?;
    validate_batch(&texts)?;
    let pipeline = state
        .pipeline()
        .map_err(|e| ApiError::from_sentiment(e, CONTEXT))?;

    tracing::debug!(items = texts.len(), "analyze batch");
    let results = run_blocking(pipeline, move |p| p.predict_batch(&texts))
        .await
        .map_err(|e| ApiError::from_sentiment(e, CONTEXT))?;
    Ok(Json(results))
}

async fn examples() -> Json<ExampleCatalog> {
    Json(ExampleCatalog)
}

async fn scale() -> Json<BTreeMap<i8, ScaleEntry>> {
    Json(sentiment_scale())
}

/// Runs inference off the async executor.
async fn run_blocking<T, F>(
    pipeline: SentimentAnalysisPipeline,
    f: F,
) -> Result<T, SentimentError>
where
    T: Send + 'static,
    F: FnOnce(&SentimentAnalysisPipeline) -> Result<T, SentimentError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&pipeline))
        .await
        .map_err(|e| SentimentError::from(InferenceError::Worker(e.to_string())))?
}
