// End-to-end tests of the HTTP API against a local server.

mod common;

use common::{spawn_server, BrokenModel, KeywordModel};
use reqwest::StatusCode;
use sentiment_scale::server::{AppState, ErrorBody, HealthCheck, ServiceInfo};
use sentiment_scale::{SentimentAnalysisPipeline, SentimentResult};
use serde_json::{json, Value};
use std::collections::HashMap;

async fn ready_server() -> String {
    spawn_server(AppState::ready(SentimentAnalysisPipeline::new(KeywordModel))).await
}

async fn post(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_a_loaded_model() {
    let base = ready_server().await;
    let health: HealthCheck = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(health.model_loaded);
    assert_eq!(health.status, "healthy");
    assert!(health.detail.is_none());
}

#[tokio::test]
async fn root_describes_the_service() {
    let base = ready_server().await;
    let info: ServiceInfo = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info.message, "Multi-Scale Sentiment Analyzer API");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(info.model.as_deref(), Some("test/keyword-model"));
}

#[tokio::test]
async fn analyze_scores_a_review() {
    let base = ready_server().await;
    let response = post(
        format!("{base}/analyze"),
        json!({"text": "Absolutely amazing! Best movie I've seen this year!"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sentiment_score"], 3);
    assert_eq!(body["sentiment_label"], "Very Positive");
    assert_eq!(body["emoji"], "🤩");

    let probabilities = body["probabilities"].as_object().unwrap();
    assert_eq!(probabilities.len(), 7);
    assert!(probabilities.contains_key("+3 (Very Positive)"));
    assert!(probabilities.contains_key("+0 (Neutral)"));
    assert!(probabilities.contains_key("-3 (Very Negative)"));
    let total: f64 = probabilities.values().map(|p| p.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-6);

    let result: SentimentResult = serde_json::from_value(body).unwrap();
    assert_eq!(result.confidence, 0.7);
}

#[tokio::test]
async fn analyze_validates_text_length() {
    let base = ready_server().await;

    for text in [String::new(), "x".repeat(5001)] {
        let response = post(format!("{base}/analyze"), json!({ "text": text })).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorBody = response.json().await.unwrap();
        assert!(error.detail.contains("between 1 and 5000"), "{}", error.detail);
    }

    let longest = "x".repeat(5000);
    let response = post(format!("{base}/analyze"), json!({ "text": longest })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let base = ready_server().await;

    let response = post(format!("{base}/analyze"), json!({"txt": "typo"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorBody = response.json().await.unwrap();
    assert!(error.detail.starts_with("invalid request body"));

    let response = reqwest::Client::new()
        .post(format!("{base}/analyze"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn batch_preserves_order_and_matches_single_calls() {
    let base = ready_server().await;
    let texts = [
        "Masterpiece! Incredible in every way!",
        "Not good at all. Would not recommend.",
        "This movie was absolutely terrible! Worst film I've ever seen.",
    ];

    let response = post(format!("{base}/analyze/batch"), json!({ "texts": texts })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let batch: Vec<SentimentResult> = response.json().await.unwrap();
    assert_eq!(batch.len(), texts.len());

    for (text, from_batch) in texts.iter().zip(&batch) {
        let single: SentimentResult = post(format!("{base}/analyze"), json!({ "text": text }))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(&single, from_batch);
        assert_eq!(from_batch.text, *text);
    }
}

#[tokio::test]
async fn batch_validates_its_size_and_items() {
    let base = ready_server().await;

    let too_many = vec!["fine"; 101];
    let response = post(format!("{base}/analyze/batch"), json!({ "texts": too_many })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let empty: Vec<&str> = Vec::new();
    let response = post(format!("{base}/analyze/batch"), json!({ "texts": empty })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post(
        format!("{base}/analyze/batch"),
        json!({ "texts": ["fine", ""] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorBody = response.json().await.unwrap();
    assert!(error.detail.starts_with("texts[1]"), "{}", error.detail);

    let at_limit = vec!["fine"; 100];
    let response = post(format!("{base}/analyze/batch"), json!({ "texts": at_limit })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unloaded_model_returns_503_and_reports_degraded() {
    let base = spawn_server(AppState::uninitialized(Some("download failed".into()))).await;

    let response = post(format!("{base}/analyze"), json!({"text": "hello"})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(error.detail, "Model not loaded");

    let response = post(format!("{base}/analyze/batch"), json!({"texts": ["hello"]})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health: HealthCheck = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!health.model_loaded);
    assert_eq!(health.status, "degraded");
    assert_eq!(health.detail.as_deref(), Some("download failed"));

    let info: ServiceInfo = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(info.model.is_none());
}

#[tokio::test]
async fn inference_failures_return_500() {
    let base = spawn_server(AppState::ready(SentimentAnalysisPipeline::new(BrokenModel))).await;

    let response = post(format!("{base}/analyze"), json!({"text": "hello"})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = response.json().await.unwrap();
    assert_eq!(
        error.detail,
        "Error analyzing text: tokenization failed: vocabulary missing"
    );

    let response = post(format!("{base}/analyze/batch"), json!({"texts": ["hello"]})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = response.json().await.unwrap();
    assert!(error.detail.starts_with("Error analyzing batch:"));
}

#[tokio::test]
async fn sentiment_scale_is_static_and_complete() {
    // Served even without a model.
    let base = spawn_server(AppState::uninitialized(None)).await;
    let scale: HashMap<String, HashMap<String, String>> =
        reqwest::get(format!("{base}/sentiment-scale"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

    assert_eq!(scale.len(), 7);
    for score in -3..=3 {
        let entry = &scale[&score.to_string()];
        assert!(!entry["label"].is_empty());
        assert!(!entry["emoji"].is_empty());
    }
    assert_eq!(scale["3"]["label"], "Very Positive");
    assert_eq!(scale["-3"]["emoji"], "😢");
}

#[tokio::test]
async fn examples_cover_every_level() {
    let base = spawn_server(AppState::uninitialized(None)).await;
    let examples: HashMap<String, Vec<String>> = reqwest::get(format!("{base}/examples"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(examples.len(), 7);
    for score in -3..=3 {
        assert_eq!(examples[&score.to_string()].len(), 2);
    }
}

#[tokio::test]
async fn browsers_on_other_origins_pass_preflight() {
    let base = ready_server().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{base}/analyze"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = reqwest::Client::new()
        .get(format!("{base}/sentiment-scale"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
