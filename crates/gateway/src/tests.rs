//! Router tests driving the full middleware stack

use super::{create_router, AppState};
use aicif_common::AppConfig;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::{
    io,
    sync::{Arc, Mutex},
};
use tokio_test::assert_ok;
use tower::ServiceExt;

fn app() -> (AppState, Router) {
    let state = AppState::new(AppConfig::default());
    let router = create_router(state.clone());
    (state, router)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = assert_ok!(router.clone().oneshot(request).await);
    let status = response.status();
    let bytes = assert_ok!(axum::body::to_bytes(response.into_body(), usize::MAX).await);
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_and_ready() {
    let (_, router) = app();

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["registry"]["citations"], 3);
    assert_eq!(body["components"]["graph"]["nodes"], 16);
    assert_eq!(body["components"]["graph"]["edges"], 16);
    assert_eq!(body["components"]["interpreter"]["datasets"], 2);
    assert_eq!(body["components"]["interpreter"]["models"], 3);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let (_, router) = app();
    let response = assert_ok!(router.oneshot(get("/metrics")).await);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let (_, router) = app();
    let response = assert_ok!(router.oneshot(get("/health")).await);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_log_citation_updates_registry_and_graph() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/citations",
            json!({
                "doi": "10.9999/new",
                "ai_model": "Gemini",
                "source_title": "A new paper",
                "source_type": "paper",
                "authors": "Ng & Patel",
                "contribution_score": 0.7
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let id = body["citation_id"].as_str().unwrap().to_string();

    let (status, body) = send(&router, get("/api/citations?doi=10.9999/new")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["citations"][0]["citation_id"], id.as_str());
    assert_eq!(body["citations"][0]["ai_model"], "Gemini");

    let (status, body) = send(&router, get("/api/graph/connections?entity_id=10.9999/new")).await;
    assert_eq!(status, StatusCode::OK);
    let incoming = body["connections"]["incoming"].as_array().unwrap();
    assert_eq!(incoming.len(), 3);
    assert_eq!(incoming[0]["id"], "Gemini");
    assert_eq!(incoming[0]["edges"][0]["relationship"], "CITES");

    assert_eq!(state.registry.read().await.len(), 4);
}

/// Log sink for the subscriber installed on the test thread
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_log_citation_emits_one_logged_event() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (_, router) = app();
    let (status, _) = send(
        &router,
        post_json("/api/citations", json!({"doi": "10.9999/once", "ai_model": "GPT-4"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let logs = buffer.contents();
    assert_eq!(logs.matches("Citation logged").count(), 1);
    assert_eq!(logs.matches("Citation appended to registry").count(), 1);
}

#[tokio::test]
async fn test_log_citation_requires_doi_and_model() {
    let (_, router) = app();

    let (status, body) = send(&router, post_json("/api/citations", json!({"ai_model": "GPT-4"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_FIELD");
    assert_eq!(body["error"]["field"], "doi");

    let (status, body) = send(&router, post_json("/api/citations", json!({"doi": "10.1/x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "ai_model");
}

#[tokio::test]
async fn test_log_citation_rejects_bad_fields() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/citations",
            json!({"doi": "10.1/x", "ai_model": "GPT-4", "contribution_score": 1.5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &router,
        post_json(
            "/api/citations",
            json!({"doi": "10.1/x", "ai_model": "GPT-4", "timestamp": "yesterday"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TIMESTAMP");

    assert_eq!(state.registry.read().await.len(), 3);
}

#[tokio::test]
async fn test_citation_queries() {
    let (_, router) = app();

    let (status, body) = send(&router, get("/api/citations?start_date=2025-04-02")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["citations"][0]["timestamp"], "2025-04-03T09:11:05");

    let (status, body) = send(&router, get("/api/citations?start_date=garbage")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TIMESTAMP");

    let (_, body) = send(&router, get("/api/citations?ai_model=GPT-4&limit=1")).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["citations"][0]["doi"], "10.1126/science.abd4896");

    let (_, body) = send(&router, get("/api/citations/recent?limit=1")).await;
    assert_eq!(body["citations"][0]["ai_model"], "Claude-3");
}

#[tokio::test]
async fn test_stats_endpoints() {
    let (_, router) = app();

    let (status, body) = send(&router, get("/api/stats/top-cited?model=Claude-3")).await;
    assert_eq!(status, StatusCode::OK);
    let top = body["top_cited"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["doi"], "10.1073/pnas.2023152118");
    assert_eq!(top[0]["type"], "dataset");
    assert_eq!(top[0]["citation_count"], 1);

    let (_, body) = send(&router, get("/api/stats/summary")).await;
    assert_eq!(body["summary"]["total_citations"], 3);
    assert_eq!(body["summary"]["unique_sources"], 3);
}

#[tokio::test]
async fn test_graph_endpoints() {
    let (_, router) = app();

    let (status, body) = send(&router, get("/api/graph")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 16);
    assert_eq!(body["graph"]["edges"].as_array().unwrap().len(), 16);

    let (status, body) = send(&router, get("/api/graph/connections?entity_id=nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "ENTITY_NOT_FOUND");

    let (status, body) = send(
        &router,
        get("/api/graph/path?source=GPT-4&target=10.5061/dryad.1234"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_depth"], 3);
    assert_eq!(body["count"], 1);
    assert_eq!(body["paths"][0][0]["relationship"], "CITES");
    assert_eq!(body["paths"][0][1]["relationship"], "USES");

    let (_, body) = send(
        &router,
        get("/api/graph/path?source=GPT-4&target=10.5061/dryad.1234&max_depth=100"),
    )
    .await;
    assert_eq!(body["max_depth"], 6);

    let (_, body) = send(&router, get("/api/graph/path?source=GPT-4&target=nobody")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_interpreter_catalog() {
    let (_, router) = app();

    let (_, body) = send(&router, get("/api/interpreter/datasets")).await;
    assert_eq!(body["datasets"].as_array().unwrap().len(), 2);
    assert_eq!(body["datasets"][0]["feature_count"], 5);

    let (_, body) = send(&router, get("/api/interpreter/models")).await;
    assert_eq!(body["models"].as_array().unwrap().len(), 3);
    assert_eq!(body["models"][0]["type"], "regression");
}

#[tokio::test]
async fn test_analyze_logs_dataset_citations() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/contributions/analyze",
            json!({
                "dataset_id": "climate_data",
                "model_id": "temperature_prediction",
                "method": "LIME",
                "user_id": "analyst"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation_method"], "LIME");
    assert_eq!(body["contributions"].as_array().unwrap().len(), 5);
    assert_eq!(body["citations_logged"], 5);

    let (_, body) = send(&router, get("/api/citations?ai_model=temperature_prediction")).await;
    assert_eq!(body["count"], 5);
    for citation in body["citations"].as_array().unwrap() {
        assert_eq!(citation["source_type"], "dataset");
        assert_eq!(citation["user_id"], "analyst");
        assert_eq!(citation["context"], "Feature contribution via LIME analysis");
    }

    assert!(state.graph.read().await.contains("temperature_prediction"));
}

#[tokio::test]
async fn test_analyze_edge_cases() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/contributions/analyze",
            json!({"dataset_id": "climate_data", "model_id": "temperature_prediction", "method": "gradcam"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FORMAT");

    let (status, body) = send(
        &router,
        post_json("/api/contributions/analyze", json!({"model_id": "temperature_prediction"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_FIELD");
    assert_eq!(body["error"]["field"], "dataset_id");

    let (status, body) = send(
        &router,
        post_json("/api/contributions/analyze", json!({"dataset_id": "climate_data"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "model_id");

    let (status, body) = send(
        &router,
        post_json(
            "/api/contributions/analyze",
            json!({"dataset_id": "unknown", "model_id": "temperature_prediction"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contributions"], json!([]));
    assert_eq!(body["citations_logged"], 0);

    assert_eq!(state.registry.read().await.len(), 3);
}

#[tokio::test]
async fn test_visualization() {
    let (_, router) = app();

    let (status, body) = send(
        &router,
        get("/api/contributions/visualization?dataset_id=climate_data&model_id=climate_impact_model"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "waterfall");
    assert_eq!(body["method"], "SHAP");
    assert_eq!(body["baseline"], 0.5);

    let (status, body) = send(
        &router,
        get("/api/contributions/visualization?dataset_id=nope&model_id=climate_impact_model&method=lime"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_simulate_citations() {
    let (state, router) = app();

    let (status, body) = send(
        &router,
        post_json("/api/demo/simulate-citations", json!({"count": 7, "ai_model": "Claude-3"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 7);
    assert_eq!(body["citations"][5]["doi"], body["citations"][0]["doi"]);
    assert_eq!(state.registry.read().await.len(), 10);

    let (status, _) = send(&router, post_json("/api/demo/simulate-citations", json!({"count": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        post_json("/api/demo/simulate-citations", json!({"count": 100000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "count");
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_api_requests() {
    let mut config = AppConfig::default();
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 1;
    let router = create_router(AppState::new(config));

    let (status, _) = send(&router, get("/api/stats/summary")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, get("/api/stats/summary")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    let (status, _) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_configured_score_policy_drives_top_cited() {
    let mut config = AppConfig::default();
    config.registry.score.count_weight = 1.0;
    config.registry.score.contribution_weight = 0.0;
    config.registry.score.recency_weight = 0.0;
    config.registry.score.diversity_weight = 0.0;
    config.registry.score.scale = 1.0;
    let router = create_router(AppState::new(config));

    let (status, body) = send(&router, get("/api/stats/top-cited?model=GPT-4")).await;
    assert_eq!(status, StatusCode::OK);
    let top = body["top_cited"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["aicif_score"], 1.0);
    assert_eq!(top[1]["aicif_score"], 1.0);
}

#[tokio::test]
async fn test_seeding_can_be_disabled() {
    let mut config = AppConfig::default();
    config.demo.seed_sample_data = false;
    let router = create_router(AppState::new(config));

    let (_, body) = send(&router, get("/api/stats/summary")).await;
    assert_eq!(body["summary"]["total_citations"], 0);

    let (_, body) = send(&router, get("/api/graph")).await;
    assert_eq!(body["graph"]["nodes"], json!([]));
}
