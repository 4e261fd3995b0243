//! Health check handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentSizes,
}

#[derive(Serialize)]
pub struct ComponentSizes {
    pub registry: RegistrySize,
    pub graph: GraphSize,
    pub interpreter: InterpreterSize,
}

#[derive(Serialize)]
pub struct RegistrySize {
    pub citations: usize,
}

#[derive(Serialize)]
pub struct GraphSize {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Serialize)]
pub struct InterpreterSize {
    pub datasets: usize,
    pub models: usize,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: aicif_common::VERSION,
    })
}

/// Readiness probe - reports the size of each component
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let citations = state.registry.read().await.len();
    let (nodes, edges) = {
        let graph = state.graph.read().await;
        (graph.node_count(), graph.edge_count())
    };
    let catalog = state.interpreter.catalog();

    Json(ReadyResponse {
        status: "ready",
        components: ComponentSizes {
            registry: RegistrySize { citations },
            graph: GraphSize { nodes, edges },
            interpreter: InterpreterSize {
                datasets: catalog.datasets.len(),
                models: catalog.models.len(),
            },
        },
    })
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
