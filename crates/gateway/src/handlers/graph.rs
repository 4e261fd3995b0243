//! Knowledge graph handlers
//!
//! Entity ids are DOIs, author names or model names, which may contain
//! slashes, so they travel as query parameters rather than path segments.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::SUCCESS;
use crate::AppState;
use aicif_citation::graph::{EntityConnections, GraphData, PathStep};
use aicif_common::{
    errors::{AppError, Result},
    metrics,
};

#[derive(Debug, Deserialize)]
pub struct ConnectionParams {
    pub entity_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub source: String,
    pub target: String,
    pub max_depth: Option<usize>,
}

#[derive(Serialize)]
pub struct GraphResponse {
    pub status: &'static str,
    pub graph: GraphData,
}

#[derive(Serialize)]
pub struct ConnectionsResponse {
    pub status: &'static str,
    pub connections: EntityConnections,
}

#[derive(Serialize)]
pub struct PathResponse {
    pub status: &'static str,
    pub source: String,
    pub target: String,
    /// Depth actually searched, after clamping
    pub max_depth: usize,
    pub count: usize,
    pub paths: Vec<Vec<PathStep>>,
}

/// Every node and edge, for rendering
pub async fn graph_data(State(state): State<AppState>) -> Json<GraphResponse> {
    let graph = state.graph.read().await.get_visualization_data();

    Json(GraphResponse {
        status: SUCCESS,
        graph,
    })
}

/// Direct neighbors of one entity
pub async fn entity_connections(
    State(state): State<AppState>,
    Query(params): Query<ConnectionParams>,
) -> Result<Json<ConnectionsResponse>> {
    let connections = state
        .graph
        .read()
        .await
        .get_entity_connections(&params.entity_id)
        .ok_or_else(|| AppError::EntityNotFound {
            id: params.entity_id.clone(),
        })?;

    Ok(Json(ConnectionsResponse {
        status: SUCCESS,
        connections,
    }))
}

/// Simple directed paths between two entities
pub async fn citation_path(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> Json<PathResponse> {
    let max_depth = state.config.path_depth(params.max_depth);

    let start = Instant::now();
    let paths = state
        .graph
        .read()
        .await
        .get_citation_path(&params.source, &params.target, max_depth);
    metrics::record_path_search(start.elapsed().as_secs_f64(), paths.len());

    tracing::debug!(
        source = %params.source,
        target = %params.target,
        max_depth,
        found = paths.len(),
        "Path search complete"
    );

    Json(PathResponse {
        status: SUCCESS,
        source: params.source,
        target: params.target,
        max_depth,
        count: paths.len(),
        paths,
    })
}
