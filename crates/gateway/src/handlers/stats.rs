//! Registry statistics handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::SUCCESS;
use crate::AppState;
use aicif_citation::registry::{SummaryStats, TopCited};

#[derive(Debug, Default, Deserialize)]
pub struct TopCitedParams {
    /// Restrict counting to one AI model
    pub model: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct TopCitedResponse {
    pub status: &'static str,
    pub top_cited: Vec<TopCited>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub status: &'static str,
    pub summary: SummaryStats,
}

/// Most cited works with their AIC-IF scores
pub async fn top_cited(
    State(state): State<AppState>,
    Query(params): Query<TopCitedParams>,
) -> Json<TopCitedResponse> {
    let limit = state
        .config
        .registry_limit(params.limit, state.config.registry.top_cited_limit);
    let top_cited = state
        .registry
        .read()
        .await
        .get_top_cited(params.model.as_deref(), limit);

    Json(TopCitedResponse {
        status: SUCCESS,
        top_cited,
    })
}

/// Registry-wide counts
pub async fn summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let summary = state.registry.read().await.get_summary_stats();

    Json(SummaryResponse {
        status: SUCCESS,
        summary,
    })
}
