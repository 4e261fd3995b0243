//! Demo traffic handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_request, SUCCESS};
use crate::AppState;
use aicif_citation::seed;
use aicif_common::{
    errors::{AppError, Result},
    CitationRecord,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SimulateRequest {
    #[serde(default = "default_count")]
    #[validate(range(min = 1))]
    pub count: usize,

    #[serde(default = "default_ai_model")]
    #[validate(length(min = 1, max = 256))]
    pub ai_model: String,
}

fn default_count() -> usize { 10 }
fn default_ai_model() -> String { "GPT-4".to_string() }

#[derive(Serialize)]
pub struct SimulateResponse {
    pub status: &'static str,
    pub count: usize,
    pub citations: Vec<CitationRecord>,
}

/// Log a batch of synthetic citation events
pub async fn simulate_citations(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>> {
    validate_request(&request)?;

    let max = state.config.demo.max_simulated_citations;
    if request.count > max {
        return Err(AppError::Validation {
            message: format!("count must be at most {max}"),
            field: Some("count".to_string()),
        });
    }

    let batch = {
        let mut rng = rand::thread_rng();
        seed::simulated_citations(request.count, &request.ai_model, &mut rng)
    };
    let citations = state.log_citations(batch).await;

    tracing::info!(
        count = citations.len(),
        ai_model = %request.ai_model,
        "Simulated citations logged"
    );

    Ok(Json(SimulateResponse {
        status: SUCCESS,
        count: citations.len(),
        citations,
    }))
}
