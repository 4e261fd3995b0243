//! Citation registry handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_request, SUCCESS};
use crate::AppState;
use aicif_citation::CitationQuery;
use aicif_common::{
    errors::{AppError, Result},
    models::parse_timestamp,
    CitationRecord, NewCitation, SourceType,
};

/// Citation event reported by an AI system
///
/// `doi` and `ai_model` are optional here only so that their absence can be
/// reported as a missing field rather than a body parse failure.
#[derive(Debug, Deserialize, Validate)]
pub struct LogCitationRequest {
    #[validate(length(min = 1, max = 512))]
    pub doi: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub ai_model: Option<String>,

    pub citation_id: Option<String>,

    #[validate(length(max = 2000))]
    pub source_title: Option<String>,

    pub source_type: Option<SourceType>,

    #[validate(length(max = 2000))]
    pub authors: Option<String>,

    #[validate(range(min = 0.0, max = 1.0))]
    pub contribution_score: Option<f64>,

    pub user_id: Option<String>,

    pub context: Option<String>,

    pub timestamp: Option<String>,
}

impl LogCitationRequest {
    /// Required fields first, then field constraints
    fn into_citation(self) -> Result<NewCitation> {
        let Some(doi) = self.doi.clone() else {
            return Err(AppError::MissingField { field: "doi".to_string() });
        };
        let Some(ai_model) = self.ai_model.clone() else {
            return Err(AppError::MissingField { field: "ai_model".to_string() });
        };

        validate_request(&self)?;

        if let Some(timestamp) = &self.timestamp {
            if parse_timestamp(timestamp).is_none() {
                return Err(AppError::InvalidTimestamp {
                    value: timestamp.clone(),
                    context: "timestamp".to_string(),
                });
            }
        }

        Ok(NewCitation {
            citation_id: self.citation_id,
            source_title: self.source_title,
            source_type: self.source_type,
            authors: self.authors,
            contribution_score: self.contribution_score,
            user_id: self.user_id,
            context: self.context,
            timestamp: self.timestamp,
            ..NewCitation::new(doi, ai_model)
        })
    }
}

#[derive(Serialize)]
pub struct LogCitationResponse {
    pub status: &'static str,
    pub citation_id: String,
    pub message: &'static str,
}

/// Citation log filters
#[derive(Debug, Default, Deserialize)]
pub struct CitationParams {
    pub doi: Option<String>,
    pub ai_model: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct CitationListResponse {
    pub status: &'static str,
    pub count: usize,
    pub citations: Vec<CitationRecord>,
}

/// Log a citation event
pub async fn log_citation(
    State(state): State<AppState>,
    Json(request): Json<LogCitationRequest>,
) -> Result<Json<LogCitationResponse>> {
    let citation = request.into_citation()?;

    let mut records = state.log_citations(vec![citation]).await;
    let record = records.pop().ok_or_else(|| AppError::Internal {
        message: "citation was not recorded".to_string(),
    })?;

    tracing::info!(
        citation_id = %record.citation_id,
        doi = %record.doi,
        ai_model = %record.ai_model,
        "Citation logged"
    );

    Ok(Json(LogCitationResponse {
        status: SUCCESS,
        citation_id: record.citation_id,
        message: "Citation logged successfully",
    }))
}

/// Query the citation log, newest first
pub async fn list_citations(
    State(state): State<AppState>,
    Query(params): Query<CitationParams>,
) -> Result<Json<CitationListResponse>> {
    let query = CitationQuery {
        doi: params.doi,
        ai_model: params.ai_model,
        start_date: params.start_date,
        end_date: params.end_date,
        limit: state
            .config
            .registry_limit(params.limit, state.config.registry.default_limit),
    };

    let citations = state.registry.read().await.get_citations(&query)?;

    Ok(Json(CitationListResponse {
        status: SUCCESS,
        count: citations.len(),
        citations,
    }))
}

/// Most recent citation events
pub async fn recent_citations(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Json<CitationListResponse> {
    let limit = state
        .config
        .registry_limit(params.limit, state.config.registry.recent_limit);
    let citations = state.registry.read().await.get_recent_citations(limit);

    Json(CitationListResponse {
        status: SUCCESS,
        count: citations.len(),
        citations,
    })
}
