//! Model interpretation handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_request, SUCCESS};
use crate::AppState;
use aicif_citation::{
    interpreter::{DatasetSummary, FeatureContribution, ModelSummary},
    ExplanationMethod,
};
use aicif_common::{
    errors::{AppError, Result},
    metrics, NewCitation, SourceType,
};

/// Attributed to logged contributions when the caller names no user
const DEFAULT_USER: &str = "demo_user";

/// Ids are optional only so that their absence is reported as a missing
/// field rather than a body parse failure.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 128))]
    pub dataset_id: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub model_id: Option<String>,

    /// `shap` (default) or `lime`, any case
    pub method: Option<String>,

    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub dataset_id: String,
    pub model_id: String,
    pub explanation_method: &'static str,
    pub contributions: Vec<FeatureContribution>,
    pub citations_logged: usize,
}

#[derive(Debug, Deserialize)]
pub struct VisualizationParams {
    pub dataset_id: String,
    pub model_id: String,
    pub method: Option<String>,
}

#[derive(Serialize)]
pub struct DatasetsResponse {
    pub status: &'static str,
    pub datasets: Vec<DatasetSummary>,
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub status: &'static str,
    pub models: Vec<ModelSummary>,
}

fn parse_method(method: Option<&str>) -> Result<ExplanationMethod> {
    method.map_or(Ok(ExplanationMethod::default()), str::parse)
}

pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetsResponse> {
    Json(DatasetsResponse {
        status: SUCCESS,
        datasets: state.interpreter.list_datasets(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        status: SUCCESS,
        models: state.interpreter.list_models(),
    })
}

/// Attribute a model's output to its data sources and log each source as a
/// dataset citation by the model
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    let Some(dataset_id) = request.dataset_id.clone() else {
        return Err(AppError::MissingField { field: "dataset_id".to_string() });
    };
    let Some(model_id) = request.model_id.clone() else {
        return Err(AppError::MissingField { field: "model_id".to_string() });
    };
    validate_request(&request)?;
    let method = parse_method(request.method.as_deref())?;

    let contributions = state
        .interpreter
        .analyze_contributions(&dataset_id, &model_id, method);
    metrics::record_contribution_analysis(method.as_str(), contributions.len());

    let user_id = request.user_id.unwrap_or_else(|| DEFAULT_USER.to_string());
    let context = format!("Feature contribution via {} analysis", method.as_upper());

    let citations: Vec<NewCitation> = contributions
        .iter()
        .map(|c| NewCitation {
            source_title: Some(c.feature.clone()),
            source_type: Some(SourceType::Dataset),
            contribution_score: Some(c.value),
            user_id: Some(user_id.clone()),
            context: Some(context.clone()),
            ..NewCitation::new(c.doi.clone(), model_id.clone())
        })
        .collect();
    let citations_logged = state.log_citations(citations).await.len();

    tracing::info!(
        dataset_id = %dataset_id,
        model_id = %model_id,
        method = method.as_str(),
        citations_logged,
        "Contribution analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        status: SUCCESS,
        dataset_id,
        model_id,
        explanation_method: method.as_upper(),
        contributions,
        citations_logged,
    }))
}

/// Chart data for an analysis, `{}` when there is nothing to chart
pub async fn visualization(
    State(state): State<AppState>,
    Query(params): Query<VisualizationParams>,
) -> Result<Response> {
    let method = parse_method(params.method.as_deref())?;

    let response = match state
        .interpreter
        .generate_visualization(&params.dataset_id, &params.model_id, method)
    {
        Some(chart) => Json(chart).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    };

    Ok(response)
}
