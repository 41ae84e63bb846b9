//! Axum route handlers for the Workflow API.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::agent::workflow::{
    Application, ApplicationReceipt, ExportFormat, WorkflowParams, WorkflowResult,
};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_TOP_N: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of POST /api/v1/workflow/run. Omitted knobs fall back to the agent settings.
#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    pub num_jobs: Option<usize>,
    pub min_relevance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopMatchesResponse {
    pub applications: Vec<Application>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub runs: Vec<WorkflowResult>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub receipts: Vec<ApplicationReceipt>,
    pub total: usize,
    pub threshold: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/workflow/run
///
/// Full pipeline: search → score → customize → rank → summarize.
pub async fn handle_run_workflow(
    State(state): State<AppState>,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<WorkflowResult>, AppError> {
    let settings = &state.config.agent;
    let params = WorkflowParams {
        keywords: request.keywords,
        location: request.location,
        num_jobs: request.num_jobs.unwrap_or(settings.default_num_jobs),
        min_relevance: request.min_relevance.unwrap_or(settings.min_relevance),
    };

    if params.num_jobs == 0 {
        return Err(AppError::Validation("num_jobs must be positive".to_string()));
    }
    if !(0.0..=1.0).contains(&params.min_relevance) {
        return Err(AppError::Validation(
            "min_relevance must be between 0 and 1".to_string(),
        ));
    }

    let result = state.agent.write().await.run_workflow(&params).await?;
    Ok(Json(result))
}

/// GET /api/v1/workflow/top?n=
pub async fn handle_top_matches(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Json<TopMatchesResponse> {
    let applications = state
        .agent
        .read()
        .await
        .get_top_matches(query.n.unwrap_or(DEFAULT_TOP_N));
    Json(TopMatchesResponse {
        total: applications.len(),
        applications,
    })
}

/// GET /api/v1/workflow/history
pub async fn handle_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let runs = state.agent.read().await.workflow_history().to_vec();
    Json(HistoryResponse {
        total: runs.len(),
        runs,
    })
}

/// DELETE /api/v1/workflow/history
pub async fn handle_clear_history(State(state): State<AppState>) -> StatusCode {
    state.agent.write().await.clear_history();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/workflow/export?format=json|text
///
/// Renders the most recent run. Defaults to JSON.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => ExportFormat::Json,
    };

    let agent = state.agent.read().await;
    let body = agent.export_results(format)?;
    let content_type = match format {
        ExportFormat::Json if agent.last_result().is_some() => "application/json",
        _ => "text/plain; charset=utf-8",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// POST /api/v1/workflow/apply
///
/// Simulated submission of every application from the last run at or above `threshold`.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let threshold = request
        .threshold
        .unwrap_or(state.config.agent.auto_apply_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::Validation(
            "threshold must be between 0 and 1".to_string(),
        ));
    }

    let agent = state.agent.read().await;
    let last = agent.last_result().ok_or_else(|| {
        AppError::UnprocessableEntity("No workflow has been run yet".to_string())
    })?;
    let receipts = agent.batch_apply(&last.applications, threshold);

    Ok(Json(ApplyResponse {
        total: receipts.len(),
        receipts,
        threshold,
    }))
}
