//! Axum route handlers for the text utility endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::text::extract::{extract_email, extract_experience, extract_phone};
use crate::text::format::{format_job_description, resume_summary};
use crate::text::normalize::{clean_text, tokenize};
use crate::text::similarity::calculate_similarity;
use crate::text::skills::{calculate_match_score, calculate_skill_match, extract_skills};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub cleaned: String,
    pub token_count: usize,
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub similarity: f64,
}

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub job_id: String,
    pub match_score: f64,
    pub skill_match: f64,
    pub job_description: String,
    pub resume_summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/text/analyze
///
/// Runs every extractor over a free-text blob (résumé or posting).
pub async fn handle_analyze(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    Ok(Json(AnalyzeResponse {
        cleaned: clean_text(&request.text),
        token_count: tokenize(&request.text).len(),
        skills: extract_skills(&request.text),
        experience_years: extract_experience(&request.text),
        email: extract_email(&request.text),
        phone: extract_phone(&request.text),
    }))
}

/// POST /api/v1/text/similarity
pub async fn handle_similarity(Json(request): Json<SimilarityRequest>) -> Json<SimilarityResponse> {
    Json(SimilarityResponse {
        similarity: calculate_similarity(&request.a, &request.b),
    })
}

/// POST /api/v1/text/match-score
///
/// Weighted skill/experience score of the current base résumé against a catalog job.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    let agent = state.agent.read().await;
    let job = agent
        .catalog()
        .get_job_by_id(&request.job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;
    let resume = agent.customizer().sample_resume();

    Ok(Json(MatchScoreResponse {
        job_id: job.id.clone(),
        match_score: calculate_match_score(resume, &job),
        skill_match: calculate_skill_match(&resume.skills, &job.requirements),
        job_description: format_job_description(&job),
        resume_summary: resume_summary(resume),
    }))
}
