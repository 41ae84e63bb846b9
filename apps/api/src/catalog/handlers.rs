//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::models::JobPosting;
use crate::catalog::search::{filter_by_experience, filter_by_skills};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct JobSearchQuery {
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    pub limit: Option<usize>,
    pub min_experience: Option<u32>,
    pub max_experience: Option<u32>,
    /// Comma-separated; a job matches when it requires any of them.
    pub skills: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobPosting>,
    pub total: usize,
}

/// Body of POST /api/v1/jobs. A missing id is generated; a missing date is today.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub experience_required: u32,
    #[serde(default)]
    pub salary_range: String,
    pub posted_date: Option<NaiveDate>,
    pub job_type: Option<String>,
}

impl CreateJobRequest {
    fn into_posting(self) -> JobPosting {
        JobPosting {
            id: self
                .id
                .unwrap_or_else(|| format!("job_{}", Uuid::new_v4().simple())),
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            requirements: self.requirements,
            experience_required: self.experience_required,
            salary_range: self.salary_range,
            posted_date: self.posted_date.unwrap_or_else(|| Utc::now().date_naive()),
            job_type: self.job_type.unwrap_or_else(|| "Full-time".to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// Keyword/location search, then optional experience-range and skill filters.
/// `limit` applies to the filtered list.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let agent = state.agent.read().await;
    let catalog = agent.catalog();
    let mut jobs = catalog.search_jobs(&query.keywords, &query.location, catalog.job_count());

    if query.min_experience.is_some() || query.max_experience.is_some() {
        let min = query.min_experience.unwrap_or(0);
        let max = query.max_experience.unwrap_or(u32::MAX);
        if min > max {
            return Err(AppError::Validation(format!(
                "min_experience ({min}) cannot exceed max_experience ({max})"
            )));
        }
        jobs = filter_by_experience(jobs, min, max);
    }

    if let Some(raw) = query.skills.as_deref() {
        let skills = split_list(raw);
        if !skills.is_empty() {
            jobs = filter_by_skills(jobs, &skills);
        }
    }

    if let Some(limit) = query.limit {
        jobs.truncate(limit);
    }

    Ok(Json(JobListResponse {
        total: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    state
        .agent
        .read()
        .await
        .catalog()
        .get_job_by_id(&job_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// POST /api/v1/jobs
///
/// Adds a posting to the in-memory catalog. Lost on restart.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let job = request.into_posting();
    state.agent.write().await.catalog_mut().add_job(job.clone())?;
    info!("Added job {} ({} at {})", job.id, job.title, job.company);
    Ok((StatusCode::CREATED, Json(job)))
}

/// Splits a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
