//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::handlers::{inline_job, SkillList};
use crate::resume::models::{CustomizedResume, Resume, ResumeUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomizeRequest {
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub requirements: Option<SkillList>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CustomizeResponse {
    pub customized_resume: CustomizedResume,
    pub cover_letter: String,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Resume> {
    Json(state.agent.read().await.customizer().sample_resume().clone())
}

/// PATCH /api/v1/resume
///
/// Partial update of the base résumé used by every later customization and run.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<Resume>, AppError> {
    let mut agent = state.agent.write().await;
    let updated = agent.customizer_mut().update_resume(update)?.clone();
    info!("Base resume updated for {}", updated.name);
    Ok(Json(updated))
}

/// POST /api/v1/resumes/customize
///
/// Tailors the base résumé to a catalog job or an inline posting and writes a cover letter.
/// An inline posting without requirements is treated as asking for the résumé's own skills.
pub async fn handle_customize(
    State(state): State<AppState>,
    Json(request): Json<CustomizeRequest>,
) -> Result<Json<CustomizeResponse>, AppError> {
    let agent = state.agent.read().await;
    let customizer = agent.customizer();

    let job = match request.job_id.as_deref() {
        Some(job_id) => agent
            .catalog()
            .get_job_by_id(job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?,
        None => {
            let title = request.title.unwrap_or_default();
            let company = request.company.unwrap_or_default();
            if title.trim().is_empty() || company.trim().is_empty() {
                return Err(AppError::Validation(
                    "Provide either job_id or title and company".to_string(),
                ));
            }
            let mut requirements = request
                .requirements
                .map(SkillList::into_vec)
                .unwrap_or_default();
            if requirements.is_empty() {
                requirements = customizer.sample_resume().skills.clone();
            }
            let mut job = inline_job(title, company, requirements);
            job.description = request.description;
            job
        }
    };

    let customized_resume = customizer.customize_for_job(&job);
    let cover_letter = customizer.generate_cover_letter(&job, &customized_resume);

    Ok(Json(CustomizeResponse {
        customized_resume,
        cover_letter,
    }))
}
