//! Axum route handlers for the relevance endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::handlers::split_list;
use crate::catalog::models::JobPosting;
use crate::errors::AppError;
use crate::matching::relevance::{filter_relevant_jobs, match_details, ApplyDecision, MatchDetails};
use crate::state::AppState;
use crate::text::format::normalize_score;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Requirements may arrive as a JSON list or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    List(Vec<String>),
    Csv(String),
}

impl SkillList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SkillList::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            SkillList::Csv(raw) => split_list(&raw),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Catalog job to score. Takes precedence over the inline fields.
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub requirements: Option<SkillList>,
    /// Defaults to the current base résumé's skills.
    pub resume_skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub job_id: Option<String>,
    pub relevance_score: f64,
    pub match_details: MatchDetails,
    pub decision: ApplyDecision,
    pub scorer_backend: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub threshold: f64,
    pub resume_skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RankedJob {
    pub job: JobPosting,
    pub relevance_score: f64,
    /// Where the score sits between the threshold (0) and a perfect match (1).
    pub margin: f64,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub ranked: Vec<RankedJob>,
    pub total: usize,
    pub scorer_backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/classify
///
/// Scores one posting (catalog or inline) against a skill list.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let agent = state.agent.read().await;

    let job = match request.job_id.as_deref() {
        Some(job_id) => agent
            .catalog()
            .get_job_by_id(job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?,
        None => {
            let title = request.title.clone().unwrap_or_default();
            if title.trim().is_empty() && request.requirements.is_none() {
                return Err(AppError::Validation(
                    "Provide either job_id or title and requirements".to_string(),
                ));
            }
            inline_job(
                title,
                String::new(),
                request.requirements.clone().map(SkillList::into_vec).unwrap_or_default(),
            )
        }
    };

    let resume_skills = request
        .resume_skills
        .unwrap_or_else(|| agent.customizer().sample_resume().skills.clone());

    let relevance_score = agent.scorer().score(&job, &resume_skills).await?;
    let details = match_details(&job.requirements, &resume_skills);

    Ok(Json(ClassifyResponse {
        job_id: request.job_id,
        relevance_score,
        match_details: details,
        decision: ApplyDecision::for_score(relevance_score),
        scorer_backend: agent.scorer().backend(),
    }))
}

/// POST /api/v1/jobs/rank
///
/// Searches the catalog and returns postings at or above `threshold`, best first.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if !(0.0..=1.0).contains(&request.threshold) {
        return Err(AppError::Validation(
            "threshold must be between 0 and 1".to_string(),
        ));
    }

    let agent = state.agent.read().await;
    let jobs = agent.catalog().search_jobs(
        &request.keywords,
        &request.location,
        agent.catalog().job_count(),
    );
    let resume_skills = request
        .resume_skills
        .unwrap_or_else(|| agent.customizer().sample_resume().skills.clone());

    let ranked: Vec<RankedJob> =
        filter_relevant_jobs(agent.scorer(), jobs, &resume_skills, request.threshold)
            .await?
            .into_iter()
            .map(|(job, relevance_score)| RankedJob {
                job,
                margin: normalize_score(relevance_score, request.threshold, 1.0),
                relevance_score,
            })
            .collect();

    Ok(Json(RankResponse {
        total: ranked.len(),
        ranked,
        scorer_backend: agent.scorer().backend(),
    }))
}

/// Ad-hoc posting built from request fields; never stored in the catalog.
pub fn inline_job(title: String, company: String, requirements: Vec<String>) -> JobPosting {
    JobPosting {
        id: "inline".to_string(),
        title,
        company,
        location: String::new(),
        description: String::new(),
        requirements,
        experience_required: 0,
        salary_range: String::new(),
        posted_date: Utc::now().date_naive(),
        job_type: "Full-time".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_list_accepts_both_shapes() {
        let list: SkillList = serde_json::from_str(r#"["Python", " Docker ", ""]"#).unwrap();
        assert_eq!(list.into_vec(), vec!["Python", "Docker"]);

        let csv: SkillList = serde_json::from_str(r#""Python, Docker,,AWS""#).unwrap();
        assert_eq!(csv.into_vec(), vec!["Python", "Docker", "AWS"]);
    }
}
