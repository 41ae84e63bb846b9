//! Relevance Scoring — pluggable, trait-based scorer that measures a résumé's skills
//! against a posting's requirements.
//!
//! Default: `SkillOverlapScorer` (pure-Rust, deterministic).
//!
//! `AppState` holds an `Arc<dyn RelevanceScorer>` inside the agent.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::models::JobPosting;
use crate::errors::AppError;
use crate::text::normalize::lowercase_set;

/// Score given to postings that list no requirements at all.
pub const NEUTRAL_SCORE: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Recommendation band derived from a relevance score. Serializes as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended - Strong match")]
    HighlyRecommended,
    #[serde(rename = "Recommended - Good match")]
    Recommended,
    #[serde(rename = "Consider - Moderate match")]
    Consider,
    #[serde(rename = "Possible - Weak match")]
    Possible,
    #[serde(rename = "Not Recommended - Poor match")]
    NotRecommended,
}

impl Recommendation {
    pub fn for_score(score: f64) -> Self {
        if score >= 0.8 {
            Recommendation::HighlyRecommended
        } else if score >= 0.6 {
            Recommendation::Recommended
        } else if score >= 0.4 {
            Recommendation::Consider
        } else if score >= 0.2 {
            Recommendation::Possible
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended - Strong match",
            Recommendation::Recommended => "Recommended - Good match",
            Recommendation::Consider => "Consider - Moderate match",
            Recommendation::Possible => "Possible - Weak match",
            Recommendation::NotRecommended => "Not Recommended - Poor match",
        }
    }
}

/// Quick go/no-go verdict shown next to a single classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyDecision {
    Apply,
    ConsiderCarefully,
    Skip,
}

impl ApplyDecision {
    pub fn for_score(score: f64) -> Self {
        if score >= 0.5 {
            ApplyDecision::Apply
        } else if score >= 0.3 {
            ApplyDecision::ConsiderCarefully
        } else {
            ApplyDecision::Skip
        }
    }
}

/// Skill-level breakdown of one résumé/posting comparison.
///
/// Skill lists are lower-cased and sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub relevance_score: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub match_percentage: String,
    pub recommendation: Recommendation,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The relevance scorer trait. Implement this to swap backends without touching
/// the agent or the handlers.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Relevance of `job` for a résumé with `resume_skills`, in [0, 1].
    async fn score(&self, job: &JobPosting, resume_skills: &[String]) -> Result<f64, AppError>;

    /// Backend label surfaced in API responses.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// SkillOverlapScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Requirement coverage: |résumé ∩ requirements| / |requirements| over lower-cased sets.
pub struct SkillOverlapScorer;

#[async_trait]
impl RelevanceScorer for SkillOverlapScorer {
    async fn score(&self, job: &JobPosting, resume_skills: &[String]) -> Result<f64, AppError> {
        Ok(classify_job(&job.requirements, resume_skills))
    }

    fn backend(&self) -> &'static str {
        "skill_overlap"
    }
}

/// Core overlap score. Postings without requirements get [`NEUTRAL_SCORE`].
pub fn classify_job<S: AsRef<str>, T: AsRef<str>>(requirements: &[S], resume_skills: &[T]) -> f64 {
    if requirements.is_empty() {
        return NEUTRAL_SCORE;
    }

    let resume_set = lowercase_set(resume_skills);
    let job_set = lowercase_set(requirements);
    let matching = resume_set.intersection(&job_set).count();

    (matching as f64 / job_set.len() as f64).min(1.0)
}

/// Full skill breakdown. Unlike [`classify_job`], an empty requirement list scores 0.
pub fn match_details<S: AsRef<str>, T: AsRef<str>>(requirements: &[S], resume_skills: &[T]) -> MatchDetails {
    let resume_set = lowercase_set(resume_skills);
    let job_set = lowercase_set(requirements);

    let mut matching: Vec<String> = resume_set.intersection(&job_set).cloned().collect();
    let mut missing: Vec<String> = job_set.difference(&resume_set).cloned().collect();
    let mut extra: Vec<String> = resume_set.difference(&job_set).cloned().collect();
    matching.sort();
    missing.sort();
    extra.sort();

    let score = if job_set.is_empty() {
        0.0
    } else {
        matching.len() as f64 / job_set.len() as f64
    };

    MatchDetails {
        relevance_score: score,
        matching_skills: matching,
        missing_skills: missing,
        extra_skills: extra,
        match_percentage: format!("{:.1}%", score * 100.0),
        recommendation: Recommendation::for_score(score),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Batch helpers
// ────────────────────────────────────────────────────────────────────────────

/// Scores every posting, preserving input order.
pub async fn batch_classify(
    scorer: &dyn RelevanceScorer,
    jobs: &[JobPosting],
    resume_skills: &[String],
) -> Result<Vec<f64>, AppError> {
    let mut scores = Vec::with_capacity(jobs.len());
    for job in jobs {
        scores.push(scorer.score(job, resume_skills).await?);
    }
    Ok(scores)
}

/// Every posting paired with its score, highest first. Ties keep input order.
pub async fn rank_jobs(
    scorer: &dyn RelevanceScorer,
    jobs: Vec<JobPosting>,
    resume_skills: &[String],
) -> Result<Vec<(JobPosting, f64)>, AppError> {
    let scores = batch_classify(scorer, &jobs, resume_skills).await?;
    let mut ranked: Vec<(JobPosting, f64)> = jobs.into_iter().zip(scores).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(ranked)
}

/// Postings scoring at least `threshold`, highest first.
pub async fn filter_relevant_jobs(
    scorer: &dyn RelevanceScorer,
    jobs: Vec<JobPosting>,
    resume_skills: &[String],
    threshold: f64,
) -> Result<Vec<(JobPosting, f64)>, AppError> {
    let ranked = rank_jobs(scorer, jobs, resume_skills).await?;
    Ok(ranked
        .into_iter()
        .filter(|(_, score)| *score >= threshold)
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
