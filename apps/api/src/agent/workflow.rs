//! Application Workflow — orchestrates a full job-search run.
//!
//! Flow: search_jobs → score each posting → customize + cover letter for those
//!       above threshold → rank → summarize → append to history.
//!
//! History lives in memory only; it is lost on restart.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::report::format_text_report;
use crate::catalog::models::JobPosting;
use crate::catalog::search::JobCatalog;
use crate::errors::AppError;
use crate::matching::relevance::{match_details, MatchDetails, RelevanceScorer};
use crate::resume::customizer::ResumeCustomizer;
use crate::resume::models::CustomizedResume;

/// Score at or above which an application counts as highly relevant.
const HIGHLY_RELEVANT: f64 = 0.8;
/// Score at or above which an application counts as moderately relevant.
const MODERATELY_RELEVANT: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Inputs of a single workflow run, after defaults are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowParams {
    pub keywords: String,
    pub location: String,
    pub num_jobs: usize,
    pub min_relevance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Ready to Apply")]
    ReadyToApply,
    #[serde(rename = "Submitted")]
    Submitted,
}

/// A posting that cleared the relevance threshold, with everything needed to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub job: JobPosting,
    pub relevance_score: f64,
    pub match_details: MatchDetails,
    pub customized_resume: CustomizedResume,
    pub cover_letter: String,
    pub application_status: ApplicationStatus,
    pub recommended_action: String,
}

/// Aggregate statistics over the applications of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_searched: usize,
    pub relevant_found: usize,
    pub pass_rate: f64,
    pub avg_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub highly_relevant: usize,
    pub moderately_relevant: usize,
    pub weakly_relevant: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowSummary {
    Stats(SummaryStats),
    Empty {
        message: String,
        recommendation: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub total_jobs_found: usize,
    pub relevant_jobs: usize,
    /// relevant / found, in [0, 1].
    pub pass_rate: f64,
    pub avg_relevance_score: f64,
    pub applications: Vec<Application>,
    pub summary: WorkflowSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Confirmation returned by a (simulated) submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub application_date: NaiveDate,
    pub status: ApplicationStatus,
    pub relevance_score: f64,
    pub resume_customized: bool,
    pub cover_letter_included: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Text,
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(AppError::Validation(format!(
                "Unsupported export format '{other}' (expected 'json' or 'text')"
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Agent
// ────────────────────────────────────────────────────────────────────────────

/// Owns the catalog, the customizer, the scorer and the run history.
pub struct ApplicationAgent {
    catalog: JobCatalog,
    customizer: ResumeCustomizer,
    scorer: Arc<dyn RelevanceScorer>,
    history: Vec<WorkflowResult>,
}

impl fmt::Debug for ApplicationAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationAgent")
            .field("jobs", &self.catalog.job_count())
            .field("scorer", &self.scorer.backend())
            .field("workflows_run", &self.history.len())
            .finish()
    }
}

impl ApplicationAgent {
    pub fn new(
        catalog: JobCatalog,
        customizer: ResumeCustomizer,
        scorer: Arc<dyn RelevanceScorer>,
    ) -> Self {
        Self {
            catalog,
            customizer,
            scorer,
            history: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut JobCatalog {
        &mut self.catalog
    }

    pub fn customizer(&self) -> &ResumeCustomizer {
        &self.customizer
    }

    pub fn customizer_mut(&mut self) -> &mut ResumeCustomizer {
        &mut self.customizer
    }

    pub fn scorer(&self) -> &dyn RelevanceScorer {
        self.scorer.as_ref()
    }

    /// Runs the full pipeline and records the result.
    ///
    /// Steps:
    /// 1. search the catalog (a run that finds nothing is returned but not recorded)
    /// 2. score every posting against the base résumé skills
    /// 3. customize + cover letter for postings with score ≥ min_relevance
    /// 4. rank by score, highest first
    /// 5. summarize and append to history
    pub async fn run_workflow(&mut self, params: &WorkflowParams) -> Result<WorkflowResult, AppError> {
        // Step 1: Search
        let jobs = self
            .catalog
            .search_jobs(&params.keywords, &params.location, params.num_jobs);
        info!(
            "Workflow search '{}' in '{}' found {} jobs",
            params.keywords,
            params.location,
            jobs.len()
        );

        if jobs.is_empty() {
            return Ok(WorkflowResult {
                run_id: Uuid::new_v4(),
                completed_at: Utc::now(),
                total_jobs_found: 0,
                relevant_jobs: 0,
                pass_rate: 0.0,
                avg_relevance_score: 0.0,
                applications: Vec::new(),
                summary: empty_summary(),
                message: Some("No jobs found matching criteria".to_string()),
            });
        }

        // Step 2-3: Score, then customize the relevant ones
        let resume_skills = self.customizer.sample_resume().skills.clone();
        let mut applications = Vec::new();

        for job in &jobs {
            let relevance_score = self.scorer.score(job, &resume_skills).await?;
            if relevance_score < params.min_relevance {
                debug!(job_id = %job.id, relevance_score, "below threshold, skipped");
                continue;
            }

            let customized_resume = self.customizer.customize_for_job(job);
            let details = match_details(&job.requirements, &resume_skills);
            let cover_letter = self.customizer.generate_cover_letter(job, &customized_resume);

            applications.push(Application {
                job: job.clone(),
                relevance_score,
                recommended_action: details.recommendation.label().to_string(),
                match_details: details,
                customized_resume,
                cover_letter,
                application_status: ApplicationStatus::ReadyToApply,
            });
        }

        // Step 4: Rank
        applications.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        });

        // Step 5: Summarize + record
        let summary = summarize(jobs.len(), &applications);
        let scores: Vec<f64> = applications.iter().map(|a| a.relevance_score).collect();

        let result = WorkflowResult {
            run_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            total_jobs_found: jobs.len(),
            relevant_jobs: applications.len(),
            pass_rate: applications.len() as f64 / jobs.len() as f64,
            avg_relevance_score: mean(&scores),
            applications,
            summary,
            message: None,
        };

        info!(
            "Workflow {} complete: {}/{} jobs relevant",
            result.run_id, result.relevant_jobs, result.total_jobs_found
        );

        self.history.push(result.clone());
        Ok(result)
    }

    /// The first `n` applications of the most recent run.
    pub fn get_top_matches(&self, n: usize) -> Vec<Application> {
        self.history
            .last()
            .map(|run| run.applications.iter().take(n).cloned().collect())
            .unwrap_or_default()
    }

    /// Simulates submitting one application.
    pub fn apply_to_job(&self, application: &Application) -> ApplicationReceipt {
        info!(
            "Submitting application for {} at {}",
            application.job.title, application.job.company
        );
        ApplicationReceipt {
            job_id: application.job.id.clone(),
            job_title: application.job.title.clone(),
            company: application.job.company.clone(),
            application_date: Utc::now().date_naive(),
            status: ApplicationStatus::Submitted,
            relevance_score: application.relevance_score,
            resume_customized: true,
            cover_letter_included: !application.cover_letter.is_empty(),
            message: "Application successfully submitted".to_string(),
        }
    }

    /// Submits every application scoring at least `threshold`.
    pub fn batch_apply(&self, applications: &[Application], threshold: f64) -> Vec<ApplicationReceipt> {
        applications
            .iter()
            .filter(|app| app.relevance_score >= threshold)
            .map(|app| self.apply_to_job(app))
            .collect()
    }

    pub fn workflow_history(&self) -> &[WorkflowResult] {
        &self.history
    }

    pub fn last_result(&self) -> Option<&WorkflowResult> {
        self.history.last()
    }

    pub fn clear_history(&mut self) {
        info!("Clearing {} workflow results", self.history.len());
        self.history.clear();
    }

    /// Renders the most recent run.
    pub fn export_results(&self, format: ExportFormat) -> Result<String, AppError> {
        let Some(last) = self.history.last() else {
            return Ok("No results to export".to_string());
        };

        match format {
            ExportFormat::Json => serde_json::to_string_pretty(last).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to serialize workflow result: {e}"))
            }),
            ExportFormat::Text => Ok(format_text_report(last)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Summary helpers
// ────────────────────────────────────────────────────────────────────────────

fn empty_summary() -> WorkflowSummary {
    WorkflowSummary::Empty {
        message: "No relevant jobs found".to_string(),
        recommendation: "Try broadening search criteria".to_string(),
    }
}

fn summarize(total_searched: usize, applications: &[Application]) -> WorkflowSummary {
    if applications.is_empty() {
        return empty_summary();
    }

    let scores: Vec<f64> = applications.iter().map(|a| a.relevance_score).collect();
    let max_score = scores.iter().copied().fold(f64::MIN, f64::max);
    let min_score = scores.iter().copied().fold(f64::MAX, f64::min);

    WorkflowSummary::Stats(SummaryStats {
        total_searched,
        relevant_found: applications.len(),
        pass_rate: applications.len() as f64 / total_searched as f64,
        avg_score: mean(&scores),
        max_score,
        min_score,
        highly_relevant: scores.iter().filter(|s| **s >= HIGHLY_RELEVANT).count(),
        moderately_relevant: scores
            .iter()
            .filter(|s| (MODERATELY_RELEVANT..HIGHLY_RELEVANT).contains(*s))
            .count(),
        weakly_relevant: scores.iter().filter(|s| **s < MODERATELY_RELEVANT).count(),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::relevance::SkillOverlapScorer;

    fn make_agent() -> ApplicationAgent {
        ApplicationAgent::new(
            JobCatalog::with_sample_jobs(),
            ResumeCustomizer::default(),
            Arc::new(SkillOverlapScorer),
        )
    }

    fn params(keywords: &str, location: &str, num_jobs: usize, min_relevance: f64) -> WorkflowParams {
        WorkflowParams {
            keywords: keywords.to_string(),
            location: location.to_string(),
            num_jobs,
            min_relevance,
        }
    }

    #[tokio::test]
    async fn test_run_workflow_python_remote() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("python", "Remote", 5, 0.3)).await.unwrap();

        // job_001 (5/7) and job_003 (4/7) are the remote Python postings.
        assert_eq!(result.total_jobs_found, 2);
        assert_eq!(result.relevant_jobs, 2);
        assert_eq!(result.applications[0].job.id, "job_001");
        assert_eq!(result.applications[1].job.id, "job_003");
        assert!((result.pass_rate - 1.0).abs() < f64::EPSILON);
        let expected_avg = (5.0 / 7.0 + 4.0 / 7.0) / 2.0;
        assert!((result.avg_relevance_score - expected_avg).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_applications_ranked_descending() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("", "", 8, 0.0)).await.unwrap();
        assert_eq!(result.relevant_jobs, 8);
        for pair in result.applications.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        assert_eq!(result.applications[0].job.id, "job_001");
    }

    #[tokio::test]
    async fn test_no_jobs_found_not_recorded() {
        let mut agent = make_agent();
        let result = agent
            .run_workflow(&params("nonexistent_xyz", "", 5, 0.3))
            .await
            .unwrap();
        assert_eq!(result.total_jobs_found, 0);
        assert_eq!(result.relevant_jobs, 0);
        assert!(result.applications.is_empty());
        assert_eq!(result.message.as_deref(), Some("No jobs found matching criteria"));
        assert!(agent.workflow_history().is_empty());
    }

    #[tokio::test]
    async fn test_threshold_filters_applications() {
        let mut agent = make_agent();
        let low = agent.run_workflow(&params("python", "", 8, 0.1)).await.unwrap();
        let high = agent.run_workflow(&params("python", "", 8, 0.9)).await.unwrap();
        assert!(low.relevant_jobs >= high.relevant_jobs);
        assert_eq!(high.relevant_jobs, 0);
        assert!(matches!(high.summary, WorkflowSummary::Empty { .. }));
        assert_eq!(agent.workflow_history().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_buckets() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("", "", 8, 0.0)).await.unwrap();
        let WorkflowSummary::Stats(stats) = result.summary else {
            panic!("expected stats summary");
        };
        assert_eq!(stats.total_searched, 8);
        assert_eq!(stats.relevant_found, 8);
        // Scores: 5/7, 2/6, 4/7, 4/7, 2/6, 2/7, 4/6, 3/6
        assert_eq!(stats.highly_relevant, 0);
        assert_eq!(stats.moderately_relevant, 5);
        assert_eq!(stats.weakly_relevant, 3);
        assert!((stats.max_score - 5.0 / 7.0).abs() < 1e-9);
        assert!((stats.min_score - 2.0 / 7.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_application_contents() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("devops", "", 5, 0.3)).await.unwrap();
        let app = &result.applications[0];
        assert_eq!(app.job.id, "job_004");
        assert_eq!(app.application_status, ApplicationStatus::ReadyToApply);
        assert_eq!(app.recommended_action, "Consider - Moderate match");
        assert_eq!(app.match_details.matching_skills, vec!["aws", "docker", "kubernetes", "python"]);
        assert!(app.customized_resume.summary.contains("Python, Docker, Kubernetes, AWS"));
        assert!(app.cover_letter.contains("DevOps Engineer position at Cloud Systems Ltd"));
    }

    #[tokio::test]
    async fn test_top_matches() {
        let mut agent = make_agent();
        assert!(agent.get_top_matches(3).is_empty());
        agent.run_workflow(&params("", "", 8, 0.0)).await.unwrap();
        let top = agent.get_top_matches(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].job.id, "job_001");
        assert_eq!(top[1].job.id, "job_007");
    }

    #[tokio::test]
    async fn test_apply_to_job_receipt() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("python", "", 5, 0.3)).await.unwrap();
        let receipt = agent.apply_to_job(&result.applications[0]);
        assert_eq!(receipt.status, ApplicationStatus::Submitted);
        assert_eq!(receipt.job_id, result.applications[0].job.id);
        assert!(receipt.resume_customized);
        assert!(receipt.cover_letter_included);
        assert_eq!(receipt.application_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_batch_apply_threshold() {
        let mut agent = make_agent();
        let result = agent.run_workflow(&params("", "", 8, 0.0)).await.unwrap();
        let receipts = agent.batch_apply(&result.applications, 0.6);
        // job_001 (0.714) and job_007 (0.667)
        let ids: Vec<&str> = receipts.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["job_001", "job_007"]);
    }

    #[tokio::test]
    async fn test_history_and_clear() {
        let mut agent = make_agent();
        let first = agent.run_workflow(&params("python", "", 3, 0.3)).await.unwrap();
        let second = agent.run_workflow(&params("docker", "", 3, 0.3)).await.unwrap();
        assert_eq!(agent.workflow_history(), &[first, second.clone()]);
        assert_eq!(agent.last_result(), Some(&second));
        agent.clear_history();
        assert!(agent.workflow_history().is_empty());
    }

    #[tokio::test]
    async fn test_export_formats() {
        let mut agent = make_agent();
        assert_eq!(agent.export_results(ExportFormat::Json).unwrap(), "No results to export");

        agent.run_workflow(&params("python", "", 3, 0.3)).await.unwrap();
        let json = agent.export_results(ExportFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["applications"].is_array());
        assert!(parsed.get("message").is_none());

        let text = agent.export_results(ExportFormat::Text).unwrap();
        assert!(text.contains("JOB APPLICATION REPORT"));
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_application_status_serializes_as_label() {
        let json = serde_json::to_string(&ApplicationStatus::ReadyToApply).unwrap();
        assert_eq!(json, r#""Ready to Apply""#);
    }

    #[test]
    fn test_debug_reports_run_count() {
        let agent = make_agent();
        assert!(format!("{agent:?}").contains("workflows_run: 0"));
    }
}
