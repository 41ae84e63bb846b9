//! Plain-text rendering of a workflow run.

use std::fmt;

use crate::agent::workflow::WorkflowResult;

const REPORT_TOP_N: usize = 5;

/// Displays a run as the plain-text report.
pub struct TextReport<'a>(pub &'a WorkflowResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "JOB APPLICATION REPORT")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "--------")?;
        writeln!(f, "Total Jobs Found: {}", result.total_jobs_found)?;
        writeln!(f, "Relevant Jobs: {}", result.relevant_jobs)?;
        writeln!(f, "Pass Rate: {:.1}%", result.pass_rate * 100.0)?;
        writeln!(f, "Average Relevance: {:.3}", result.avg_relevance_score)?;
        writeln!(f)?;
        writeln!(f, "Top Applications:")?;
        writeln!(f, "-----------------")?;

        for (i, app) in result.applications.iter().take(REPORT_TOP_N).enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {} @ {}", i + 1, app.job.title, app.job.company)?;
            writeln!(f, "   Relevance: {:.2}%", app.relevance_score * 100.0)?;
            writeln!(f, "   Match: {}", app.match_details.match_percentage)?;
            writeln!(f, "   Recommendation: {}", app.recommended_action)?;
        }
        Ok(())
    }
}

pub fn format_text_report(result: &WorkflowResult) -> String {
    TextReport(result).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::workflow::{ApplicationAgent, WorkflowParams};
    use crate::catalog::search::JobCatalog;
    use crate::matching::relevance::SkillOverlapScorer;
    use crate::resume::customizer::ResumeCustomizer;
    use std::sync::Arc;

    async fn run_with(min_relevance: f64) -> WorkflowResult {
        let mut agent = ApplicationAgent::new(
            JobCatalog::with_sample_jobs(),
            ResumeCustomizer::default(),
            Arc::new(SkillOverlapScorer),
        );
        agent
            .run_workflow(&WorkflowParams {
                keywords: String::new(),
                location: String::new(),
                num_jobs: 8,
                min_relevance,
            })
            .await
            .unwrap()
    }

    async fn full_run() -> WorkflowResult {
        run_with(0.0).await
    }

    #[tokio::test]
    async fn test_report_header_and_summary() {
        let report = format_text_report(&full_run().await);
        assert!(report.starts_with("JOB APPLICATION REPORT"));
        assert!(report.contains("Total Jobs Found: 8"));
        assert!(report.contains("Relevant Jobs: 8"));
        assert!(report.contains("Pass Rate: 100.0%"));
    }

    #[tokio::test]
    async fn test_report_lists_top_five_only() {
        let report = format_text_report(&full_run().await);
        assert!(report.contains("1. Senior Python Developer @ Tech Giants Inc"));
        assert!(report.contains("   Relevance: 71.43%"));
        assert!(report.contains("   Match: 71.4%"));
        assert!(report.contains("5. "));
        assert!(!report.contains("6. "));
    }

    #[tokio::test]
    async fn test_report_without_relevant_jobs_ends_at_header() {
        let result = run_with(1.0).await;
        let report = format_text_report(&result);
        assert!(report.contains("Relevant Jobs: 0"));
        assert!(report.ends_with("Top Applications:\n-----------------\n"));
    }
}
