pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::handlers as workflow;
use crate::catalog::handlers as jobs;
use crate::lm::handlers as model;
use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::text::handlers as text;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handle_list_jobs).post(jobs::handle_create_job))
        .route("/api/v1/jobs/classify", post(matching::handle_classify))
        .route("/api/v1/jobs/rank", post(matching::handle_rank))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        // Resume API
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).patch(resume::handle_update_resume),
        )
        .route("/api/v1/resumes/customize", post(resume::handle_customize))
        // Workflow API
        .route("/api/v1/workflow/run", post(workflow::handle_run_workflow))
        .route("/api/v1/workflow/top", get(workflow::handle_top_matches))
        .route(
            "/api/v1/workflow/history",
            get(workflow::handle_history).delete(workflow::handle_clear_history),
        )
        .route("/api/v1/workflow/export", get(workflow::handle_export))
        .route("/api/v1/workflow/apply", post(workflow::handle_apply))
        // Text utilities
        .route("/api/v1/text/analyze", post(text::handle_analyze))
        .route("/api/v1/text/similarity", post(text::handle_similarity))
        .route("/api/v1/text/match-score", post(text::handle_match_score))
        // Model description
        .route("/api/v1/model", get(model::handle_model_info))
        .with_state(state)
}
