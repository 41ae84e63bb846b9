use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and catalog size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let agent = state.agent.read().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobagent",
        "jobs": agent.catalog().job_count(),
        "workflows_run": agent.workflow_history().len(),
        "scorer": agent.scorer().backend()
    }))
}
