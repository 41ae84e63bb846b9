use axum::{extract::State, Json};

use crate::lm::info::ModelInfo;
use crate::state::AppState;

/// GET /api/v1/model
pub async fn handle_model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.model_info.as_ref().clone())
}
