//! Axum route handlers for the run history API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::history::store::{RunQuery, RunRecord};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub deleted: usize,
}

/// GET /api/v1/history?q=&limit=&offset=
pub async fn handle_list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let query = RunQuery {
        search: params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty()),
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
    };
    Json(HistoryResponse {
        runs: state.history.list(&query),
    })
}

/// DELETE /api/v1/history/:id
pub async fn handle_delete_run(
    State(state): State<AppState>,
    Path(run_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if !state.history.delete(run_id) {
        return Err(AppError::NotFound(format!("Run {run_id} not found")));
    }
    info!(run_id, "history run deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Json<ClearHistoryResponse> {
    let deleted = state.history.clear();
    info!(deleted, "history cleared");
    Json(ClearHistoryResponse { deleted })
}
