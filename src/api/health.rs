//! Health check endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the dataset is available, `degraded` otherwise
    pub status: String,
    pub uptime_seconds: u64,
    /// `None` until the first (lazy) dataset load
    pub dataset_available: Option<bool>,
}

/// GET /health - Return service health.
///
/// Never triggers a dataset load.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset_available = state.dataset.peek().map(|s| s.is_available());

    let status = match dataset_available {
        Some(false) => "degraded",
        _ => "ok",
    };

    Json(HealthResponse {
        status: status.to_string(),
        uptime_seconds: state.uptime_seconds(),
        dataset_available,
    })
}
