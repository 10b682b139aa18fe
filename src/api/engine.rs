//! Engine state endpoints.

use crate::api::AppState;
use crate::telemetry::{EngineReading, HistoryEntry};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /engine - Latest engine reading.
pub async fn latest(State(state): State<Arc<AppState>>) -> Json<EngineReading> {
    Json(state.telemetry.latest())
}

/// GET /engine/history - Readings in the analytics window, oldest first.
pub async fn history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    Json(state.telemetry.history())
}
