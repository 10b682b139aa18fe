//! Axum handler for the metrics endpoint.

use crate::api::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Handler for GET /metrics (Prometheus text format).
///
/// Always 200 with the scraper content type, even before anything has been
/// recorded.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if let Some(snapshot) = state.dataset.peek() {
        metrics::gauge!("twin_dataset_available")
            .set(if snapshot.is_available() { 1.0 } else { 0.0 });
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics_handle.render(),
    )
}
