//! Dataset metrics endpoints.

use crate::api::AppState;
use crate::dataset::store::MetricsReport;
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /dataset-metrics - Summary of the current snapshot.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsReport> {
    Json(state.dataset_snapshot().await.report())
}

/// POST /dataset-metrics/reload - Re-read the dataset file.
pub async fn reload(State(state): State<Arc<AppState>>) -> Json<MetricsReport> {
    let store = Arc::clone(&state.dataset);
    let snapshot = match tokio::task::spawn_blocking(move || store.reload()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Dataset reload task failed");
            state.dataset_snapshot().await
        }
    };
    Json(snapshot.report())
}
