//! # HTTP API
//!
//! Routes exposed by the twin server.
//!
//! ## Endpoints
//!
//! - `GET /dataset-metrics` - Degradation summary of the configured dataset
//! - `POST /dataset-metrics/reload` - Re-read the dataset and swap the snapshot
//! - `GET /engine` - Latest engine reading
//! - `GET /engine/history` - Readings in the analytics window
//! - `GET /dashboard` - HTML dashboard (also served at `/`)
//! - `GET /ws/engine` - WebSocket for live readings and analytics
//! - `GET /health` - Liveness and dataset availability
//! - `GET /metrics` - Prometheus text exposition
//!
//! ## Example
//!
//! ```no_run
//! use engine_twin::api::{create_router, AppState};
//! use engine_twin::config::TwinConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = Arc::new(AppState::new(Arc::new(TwinConfig::default())));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Dataset failures never surface as HTTP errors: the metrics endpoints
//! always answer 200 with `{"available": false, "reason": ...}`.

mod dataset;
mod engine;
mod health;

pub use health::HealthResponse;

use crate::config::TwinConfig;
use crate::dataset::{DatasetSnapshot, DatasetStore};
use crate::telemetry::EngineTelemetry;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<TwinConfig>,
    pub dataset: Arc<DatasetStore>,
    pub telemetry: Arc<EngineTelemetry>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Prometheus handle for rendering `/metrics`
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Create state from configuration.
    ///
    /// With `dataset.load_on_startup` the dataset is read here, on the
    /// calling thread; otherwise on the first metrics request.
    pub fn new(config: Arc<TwinConfig>) -> Self {
        let source = config.dataset.path.clone();
        let dataset = if config.dataset.load_on_startup {
            DatasetStore::preloaded(source)
        } else {
            DatasetStore::new(source)
        };
        let telemetry = EngineTelemetry::new(config.telemetry.clone());

        Self::with_parts(config, Arc::new(dataset), Arc::new(telemetry))
    }

    /// Create state from already built components.
    pub fn with_parts(
        config: Arc<TwinConfig>,
        dataset: Arc<DatasetStore>,
        telemetry: Arc<EngineTelemetry>,
    ) -> Self {
        let metrics_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            // Already installed (tests build many states); use a detached handle
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        Self {
            config,
            dataset,
            telemetry,
            start_time: Instant::now(),
            metrics_handle,
        }
    }

    /// Current dataset snapshot; a lazy first load runs on the blocking pool.
    pub async fn dataset_snapshot(&self) -> Arc<DatasetSnapshot> {
        if let Some(snapshot) = self.dataset.peek() {
            return snapshot;
        }
        let store = Arc::clone(&self.dataset);
        match tokio::task::spawn_blocking(move || store.snapshot()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Dataset load task failed");
                Arc::new(DatasetSnapshot::load(None))
            }
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Create the main router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors_permissive = state.config.server.cors_permissive;

    let router = Router::new()
        .route("/dataset-metrics", get(dataset::metrics))
        .route("/dataset-metrics/reload", post(dataset::reload))
        .route("/engine", get(engine::latest))
        .route("/engine/history", get(engine::history))
        .route("/", get(crate::dashboard::dashboard_handler))
        .route("/dashboard", get(crate::dashboard::dashboard_handler))
        .route("/assets/*path", get(crate::dashboard::assets_handler))
        .route("/ws/engine", get(crate::dashboard::websocket_handler))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::logging::request_id))
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
