//! # Metrics
//!
//! Prometheus export of service metrics at `GET /metrics`.
//!
//! **Counters:**
//! - `twin_dataset_loads_total{outcome}` - Dataset load attempts by outcome
//!   (`ok`, `not_found`, `format`, `empty_table`, ...)
//! - `twin_engine_readings_total` - Engine readings accepted
//!
//! **Histograms:**
//! - `twin_dataset_load_duration_seconds` - Load + summary time
//!
//! **Gauges:**
//! - `twin_ws_clients` - Connected WebSocket clients
//! - `twin_dataset_available` - 1 when the current snapshot has a summary

pub mod handler;

pub use handler::metrics_handler;

// Re-export PrometheusBuilder for detached handles in tests
pub use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the global Prometheus recorder.
///
/// Load-duration buckets are sized for files from a few KB up to the full
/// CMAPSS set. Fails if a recorder is already installed.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let load_buckets = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("twin_dataset_load_duration_seconds".to_string()),
            load_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
