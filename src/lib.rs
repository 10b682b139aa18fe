//! Engine Twin - Turbofan degradation metrics and live engine digital twin
//!
//! This library loads run-to-failure sensor datasets, computes Remaining
//! Useful Life and degradation summaries over them, and serves those together
//! with a live engine telemetry feed over HTTP and WebSocket.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod degradation;
pub mod logging;
pub mod metrics;
pub mod telemetry;
