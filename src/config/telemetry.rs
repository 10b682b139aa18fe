//! Engine telemetry configuration

use serde::{Deserialize, Serialize};

/// Live engine state, analytics thresholds and the synthetic feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Readings kept for windowed analytics
    pub history_capacity: usize,
    pub initial_energy: f64,
    pub initial_temp: f64,
    /// Added to the current temperature to predict the near-term peak
    pub overheat_margin: f64,
    /// Predicted temperatures above this raise an alert
    pub overheat_threshold: f64,
    /// Generate synthetic readings when no client is feeding the twin
    pub simulate: bool,
    pub simulate_interval_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: 60,
            initial_energy: 500.0,
            initial_temp: 300.0,
            overheat_margin: 50.0,
            overheat_threshold: 550.0,
            simulate: false,
            simulate_interval_ms: 1000,
        }
    }
}
