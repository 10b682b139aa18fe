//! Live engine telemetry for the digital twin.
//!
//! Readings arrive from WebSocket clients or from the [`Simulator`]; each one
//! replaces the current engine state, is appended to the bounded history and
//! fans out to every subscriber as an [`EngineAnalytics`] frame.

pub mod history;
pub mod simulator;

pub use history::{EngineHistory, HistoryEntry, WindowStats};
pub use simulator::Simulator;

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::TelemetryConfig;

/// Capacity of the analytics broadcast channel.
const BROADCAST_CAPACITY: usize = 100;

/// One engine sample as sent by the 3D model or the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineReading {
    pub energy: f64,
    pub temp: f64,
}

/// Current state plus derived overheat prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineAnalytics {
    pub energy: f64,
    pub temp: f64,
    pub avg_temp: f64,
    pub predicted_overheat: f64,
    pub alert: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("reading must contain finite 'energy' and 'temp' values")]
    NonFinite,

    #[error("malformed reading: {0}")]
    Malformed(String),
}

struct EngineState {
    latest: EngineReading,
    history: EngineHistory,
}

/// Shared engine state, history and update fan-out.
pub struct EngineTelemetry {
    config: TelemetryConfig,
    state: RwLock<EngineState>,
    updates: broadcast::Sender<EngineAnalytics>,
}

impl EngineTelemetry {
    pub fn new(config: TelemetryConfig) -> Self {
        let (updates, _) = broadcast::channel(BROADCAST_CAPACITY);
        let state = EngineState {
            latest: EngineReading {
                energy: config.initial_energy,
                temp: config.initial_temp,
            },
            history: EngineHistory::new(config.history_capacity),
        };

        Self {
            config,
            state: RwLock::new(state),
            updates,
        }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Parse a client frame into a reading.
    pub fn parse_reading(text: &str) -> Result<EngineReading, TelemetryError> {
        serde_json::from_str(text).map_err(|e| TelemetryError::Malformed(e.to_string()))
    }

    /// Accept a reading, returning the analytics it produced.
    pub fn record(&self, reading: EngineReading) -> Result<EngineAnalytics, TelemetryError> {
        if !reading.energy.is_finite() || !reading.temp.is_finite() {
            return Err(TelemetryError::NonFinite);
        }

        let analytics = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            state.latest = reading;
            state.history.push(reading);
            self.analytics_for(&state)
        };

        metrics::counter!("twin_engine_readings_total").increment(1);
        if analytics.alert {
            tracing::warn!(
                temp = analytics.temp,
                predicted_overheat = analytics.predicted_overheat,
                "Predicted overheat"
            );
        }

        // no subscribers is fine
        let _ = self.updates.send(analytics);
        Ok(analytics)
    }

    pub fn latest(&self) -> EngineReading {
        self.state.read().unwrap_or_else(|e| e.into_inner()).latest
    }

    pub fn analytics(&self) -> EngineAnalytics {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        self.analytics_for(&state)
    }

    pub fn window(&self) -> WindowStats {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .history
            .stats()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .history
            .entries()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineAnalytics> {
        self.updates.subscribe()
    }

    fn analytics_for(&self, state: &EngineState) -> EngineAnalytics {
        let EngineReading { energy, temp } = state.latest;
        let avg_temp = if state.history.is_empty() {
            temp
        } else {
            state.history.stats().avg_temp
        };
        let predicted_overheat = temp + self.config.overheat_margin;

        EngineAnalytics {
            energy,
            temp,
            avg_temp,
            predicted_overheat,
            alert: predicted_overheat > self.config.overheat_threshold,
        }
    }
}
