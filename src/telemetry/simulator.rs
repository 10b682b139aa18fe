//! Synthetic engine feed.
//!
//! Produces a deterministic reading per tick: temperature drifts upward over
//! a 400-tick cycle with a small oscillation on top, energy oscillates around
//! its initial value. Readings go through [`EngineTelemetry::record`] like any
//! client reading.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{EngineReading, EngineTelemetry};
use crate::config::TelemetryConfig;

const DRIFT_PERIOD: u64 = 400;
const DRIFT_PER_TICK: f64 = 0.5;
const TEMP_SWING: f64 = 15.0;
const ENERGY_SWING: f64 = 40.0;

/// Background task feeding synthetic readings into the twin.
pub struct Simulator {
    telemetry: Arc<EngineTelemetry>,
    interval: Duration,
}

impl Simulator {
    pub fn new(telemetry: Arc<EngineTelemetry>) -> Self {
        let interval = Duration::from_millis(telemetry.config().simulate_interval_ms.max(1));
        Self {
            telemetry,
            interval,
        }
    }

    /// Reading for `tick`, derived from the configured initial state.
    pub fn reading_at(config: &TelemetryConfig, tick: u64) -> EngineReading {
        let t = tick as f64;
        let drift = (tick % DRIFT_PERIOD) as f64 * DRIFT_PER_TICK;

        EngineReading {
            energy: config.initial_energy + ENERGY_SWING * (t / 10.0).sin(),
            temp: config.initial_temp + drift + TEMP_SWING * (t / 5.0).sin(),
        }
    }

    /// Start the feed; stops when `cancel_token` is cancelled.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_ms = self.interval.as_millis() as u64,
                "Engine simulator started"
            );

            let mut tick = 0u64;
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!(ticks = tick, "Engine simulator shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let reading = Self::reading_at(self.telemetry.config(), tick);
                        if let Err(e) = self.telemetry.record(reading) {
                            tracing::debug!(error = %e, "Simulator reading rejected");
                        }
                        tick = tick.wrapping_add(1);
                    }
                }
            }
        })
    }
}
