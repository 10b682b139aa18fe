//! Bounded engine reading history
//!
//! Keeps the most recent readings for windowed analytics; the oldest entry is
//! evicted once capacity is reached.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EngineReading;

/// A reading together with the time it was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub reading: EngineReading,
}

/// Aggregates over the current history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub samples: usize,
    pub avg_temp: f64,
    pub max_energy: f64,
}

/// Ring buffer of the last `capacity` readings, oldest first.
#[derive(Debug, Clone)]
pub struct EngineHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl EngineHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, reading: EngineReading) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            timestamp: Utc::now(),
            reading,
        });
    }

    /// Entries in chronological order (oldest first)
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Window aggregates; all zero when empty.
    pub fn stats(&self) -> WindowStats {
        if self.entries.is_empty() {
            return WindowStats {
                samples: 0,
                avg_temp: 0.0,
                max_energy: 0.0,
            };
        }

        let n = self.entries.len();
        let temp_sum: f64 = self.entries.iter().map(|e| e.reading.temp).sum();
        let max_energy = self
            .entries
            .iter()
            .map(|e| e.reading.energy)
            .fold(f64::NEG_INFINITY, f64::max);

        WindowStats {
            samples: n,
            avg_temp: temp_sum / n as f64,
            max_energy,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
