//! Process-wide dataset snapshot.
//!
//! The store hands out `Arc<DatasetSnapshot>` clones. A reload builds the new
//! snapshot without holding the lock and then swaps the `Arc`, so a reader
//! either sees the old snapshot or the new one, never a partial table.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{load_table, DatasetError, SensorTable};
use crate::degradation::{compute_summary, MetricsSummary};

/// Outcome of one load attempt.
#[derive(Debug, Clone)]
pub enum DatasetStatus {
    Ready {
        table: Arc<SensorTable>,
        summary: MetricsSummary,
    },
    Unavailable {
        kind: &'static str,
        reason: String,
    },
}

/// Immutable result of loading the configured dataset once.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub source: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
    pub status: DatasetStatus,
}

/// JSON body of the dataset metrics endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricsReport {
    Available {
        available: bool,
        summary: MetricsSummary,
    },
    Unavailable {
        available: bool,
        reason: String,
    },
}

impl DatasetSnapshot {
    /// Load and summarize `source`, capturing any failure as a reason.
    pub fn load(source: Option<&Path>) -> Self {
        let start = Instant::now();
        let status = match Self::try_load(source) {
            Ok((table, summary)) => {
                tracing::info!(
                    rows = summary.rows,
                    units = summary.units,
                    num_sensors = summary.num_sensors,
                    "Dataset loaded"
                );
                metrics::counter!("twin_dataset_loads_total", "outcome" => "ok").increment(1);
                DatasetStatus::Ready {
                    table: Arc::new(table),
                    summary,
                }
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "Dataset unavailable");
                metrics::counter!("twin_dataset_loads_total", "outcome" => err.kind())
                    .increment(1);
                DatasetStatus::Unavailable {
                    kind: err.kind(),
                    reason: err.to_string(),
                }
            }
        };
        metrics::histogram!("twin_dataset_load_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        Self {
            source: source.map(Path::to_path_buf),
            loaded_at: Utc::now(),
            status,
        }
    }

    fn try_load(source: Option<&Path>) -> Result<(SensorTable, MetricsSummary), DatasetError> {
        let path = source.ok_or(DatasetError::ConfigMissing)?;
        let table = load_table(path)?;
        let summary = compute_summary(&table)?;
        Ok((table, summary))
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, DatasetStatus::Ready { .. })
    }

    pub fn summary(&self) -> Option<&MetricsSummary> {
        match &self.status {
            DatasetStatus::Ready { summary, .. } => Some(summary),
            DatasetStatus::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            DatasetStatus::Ready { .. } => None,
            DatasetStatus::Unavailable { reason, .. } => Some(reason),
        }
    }

    pub fn table(&self) -> Option<&Arc<SensorTable>> {
        match &self.status {
            DatasetStatus::Ready { table, .. } => Some(table),
            DatasetStatus::Unavailable { .. } => None,
        }
    }

    pub fn report(&self) -> MetricsReport {
        match &self.status {
            DatasetStatus::Ready { summary, .. } => MetricsReport::Available {
                available: true,
                summary: summary.clone(),
            },
            DatasetStatus::Unavailable { reason, .. } => MetricsReport::Unavailable {
                available: false,
                reason: reason.clone(),
            },
        }
    }
}

/// Owner of the current dataset snapshot.
pub struct DatasetStore {
    source: Option<PathBuf>,
    current: RwLock<Option<Arc<DatasetSnapshot>>>,
}

impl DatasetStore {
    /// Create a store that loads lazily on first access.
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Create a store and load the dataset immediately.
    pub fn preloaded(source: Option<PathBuf>) -> Self {
        let snapshot = DatasetSnapshot::load(source.as_deref());
        Self {
            source,
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Current snapshot, loading it first if nothing has been loaded yet.
    pub fn snapshot(&self) -> Arc<DatasetSnapshot> {
        if let Some(current) = self.read_current() {
            return current;
        }

        let loaded = Arc::new(DatasetSnapshot::load(self.source()));
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        // another request may have won the race
        Arc::clone(guard.get_or_insert(loaded))
    }

    /// Re-read the dataset and install the result as the current snapshot.
    pub fn reload(&self) -> Arc<DatasetSnapshot> {
        tracing::info!(source = ?self.source, "Reloading dataset");
        let loaded = Arc::new(DatasetSnapshot::load(self.source()));
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::clone(&loaded));
        loaded
    }

    /// Snapshot if one has been loaded, without triggering a load.
    pub fn peek(&self) -> Option<Arc<DatasetSnapshot>> {
        self.read_current()
    }

    fn read_current(&self) -> Option<Arc<DatasetSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }
}
