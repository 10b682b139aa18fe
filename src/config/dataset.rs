//! Dataset source configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the sensor table comes from and when it is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the `.txt` / `.csv` / `.xlsx` sensor file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Load at process start instead of on the first metrics request
    pub load_on_startup: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            load_on_startup: true,
        }
    }
}
