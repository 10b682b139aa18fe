//! Configuration module
//!
//! Layered configuration loading from files, environment variables and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TWIN_*`, plus `DATASET_CSV` for the dataset path)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use engine_twin::config::TwinConfig;
//!
//! let toml = r#"
//! [dataset]
//! path = "data/train_FD001.txt"
//! "#;
//! let config: TwinConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 8000);
//! assert!(config.dataset.path.is_some());
//! ```

pub mod dataset;
pub mod error;
pub mod logging;
pub mod server;
pub mod telemetry;

pub use dataset::DatasetConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable the dataset path has always been read from.
pub const DATASET_ENV: &str = "DATASET_CSV";

/// Serializes tests that touch process-wide environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Unified configuration for the twin server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TwinConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Sensor dataset source
    pub dataset: DatasetConfig,
    /// Live engine telemetry
    pub telemetry: TelemetryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TwinConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored and the previous value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("TWIN_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("TWIN_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("TWIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TWIN_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        // TWIN_DATASET_PATH wins over the legacy name
        for var in [DATASET_ENV, "TWIN_DATASET_PATH"] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    self.dataset.path = Some(PathBuf::from(path));
                }
            }
        }

        if let Ok(simulate) = std::env::var("TWIN_SIMULATE") {
            self.telemetry.simulate = simulate.to_lowercase() == "true";
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "server.request_timeout_seconds".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        if self.telemetry.history_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "telemetry.history_capacity".to_string(),
                message: "history must keep at least one reading".to_string(),
            });
        }
        if self.telemetry.simulate_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "telemetry.simulate_interval_ms".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.dataset.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Validation {
                field: "dataset.path".to_string(),
                message: "path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twin_config_defaults() {
        let config = TwinConfig::default();
        assert_eq!(config.server.port, 8000);
        assert!(config.dataset.path.is_none());
        assert!(config.dataset.load_on_startup);
        assert_eq!(config.telemetry.history_capacity, 60);
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [server]
        port = 9000
        "#;

        let config: TwinConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_config_parse_example_file() {
        let toml = include_str!("../../twin.example.toml");
        let config: TwinConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[telemetry]\nsimulate = true").unwrap();

        let config = TwinConfig::load(Some(temp.path())).unwrap();
        assert!(config.telemetry.simulate);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = TwinConfig::load(Some(Path::new("/nonexistent/twin.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server\nport = ").unwrap();

        let result = TwinConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = TwinConfig::load(None).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_env_override_port_and_invalid_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("TWIN_PORT", "9999");
        let config = TwinConfig::default().with_env_overrides();
        assert_eq!(config.server.port, 9999);

        std::env::set_var("TWIN_PORT", "not-a-number");
        let config = TwinConfig::default().with_env_overrides();
        std::env::remove_var("TWIN_PORT");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_env_dataset_path() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var(DATASET_ENV, "/data/PM_train.txt");
        let config = TwinConfig::default().with_env_overrides();
        assert_eq!(
            config.dataset.path,
            Some(PathBuf::from("/data/PM_train.txt"))
        );

        std::env::set_var("TWIN_DATASET_PATH", "/data/train_FD002.txt");
        let config = TwinConfig::default().with_env_overrides();
        std::env::remove_var("TWIN_DATASET_PATH");
        std::env::remove_var(DATASET_ENV);
        assert_eq!(
            config.dataset.path,
            Some(PathBuf::from("/data/train_FD002.txt"))
        );
    }

    #[test]
    fn test_config_env_override_log_format() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("TWIN_LOG_FORMAT", "json");
        let config = TwinConfig::default().with_env_overrides();
        assert_eq!(config.logging.format, LogFormat::Json);

        std::env::set_var("TWIN_LOG_FORMAT", "xml");
        let config = TwinConfig::default().with_env_overrides();
        std::env::remove_var("TWIN_LOG_FORMAT");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = TwinConfig::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_config_validation_zero_history() {
        let mut config = TwinConfig::default();
        config.telemetry.history_capacity = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "telemetry.history_capacity"
        ));
    }

    #[test]
    fn test_config_validation_empty_dataset_path() {
        let mut config = TwinConfig::default();
        config.dataset.path = Some(PathBuf::new());

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "dataset.path"
        ));
    }
}
