//! Dataset error types

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a dataset cannot produce a summary.
///
/// Every variant is recovered at the HTTP boundary and rendered through its
/// `Display` impl as the `reason` of an unavailable response.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset path not configured (set DATASET_CSV or dataset.path)")]
    ConfigMissing,

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid dataset format at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("dataset contains no rows")]
    EmptyTable,

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

impl DatasetError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Short, stable label used for metric tags and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetError::ConfigMissing => "config_missing",
            DatasetError::NotFound(_) => "not_found",
            DatasetError::Format { .. } => "format",
            DatasetError::EmptyTable => "empty_table",
            DatasetError::Io(_) => "io",
            DatasetError::Spreadsheet(_) => "spreadsheet",
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DatasetError::Io(io),
            other => DatasetError::format(line, format!("{:?}", other)),
        }
    }
}

impl From<calamine::Error> for DatasetError {
    fn from(err: calamine::Error) -> Self {
        DatasetError::Spreadsheet(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_reason_mentions_file_not_found() {
        let err = DatasetError::NotFound(PathBuf::from("/data/train_FD001.txt"));
        assert_eq!(
            err.to_string(),
            "file not found: /data/train_FD001.txt"
        );
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_format_error_names_line() {
        let err = DatasetError::format(7, "expected 26 columns, found 25");
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("expected 26 columns"));
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            DatasetError::ConfigMissing.kind(),
            DatasetError::NotFound(PathBuf::new()).kind(),
            DatasetError::format(1, "x").kind(),
            DatasetError::EmptyTable.kind(),
            DatasetError::Spreadsheet("x".into()).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }
}
