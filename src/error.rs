//! Ошибки библиотеки

use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing model/metric files: {}", .missing_files.join(", "))]
    MissingArtifacts {
        missing_files: Vec<String>,
        searched_dirs: Vec<PathBuf>,
    },

    #[error("Could not find weather_dataset.csv in expected locations: {}", display_paths(.candidates))]
    DatasetNotFound { candidates: Vec<PathBuf> },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {column} is not numeric (row {row})")]
    NonNumeric { column: String, row: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream responded with status {0}")]
    UpstreamStatus(u16),
}

impl WeatherError {
    /// JSON-представление ошибки для вывода в stdout вызывающему процессу
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            WeatherError::MissingArtifacts {
                missing_files,
                searched_dirs,
            } => json!({
                "error": "Missing model/metric files",
                "missing_files": missing_files,
                "searched_dirs": searched_dirs,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
