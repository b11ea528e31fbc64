//! Хранение и поиск артефактов обученных моделей

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::models::linear::TemperatureModel;
use crate::models::logistic::WeatherClassifier;
use crate::models::metrics::{ClassificationMetrics, ConfusionCounts, RegressionMetrics};

pub const LINEAR_MODEL_FILE: &str = "linear_regression_model.json";
pub const LINEAR_METRICS_FILE: &str = "linear_regression_metrics.json";
pub const RAIN_MODEL_FILE: &str = "logistic_rain_model.json";
pub const CLOUD_MODEL_FILE: &str = "logistic_cloud_model.json";
pub const LOGISTIC_METRICS_FILE: &str = "logistic_metrics.json";
pub const LOGISTIC_CONFUSION_FILE: &str = "logistic_confusion.json";

pub const ARTIFACT_FILES: [&str; 6] = [
    LINEAR_MODEL_FILE,
    LINEAR_METRICS_FILE,
    RAIN_MODEL_FILE,
    CLOUD_MODEL_FILE,
    LOGISTIC_METRICS_FILE,
    LOGISTIC_CONFUSION_FILE,
];

/// Все модели и метрики, необходимые для предсказаний
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub linear: TemperatureModel,
    pub linear_metrics: RegressionMetrics,
    pub rain: WeatherClassifier,
    pub cloud: WeatherClassifier,
    pub logistic_metrics: ClassificationMetrics,
    pub logistic_confusion: ConfusionCounts,
}

pub struct ModelStore {
    search_dirs: Vec<PathBuf>,
}

impl ModelStore {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.model_search_dirs())
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Первый каталог, содержащий файл
    pub fn find(&self, file_name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|path| path.is_file())
    }

    /// Каждый файл ищется независимо; при отсутствии хотя бы одного
    /// возвращается список всех недостающих
    pub fn load(&self) -> Result<ModelBundle> {
        let mut found = Vec::with_capacity(ARTIFACT_FILES.len());
        let mut missing = Vec::new();
        for name in ARTIFACT_FILES {
            match self.find(name) {
                Some(path) => found.push(path),
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            tracing::warn!("Missing files: {}", missing.join(", "));
            tracing::debug!("Searched dirs: {:?}", self.search_dirs);
            return Err(WeatherError::MissingArtifacts {
                missing_files: missing,
                searched_dirs: self.search_dirs.clone(),
            });
        }

        let bundle = ModelBundle {
            linear: read_json(&found[0])?,
            linear_metrics: read_json(&found[1])?,
            rain: read_json(&found[2])?,
            cloud: read_json(&found[3])?,
            logistic_metrics: read_json(&found[4])?,
            logistic_confusion: read_json(&found[5])?,
        };

        let dirs: BTreeSet<String> = found
            .iter()
            .filter_map(|p| p.parent())
            .map(|d| d.display().to_string())
            .collect();
        tracing::debug!(
            "Loaded models from: {}",
            dirs.into_iter().collect::<Vec<_>>().join(", ")
        );

        Ok(bundle)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| {
        tracing::error!(path = %path.display(), "Error loading a model/metric: {}", e);
        WeatherError::Json(e)
    })
}

/// Сохраняет значение в `<dir>/<file_name>`, создавая каталог при необходимости
pub fn save_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), "Artifact saved");
    Ok(path)
}
