//! Конфигурация и поиск путей к моделям и датасету

use std::path::{Component, Path, PathBuf};

pub const DATASET_FILE: &str = "weather_dataset.csv";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Настройки приложения, собранные из окружения и флагов CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Каталог, относительно которого ищутся `models/` и `data/`
    pub base_dir: PathBuf,
    /// Явно заданный каталог моделей (`WEATHER_MODEL_DIR`)
    pub model_dir: Option<PathBuf>,
    /// Явно заданный путь к CSV (`WEATHER_DATA_PATH`)
    pub data_path: Option<PathBuf>,
    pub openweather_api_key: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            model_dir: None,
            data_path: None,
            openweather_api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WEATHER_BASE_DIR`: anchor for default model/data locations (default: working directory)
    /// - `WEATHER_MODEL_DIR`: directory with trained model artifacts
    /// - `WEATHER_DATA_PATH`: path to the training CSV
    /// - `OPENWEATHER_API_KEY`: key for the weather proxy endpoints
    /// - `HOST`, `PORT`: listen address for `serve` (default `127.0.0.1:5000`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_dir = std::env::var_os("WEATHER_BASE_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "PORT is not a valid port number, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            base_dir,
            model_dir: std::env::var_os("WEATHER_MODEL_DIR").map(PathBuf::from),
            data_path: std::env::var_os("WEATHER_DATA_PATH").map(PathBuf::from),
            openweather_api_key: std::env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
        }
    }

    /// Каталоги, в которых ищутся артефакты моделей, в порядке приоритета
    pub fn model_search_dirs(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = &self.model_dir {
            candidates.push(absolutize(&self.base_dir, dir));
        }
        candidates.push(self.base_dir.join("models"));
        candidates.push(self.base_dir.join("..").join("models"));
        candidates.push(self.base_dir.clone());
        dedup(candidates)
    }

    /// Каталог, куда обучение сохраняет артефакты
    pub fn model_output_dir(&self) -> PathBuf {
        match &self.model_dir {
            Some(dir) => normalize(&absolutize(&self.base_dir, dir)),
            None => normalize(&self.base_dir.join("models")),
        }
    }

    /// Возможные расположения датасета, в порядке приоритета
    pub fn dataset_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.data_path {
            candidates.push(absolutize(&self.base_dir, path));
        }
        candidates.push(self.base_dir.join("..").join("data").join(DATASET_FILE));
        candidates.push(self.base_dir.join("data").join(DATASET_FILE));
        candidates.push(
            self.base_dir
                .join("..")
                .join("..")
                .join("data")
                .join(DATASET_FILE),
        );
        dedup(candidates)
    }

    /// Первый существующий путь к датасету
    pub fn resolve_dataset(&self) -> crate::Result<PathBuf> {
        let candidates = self.dataset_candidates();
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(crate::WeatherError::DatasetNotFound { candidates }),
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Абсолютный путь без `.` и `..`; файловую систему не трогает
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // выше корня подняться нельзя
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Нормализует пути и убирает повторы, сохраняя порядок
fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for path in paths {
        let path = normalize(&path);
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}
