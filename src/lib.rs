//! Weather ML - прогноз температуры и классификация дождя/облачности

pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod predict;
pub mod preprocessing;
pub mod server;
pub mod stats;
pub mod types;
pub mod weather_api;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use models::*;
pub use types::*;

// Re-export для удобства
pub use predict::{classify_weather, predict_temperature};
pub use stats::get_dataset_stats;
