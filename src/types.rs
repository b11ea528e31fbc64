/// Типы данных для ML модуля

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};
use crate::models::{ClassificationMetrics, ConfusionCounts, RegressionMetrics};

const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
const PRESSURE_RANGE: RangeInclusive<f64> = 900.0..=1100.0;
const WIND_SPEED_RANGE: RangeInclusive<f64> = 0.0..=50.0;
const CLOUDS_RANGE: RangeInclusive<f64> = 0.0..=100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearRegressionInput {
    pub humidity: f64,   // %
    pub pressure: f64,   // гПа
    pub wind_speed: f64, // м/с
    pub clouds: f64,     // %
}

impl LinearRegressionInput {
    pub fn validate(&self) -> Result<()> {
        check("humidity", self.humidity, &HUMIDITY_RANGE)?;
        check("pressure", self.pressure, &PRESSURE_RANGE)?;
        check("wind_speed", self.wind_speed, &WIND_SPEED_RANGE)?;
        check("clouds", self.clouds, &CLOUDS_RANGE)
    }

    pub fn to_features(&self) -> [f64; 4] {
        [self.humidity, self.pressure, self.wind_speed, self.clouds]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogisticRegressionInput {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
}

impl LogisticRegressionInput {
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() {
            return Err(WeatherError::InvalidInput(
                "temperature must be a finite number".to_string(),
            ));
        }
        check("humidity", self.humidity, &HUMIDITY_RANGE)?;
        check("pressure", self.pressure, &PRESSURE_RANGE)?;
        check("wind_speed", self.wind_speed, &WIND_SPEED_RANGE)?;
        check("clouds", self.clouds, &CLOUDS_RANGE)
    }

    pub fn to_features(&self) -> [f64; 5] {
        [
            self.temperature,
            self.humidity,
            self.pressure,
            self.wind_speed,
            self.clouds,
        ]
    }
}

fn check(name: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(WeatherError::InvalidInput(format!(
            "{} must be within {}..={}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperaturePrediction {
    pub predicted_temperature: f64,
    pub metrics: RegressionMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherClassification {
    pub rain_prediction: String,       // "Rain" | "No Rain"
    pub rain_probability: f64,
    pub cloudiness_prediction: String, // "Cloudy" | "Clear"
    pub cloudiness_probability: f64,
    pub metrics: ClassificationMetrics,
    pub confusion_matrix: ConfusionCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    pub mean: f64,
    pub median: f64,
    /// Выборочное стандартное отклонение; не определено для одного значения
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub features: Vec<String>,
    /// Числовые столбцы в порядке заголовков CSV
    pub statistics: serde_json::Map<String, serde_json::Value>,
    pub sample_data: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl DatasetStats {
    pub fn feature(&self, name: &str) -> Option<FeatureStatistics> {
        let value = self.statistics.get(name)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Текущая погода (ответ прокси OpenWeather)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherData {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub description: String,
    pub icon: String,
    pub city: String,
    pub country: String,
    pub dt: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub description: String,
    pub icon: String,
    pub pop: f64, // вероятность осадков
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastData {
    pub city: String,
    pub country: String,
    pub list: Vec<ForecastItem>,
}
