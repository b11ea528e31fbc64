//! Линейная регрессия для прогноза температуры

#![allow(non_snake_case)]

use chrono::{DateTime, Utc};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dataset::{WeatherTable, TEMPERATURE_FEATURES, TEMPERATURE_TARGET};
use crate::error::{Result, WeatherError};
use crate::models::metrics::RegressionMetrics;
use crate::models::store::{self, LINEAR_METRICS_FILE, LINEAR_MODEL_FILE};
use crate::preprocessing::split::{train_test_split, DEFAULT_SEED, DEFAULT_TEST_SIZE};

/// Обученная модель: коэффициенты OLS и свободный член
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureModel {
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub trained_at: DateTime<Utc>,
}

impl TemperatureModel {
    pub fn fit(X: &Array2<f64>, y: &Array1<f64>, features: &[&str]) -> Result<Self> {
        if X.nrows() == 0 {
            return Err(WeatherError::Training("Empty dataset".to_string()));
        }
        if X.ncols() != features.len() {
            return Err(WeatherError::Training(format!(
                "feature names ({}) do not match matrix width ({})",
                features.len(),
                X.ncols()
            )));
        }

        let dataset = Dataset::new(X.clone(), y.clone());
        let fitted = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| WeatherError::Training(e.to_string()))?;

        Ok(Self {
            features: features.iter().map(|f| f.to_string()).collect(),
            coefficients: fitted.params().to_vec(),
            intercept: fitted.intercept(),
            trained_at: Utc::now(),
        })
    }

    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(X.ncols())?;
        let weights = ArrayView1::from(&self.coefficients[..]);
        Ok(X.dot(&weights) + self.intercept)
    }

    pub fn predict_one(&self, x: &[f64]) -> Result<f64> {
        self.check_width(x.len())?;
        let dot: f64 = x.iter().zip(&self.coefficients).map(|(a, w)| a * w).sum();
        Ok(dot + self.intercept)
    }

    fn check_width(&self, n: usize) -> Result<()> {
        if n != self.coefficients.len() {
            return Err(WeatherError::InvalidInput(format!(
                "temperature model expects {} features ({}), got {}",
                self.coefficients.len(),
                self.features.join(", "),
                n
            )));
        }
        Ok(())
    }
}

/// Обучение на таблице: разбиение 80/20 и оценка на тестовой части
pub fn fit_temperature_model(table: &WeatherTable) -> Result<(TemperatureModel, RegressionMetrics)> {
    let X = table.features(&TEMPERATURE_FEATURES)?;
    let y = table.target(TEMPERATURE_TARGET)?;

    let split = train_test_split(X.nrows(), DEFAULT_TEST_SIZE, DEFAULT_SEED)?;
    let (X_train, X_test) = split.records(&X);
    let (y_train, y_test) = split.targets(&y);

    let model = TemperatureModel::fit(&X_train, &y_train, &TEMPERATURE_FEATURES)?;
    let y_pred = model.predict(&X_test)?;
    let metrics = RegressionMetrics::evaluate(&y_test, &y_pred);

    Ok((model, metrics))
}

/// Загружает датасет, обучает модель температуры и сохраняет артефакты
pub fn train_linear_regression(config: &Config) -> Result<RegressionMetrics> {
    let data_path = config.resolve_dataset()?;
    let table = WeatherTable::from_path(&data_path)?;

    let (model, metrics) = fit_temperature_model(&table)?;

    let model_dir = config.model_output_dir();
    store::save_json(&model_dir, LINEAR_MODEL_FILE, &model)?;
    store::save_json(&model_dir, LINEAR_METRICS_FILE, &metrics)?;

    tracing::info!(dir = %model_dir.display(), "Linear Regression Model Trained Successfully!");
    tracing::info!("RMSE: {:.2}", metrics.rmse);
    tracing::info!("MSE: {:.2}", metrics.mse);
    tracing::info!("R² Score: {:.3}", metrics.r2_score);

    Ok(metrics)
}
