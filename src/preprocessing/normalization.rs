//! Нормализация данных

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// Z-score нормализация по столбцам. Сохраняется вместе с моделью,
/// чтобы на предсказании применялось то же преобразование.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataNormalizer {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
}

impl DataNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some() && self.std.is_some()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(WeatherError::Training("Empty dataset".to_string()));
        }

        let mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| WeatherError::Training("Failed to compute mean".to_string()))?;

        // Избегаем деления на ноль для константных признаков
        let std = X
            .std_axis(Axis(0), 0.0)
            .mapv(|v| if v < 1e-10 { 1.0 } else { v });

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = self.params()?;
        if X.ncols() != mean.len() {
            return Err(WeatherError::InvalidInput(format!(
                "expected {} features, got {}",
                mean.len(),
                X.ncols()
            )));
        }

        // (X - mean) / std
        Ok((X - mean) / std)
    }

    /// Нормализация одного вектора признаков
    pub fn transform_row(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        let (mean, std) = self.params()?;
        if x.len() != mean.len() {
            return Err(WeatherError::InvalidInput(format!(
                "expected {} features, got {}",
                mean.len(),
                x.len()
            )));
        }
        Ok((&x - mean) / std)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(WeatherError::InvalidInput("Normalizer not fitted".to_string())),
        }
    }
}
