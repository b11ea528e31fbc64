//! Разбиение на обучающую и тестовую выборки

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, WeatherError};

pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Индексы строк обучающей и тестовой выборок
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    pub fn records(&self, X: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        (X.select(Axis(0), &self.train), X.select(Axis(0), &self.test))
    }

    pub fn targets<T: Clone>(&self, y: &Array1<T>) -> (Array1<T>, Array1<T>) {
        let pick = |idx: &[usize]| idx.iter().map(|&i| y[i].clone()).collect::<Array1<T>>();
        (pick(&self.train[..]), pick(&self.test[..]))
    }
}

/// Перемешивание с фиксированным seed; тестовая часть `ceil(n * test_size)`
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(WeatherError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(WeatherError::Training(format!(
            "Not enough samples to split: {} rows",
            n_samples
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}
