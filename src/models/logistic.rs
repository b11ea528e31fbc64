//! Логистическая регрессия: дождь / облачность

#![allow(non_snake_case)]

use chrono::{DateTime, Utc};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dataset::{WeatherTable, CLASSIFIER_FEATURES, CLOUDINESS_TARGET, RAIN_TARGET};
use crate::error::{Result, WeatherError};
use crate::models::metrics::{ClassificationMetrics, ConfusionCounts};
use crate::models::store::{
    self, CLOUD_MODEL_FILE, LOGISTIC_CONFUSION_FILE, LOGISTIC_METRICS_FILE, RAIN_MODEL_FILE,
};
use crate::preprocessing::split::{train_test_split, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use crate::preprocessing::DataNormalizer;

pub const MAX_ITERATIONS: u64 = 1000;

const THRESHOLD: f64 = 0.5;

/// Бинарный классификатор. Коэффициенты относятся к нормализованным
/// признакам и ориентированы так, что sigmoid даёт вероятность класса 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherClassifier {
    pub target: String,
    pub features: Vec<String>,
    pub normalizer: DataNormalizer,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub trained_at: DateTime<Utc>,
}

impl WeatherClassifier {
    pub fn fit(X: &Array2<f64>, y: &Array1<bool>, features: &[&str], target: &str) -> Result<Self> {
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
        let positives = y.iter().filter(|&&v| v).count();
        if positives == 0 || positives == y.len() {
            return Err(WeatherError::Training(format!(
                "target '{}' needs both classes in the training split",
                target
            )));
        }

        let mut normalizer = DataNormalizer::new();
        let X_scaled = normalizer.fit_transform(X)?;

        let dataset = Dataset::new(X_scaled, y.clone());
        let fitted = LogisticRegression::<f64>::default()
            .max_iterations(MAX_ITERATIONS)
            .fit(&dataset)
            .map_err(|e| WeatherError::Training(e.to_string()))?;

        // linfa сам выбирает «положительный» класс; приводим к class 1 = true
        let sign = if fitted.labels().pos.class { 1.0 } else { -1.0 };

        Ok(Self {
            target: target.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            normalizer,
            coefficients: fitted.params().iter().map(|w| w * sign).collect(),
            intercept: fitted.intercept() * sign,
            trained_at: Utc::now(),
        })
    }

    /// Вероятность класса 1 для каждой строки
    pub fn predict_proba(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(X.ncols())?;
        let X_scaled = self.normalizer.transform(X)?;
        let weights = ArrayView1::from(&self.coefficients[..]);
        Ok((X_scaled.dot(&weights) + self.intercept).mapv(sigmoid))
    }

    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(self.predict_proba(X)?.mapv(|p| p >= THRESHOLD))
    }

    /// Класс и вероятность именно предсказанного класса
    pub fn predict_one(&self, x: &[f64]) -> Result<(bool, f64)> {
        self.check_width(x.len())?;
        let scaled = self.normalizer.transform_row(ArrayView1::from(x))?;
        let z: f64 = scaled
            .iter()
            .zip(&self.coefficients)
            .map(|(a, w)| a * w)
            .sum::<f64>()
            + self.intercept;

        let p = sigmoid(z);
        let label = p >= THRESHOLD;
        Ok((label, if label { p } else { 1.0 - p }))
    }

    fn check_width(&self, n: usize) -> Result<()> {
        if n != self.coefficients.len() {
            return Err(WeatherError::InvalidInput(format!(
                "{} classifier expects {} features ({}), got {}",
                self.target,
                self.coefficients.len(),
                self.features.join(", "),
                n
            )));
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Классификатор и его оценка на отложенной выборке
pub struct ClassifierFit {
    pub model: WeatherClassifier,
    pub confusion: ConfusionCounts,
    pub metrics: ClassificationMetrics,
}

/// Отдельное разбиение 80/20 (seed 42) для каждой целевой переменной
pub fn fit_classifier(table: &WeatherTable, target: &str) -> Result<ClassifierFit> {
    let X = table.features(&CLASSIFIER_FEATURES)?;
    let y = table.binary_target(target)?;

    let split = train_test_split(X.nrows(), DEFAULT_TEST_SIZE, DEFAULT_SEED)?;
    let (X_train, X_test) = split.records(&X);
    let (y_train, y_test) = split.targets(&y);

    let model = WeatherClassifier::fit(&X_train, &y_train, &CLASSIFIER_FEATURES, target)?;
    let y_pred = model.predict(&X_test)?;
    let confusion = ConfusionCounts::from_labels(&y_test, &y_pred);

    Ok(ClassifierFit {
        model,
        metrics: confusion.metrics(),
        confusion,
    })
}

/// Результат обучения обоих классификаторов; метрики сохраняются по модели дождя
pub struct LogisticTraining {
    pub rain: ClassifierFit,
    pub cloud: ClassifierFit,
}

pub fn fit_weather_classifiers(table: &WeatherTable) -> Result<LogisticTraining> {
    Ok(LogisticTraining {
        rain: fit_classifier(table, RAIN_TARGET)?,
        cloud: fit_classifier(table, CLOUDINESS_TARGET)?,
    })
}

/// Загружает датасет, обучает оба классификатора и сохраняет артефакты
pub fn train_logistic_regression(config: &Config) -> Result<LogisticTraining> {
    let data_path = config.resolve_dataset()?;
    let table = WeatherTable::from_path(&data_path)?;

    let training = fit_weather_classifiers(&table)?;

    let model_dir = config.model_output_dir();
    store::save_json(&model_dir, RAIN_MODEL_FILE, &training.rain.model)?;
    store::save_json(&model_dir, CLOUD_MODEL_FILE, &training.cloud.model)?;
    store::save_json(&model_dir, LOGISTIC_METRICS_FILE, &training.rain.metrics)?;
    store::save_json(&model_dir, LOGISTIC_CONFUSION_FILE, &training.rain.confusion)?;

    let m = &training.rain.metrics;
    tracing::info!(dir = %model_dir.display(), "Logistic Regression Models Trained Successfully!");
    tracing::info!("Rain Model - Accuracy: {:.1}%", m.accuracy * 100.0);
    tracing::info!("Rain Model - Precision: {:.1}%", m.precision * 100.0);
    tracing::info!("Rain Model - Recall: {:.1}%", m.recall * 100.0);
    tracing::info!("Rain Model - F1 Score: {:.3}", m.f1_score);
    tracing::info!(
        "Cloud Model - Accuracy: {:.1}%",
        training.cloud.metrics.accuracy * 100.0
    );

    Ok(training)
}
