//! Метрики качества моделей

use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mse: f64,
    pub r2_score: f64,
}

impl RegressionMetrics {
    pub fn evaluate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mse = mean_squared_error(y_true, y_pred);
        Self {
            rmse: mse.sqrt(),
            mse,
            r2_score: r2_score(y_true, y_pred),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ConfusionCounts {
    pub fn from_labels(y_true: &Array1<bool>, y_pred: &Array1<bool>) -> Self {
        let mut counts = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t, p) {
                (true, true) => counts.true_positive += 1,
                (false, false) => counts.true_negative += 1,
                (false, true) => counts.false_positive += 1,
                (true, false) => counts.false_negative += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// Метрики с нулём при делении на ноль
    pub fn metrics(&self) -> ClassificationMetrics {
        let tp = self.true_positive as f64;
        let precision = safe_div(tp, tp + self.false_positive as f64);
        let recall = safe_div(tp, tp + self.false_negative as f64);
        let f1_score = safe_div(2.0 * precision * recall, precision + recall);

        ClassificationMetrics {
            accuracy: safe_div(
                (self.true_positive + self.true_negative) as f64,
                self.total() as f64,
            ),
            precision,
            recall,
            f1_score,
        }
    }
}

pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_true - y_pred).mapv(|e| e * e).mean().unwrap_or(0.0)
}

/// Коэффициент детерминации; для константной выборки 1.0 при точном
/// совпадении и 0.0 иначе
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_res: f64 = (y_true - y_pred).mapv(|e| e * e).sum();
    let ss_tot: f64 = y_true.mapv(|v| (v - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
