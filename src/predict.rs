//! Предсказания по сохранённым моделям

use crate::config::Config;
use crate::error::Result;
use crate::models::{ModelBundle, ModelStore};
use crate::types::{
    LinearRegressionInput, LogisticRegressionInput, TemperaturePrediction, WeatherClassification,
};

pub fn predict_temperature(
    models: &ModelBundle,
    input: &LinearRegressionInput,
) -> Result<TemperaturePrediction> {
    let predicted_temperature = models.linear.predict_one(&input.to_features())?;
    Ok(TemperaturePrediction {
        predicted_temperature,
        metrics: models.linear_metrics,
    })
}

pub fn classify_weather(
    models: &ModelBundle,
    input: &LogisticRegressionInput,
) -> Result<WeatherClassification> {
    let features = input.to_features();
    let (rain, rain_probability) = models.rain.predict_one(&features)?;
    let (cloudy, cloudiness_probability) = models.cloud.predict_one(&features)?;

    Ok(WeatherClassification {
        rain_prediction: if rain { "Rain" } else { "No Rain" }.to_string(),
        rain_probability,
        cloudiness_prediction: if cloudy { "Cloudy" } else { "Clear" }.to_string(),
        cloudiness_probability,
        metrics: models.logistic_metrics,
        confusion_matrix: models.logistic_confusion,
    })
}

/// Загрузка моделей по путям из конфигурации и прогноз температуры
pub fn predict_temperature_with(
    config: &Config,
    input: &LinearRegressionInput,
) -> Result<TemperaturePrediction> {
    let models = ModelStore::from_config(config).load()?;
    predict_temperature(&models, input)
}

pub fn classify_weather_with(
    config: &Config,
    input: &LogisticRegressionInput,
) -> Result<WeatherClassification> {
    let models = ModelStore::from_config(config).load()?;
    classify_weather(&models, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ClassificationMetrics, ConfusionCounts, RegressionMetrics, TemperatureModel,
        WeatherClassifier,
    };
    use crate::preprocessing::DataNormalizer;
    use chrono::Utc;
    use ndarray::array;

    fn classifier(target: &str, weight_on_humidity: f64) -> WeatherClassifier {
        let mut normalizer = DataNormalizer::new();
        // Единичное масштабирование: среднее 0, std 1 по каждому признаку
        normalizer
            .fit(&array![[-1.0, -1.0, -1.0, -1.0, -1.0], [1.0, 1.0, 1.0, 1.0, 1.0]])
            .unwrap();
        WeatherClassifier {
            target: target.to_string(),
            features: vec![],
            normalizer,
            coefficients: vec![0.0, weight_on_humidity, 0.0, 0.0, 0.0],
            intercept: 0.0,
            trained_at: Utc::now(),
        }
    }

    fn bundle() -> ModelBundle {
        ModelBundle {
            linear: TemperatureModel {
                features: vec![],
                coefficients: vec![0.1, 0.0, -0.5, 0.0],
                intercept: 10.0,
                trained_at: Utc::now(),
            },
            linear_metrics: RegressionMetrics {
                rmse: 2.0,
                mse: 4.0,
                r2_score: 0.8,
            },
            rain: classifier("rain", 1.0),
            cloud: classifier("cloudiness", -1.0),
            logistic_metrics: ClassificationMetrics {
                accuracy: 0.9,
                precision: 0.8,
                recall: 0.7,
                f1_score: 0.75,
            },
            logistic_confusion: ConfusionCounts {
                true_positive: 7,
                true_negative: 11,
                false_positive: 1,
                false_negative: 1,
            },
        }
    }

    #[test]
    fn temperature_uses_linear_model_and_reports_metrics() {
        let input = LinearRegressionInput {
            humidity: 70.0,
            pressure: 1013.0,
            wind_speed: 5.0,
            clouds: 50.0,
        };
        let out = predict_temperature(&bundle(), &input).unwrap();
        assert!((out.predicted_temperature - 14.5).abs() < 1e-12);
        assert_eq!(out.metrics.mse, 4.0);
    }

    #[test]
    fn classification_labels_and_probabilities() {
        let input = LogisticRegressionInput {
            temperature: 0.0,
            humidity: 2.0,
            pressure: 0.0,
            wind_speed: 0.0,
            clouds: 0.0,
        };
        let out = classify_weather(&bundle(), &input).unwrap();

        let p = 1.0 / (1.0 + (-2.0f64).exp());
        assert_eq!(out.rain_prediction, "Rain");
        assert!((out.rain_probability - p).abs() < 1e-12);
        // Облачность с отрицательным весом: предсказан Clear с той же вероятностью
        assert_eq!(out.cloudiness_prediction, "Clear");
        assert!((out.cloudiness_probability - p).abs() < 1e-12);
        assert_eq!(out.confusion_matrix.true_negative, 11);
    }

    #[test]
    fn output_field_names_are_stable() {
        let input = LogisticRegressionInput {
            temperature: 0.0,
            humidity: -2.0,
            pressure: 0.0,
            wind_speed: 0.0,
            clouds: 0.0,
        };
        let value = serde_json::to_value(classify_weather(&bundle(), &input).unwrap()).unwrap();
        assert_eq!(value["rain_prediction"], "No Rain");
        assert_eq!(value["cloudiness_prediction"], "Cloudy");
        assert!(value["metrics"]["f1_score"].is_number());
        assert!(value["confusion_matrix"]["false_negative"].is_number());
    }
}
