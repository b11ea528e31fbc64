/// ML модели

pub mod linear;
pub mod logistic;
pub mod metrics;
pub mod store;

pub use linear::{train_linear_regression, TemperatureModel};
pub use logistic::{train_logistic_regression, WeatherClassifier};
pub use metrics::{ClassificationMetrics, ConfusionCounts, RegressionMetrics};
pub use store::{ModelBundle, ModelStore};
