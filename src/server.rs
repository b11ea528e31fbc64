//! HTTP API поверх моделей

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::predict::{classify_weather_with, predict_temperature_with};
use crate::stats::get_dataset_stats;
use crate::types::{
    DatasetStats, ForecastData, LinearRegressionInput, LogisticRegressionInput,
    TemperaturePrediction, WeatherClassification, WeatherData,
};
use crate::weather_api::{OpenWeatherClient, DEFAULT_CITY};

const FALLBACK_HOST: &str = "127.0.0.1";

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    weather: OpenWeatherClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let weather = OpenWeatherClient::new(config.openweather_api_key.clone());
        Self {
            config: Arc::new(config),
            weather,
        }
    }

    pub fn with_weather_client(mut self, weather: OpenWeatherClient) -> Self {
        self.weather = weather;
        self
    }
}

/// Ошибка эндпоинта: статус и короткое сообщение для клиента
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn invalid_input() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid input data",
        }
    }

    fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    /// Статус апстрима пробрасывается клиенту, остальное - 500
    fn upstream(err: &WeatherError, message: &'static str) -> Self {
        let status = match err {
            WeatherError::UpstreamStatus(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/ml/linear-regression", post(linear_regression))
        .route("/api/ml/logistic-regression", post(logistic_regression))
        .route("/api/ml/dataset-stats", get(dataset_stats))
        .route("/api/weather/current", get(current_weather))
        .route("/api/weather/forecast", get(forecast))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Повтор на 127.0.0.1 только если сам адрес недоступен;
/// занятый порт и прочие ошибки возвращаются сразу
fn should_fallback(host: &str, err: &std::io::Error) -> bool {
    host != FALLBACK_HOST
        && matches!(
            err.kind(),
            std::io::ErrorKind::AddrNotAvailable | std::io::ErrorKind::Unsupported
        )
}

/// Запуск сервера; если адрес недоступен, повторная попытка на 127.0.0.1
pub async fn serve(config: Config) -> Result<()> {
    let requested = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&requested).await {
        Ok(listener) => listener,
        Err(e) if should_fallback(&config.host, &e) => {
            tracing::warn!(
                "Binding to {} failed ({}). Attempting fallback to {}:{}",
                requested,
                e,
                FALLBACK_HOST,
                config.port
            );
            tokio::net::TcpListener::bind((FALLBACK_HOST, config.port)).await?
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Weather ML API (Rust)",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Загрузка моделей и чтение CSV блокируют, поэтому уходят в blocking-пул
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WeatherError::Io(std::io::Error::other(e)))?
}

async fn linear_regression(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LinearRegressionInput>, JsonRejection>,
) -> std::result::Result<Json<TemperaturePrediction>, ApiError> {
    let Json(input) = payload.map_err(|e| {
        tracing::debug!("Rejected linear regression body: {}", e);
        ApiError::invalid_input()
    })?;
    input.validate().map_err(|e| {
        tracing::debug!("{}", e);
        ApiError::invalid_input()
    })?;

    let config = state.config.clone();
    run_blocking(move || predict_temperature_with(&config, &input))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Linear regression error: {}", e);
            ApiError::internal("Failed to make prediction")
        })
}

async fn logistic_regression(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LogisticRegressionInput>, JsonRejection>,
) -> std::result::Result<Json<WeatherClassification>, ApiError> {
    let Json(input) = payload.map_err(|e| {
        tracing::debug!("Rejected logistic regression body: {}", e);
        ApiError::invalid_input()
    })?;
    input.validate().map_err(|e| {
        tracing::debug!("{}", e);
        ApiError::invalid_input()
    })?;

    let config = state.config.clone();
    run_blocking(move || classify_weather_with(&config, &input))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Logistic regression error: {}", e);
            ApiError::internal("Failed to classify weather")
        })
}

async fn dataset_stats(
    State(state): State<AppState>,
) -> std::result::Result<Json<DatasetStats>, ApiError> {
    let config = state.config.clone();
    run_blocking(move || get_dataset_stats(&config))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Dataset stats error: {}", e);
            ApiError::internal("Failed to get dataset statistics")
        })
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: Option<String>,
}

impl CityQuery {
    fn city(&self) -> &str {
        self.city
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }
}

async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> std::result::Result<Json<WeatherData>, ApiError> {
    state.weather.current(query.city()).await.map(Json).map_err(|e| {
        tracing::error!("Weather API error: {}", e);
        ApiError::upstream(&e, "Failed to fetch weather data")
    })
}

async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> std::result::Result<Json<ForecastData>, ApiError> {
    state.weather.forecast(query.city()).await.map(Json).map_err(|e| {
        tracing::error!("Forecast API error: {}", e);
        ApiError::upstream(&e, "Failed to fetch forecast data")
    })
}
