//! HTTP API через tower::ServiceExt::oneshot

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use weather_ml::server::{router, AppState};
use weather_ml::weather_api::OpenWeatherClient;
use weather_ml::{train_linear_regression, train_logistic_regression, Config};

fn app(config: Config) -> Router {
    // Порт 1 закрыт: запросы к погодному API гарантированно падают
    let weather = OpenWeatherClient::new(Some("test".into())).with_base_url("http://127.0.0.1:1");
    router(AppState::new(config).with_weather_client(weather))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(common::config_for(dir.path())), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn out_of_range_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/api/ml/linear-regression",
        json!({"humidity": 70, "pressure": 1500, "wind_speed": 5, "clouds": 50}),
    );
    let (status, body) = send(app(common::config_for(dir.path())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input data");
}

#[tokio::test]
async fn non_numeric_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/api/ml/logistic-regression",
        json!({"temperature": "warm", "humidity": 70, "pressure": 1013, "wind_speed": 5, "clouds": 50}),
    );
    let (status, body) = send(app(common::config_for(dir.path())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input data");
}

#[tokio::test]
async fn prediction_without_models_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/api/ml/linear-regression",
        json!({"humidity": 70, "pressure": 1013, "wind_speed": 5, "clouds": 50}),
    );
    let (status, body) = send(app(common::config_for(dir.path())), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to make prediction");
}

#[tokio::test]
async fn trained_models_serve_predictions() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(dir.path());
    let config = common::config_for(dir.path());
    train_linear_regression(&config).unwrap();
    train_logistic_regression(&config).unwrap();

    let request = post_json(
        "/api/ml/linear-regression",
        json!({"humidity": 70, "pressure": 1013, "wind_speed": 5, "clouds": 50}),
    );
    let (status, body) = send(app(config.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["predicted_temperature"].is_number());
    assert!(body["metrics"]["r2_score"].is_number());

    let request = post_json(
        "/api/ml/logistic-regression",
        json!({"temperature": 15, "humidity": 95, "pressure": 998, "wind_speed": 3, "clouds": 90}),
    );
    let (status, body) = send(app(config), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rain_prediction"], "Rain");
    assert!(body["confusion_matrix"]["true_positive"].is_u64());
}

#[tokio::test]
async fn dataset_stats_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(dir.path());

    let (status, body) = send(
        app(common::config_for(dir.path())),
        get("/api/ml/dataset-stats"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], common::ROWS);
    assert_eq!(body["features"][0], "date");
    assert!(body["statistics"]["pressure"]["median"].is_number());
}

#[tokio::test]
async fn dataset_stats_without_csv_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(common::config_for(dir.path())),
        get("/api/ml/dataset-stats"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get dataset statistics");
}

#[tokio::test]
async fn unreachable_weather_api_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(common::config_for(dir.path())),
        get("/api/weather/current?city=Oslo"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch weather data");
}
