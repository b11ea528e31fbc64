//! Клиент OpenWeather для эндпоинтов текущей погоды и прогноза

use serde::Deserialize;

use crate::error::{Result, WeatherError};
use crate::types::{ForecastData, ForecastItem, WeatherData};

pub const DEFAULT_CITY: &str = "London";

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    main: OwMain,
    wind: OwWind,
    clouds: OwClouds,
    #[serde(default)]
    weather: Vec<OwCondition>,
    name: String,
    #[serde(default)]
    sys: OwSys,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    wind: OwWind,
    clouds: OwClouds,
    #[serde(default)]
    weather: Vec<OwCondition>,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn condition(weather: &[OwCondition]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_default()
}

impl From<OwCurrent> for WeatherData {
    fn from(data: OwCurrent) -> Self {
        let (description, icon) = condition(&data.weather);
        Self {
            temp: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: data.wind.speed,
            clouds: data.clouds.all,
            description,
            icon,
            city: data.name,
            country: data.sys.country.unwrap_or_default(),
            dt: data.dt,
        }
    }
}

impl From<OwForecastEntry> for ForecastItem {
    fn from(item: OwForecastEntry) -> Self {
        let (description, icon) = condition(&item.weather);
        Self {
            dt: item.dt,
            temp: item.main.temp,
            feels_like: item.main.feels_like,
            temp_min: item.main.temp_min.unwrap_or(item.main.temp),
            temp_max: item.main.temp_max.unwrap_or(item.main.temp),
            humidity: item.main.humidity,
            pressure: item.main.pressure,
            wind_speed: item.wind.speed,
            clouds: item.clouds.all,
            description,
            icon,
            pop: item.pop.unwrap_or(0.0),
        }
    }
}

impl From<OwForecast> for ForecastData {
    fn from(data: OwForecast) -> Self {
        Self {
            city: data.city.name,
            country: data.city.country,
            list: data.list.into_iter().map(ForecastItem::from).collect(),
        }
    }
}

/// Преобразование сырого ответа `/weather`
pub fn parse_current(body: serde_json::Value) -> Result<WeatherData> {
    let raw: OwCurrent = serde_json::from_value(body)?;
    Ok(raw.into())
}

/// Преобразование сырого ответа `/forecast`
pub fn parse_forecast(body: serde_json::Value) -> Result<ForecastData> {
    let raw: OwForecast = serde_json::from_value(body)?;
    Ok(raw.into())
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set");
        }
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn current(&self, city: &str) -> Result<WeatherData> {
        parse_current(self.get("weather", city).await?)
    }

    pub async fn forecast(&self, city: &str) -> Result<ForecastData> {
        parse_forecast(self.get("forecast", city).await?)
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_deref().unwrap_or_default()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, endpoint, city, "OpenWeather request failed");
            return Err(WeatherError::UpstreamStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
