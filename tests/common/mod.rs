//! Общие помощники интеграционных тестов

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use weather_ml::Config;

pub const ROWS: usize = 200;

/// Детерминированный датасет с почти линейной температурой,
/// дождём при высокой влажности и низком давлении, облачностью по clouds
pub fn dataset_csv() -> String {
    let mut csv = String::from("date,temperature,humidity,pressure,wind_speed,clouds,rain,cloudiness\n");
    for i in 0..ROWS {
        let humidity = 30 + (i * 37) % 70;
        let pressure = 995.0 + ((i * 13) % 35) as f64;
        let wind_speed = ((i * 7) % 15) as f64 * 0.5;
        let clouds = (i * 53) % 100;
        let noise = (((i * 17) % 10) as f64 - 4.5) * 0.1;
        let temperature = 30.0 - 0.1 * humidity as f64 + 0.02 * (pressure - 1013.0)
            - 0.4 * wind_speed
            - 0.05 * clouds as f64
            + noise;
        let rain = u8::from(humidity > 65 && pressure < 1015.0);
        let cloudiness = u8::from(clouds > 50);
        writeln!(
            csv,
            "2024-{:02}-{:02},{:.2},{},{:.1},{:.1},{},{},{}",
            i % 12 + 1,
            i % 28 + 1,
            temperature,
            humidity,
            pressure,
            wind_speed,
            clouds,
            rain,
            cloudiness
        )
        .unwrap();
    }
    csv
}

/// `<root>/data/weather_dataset.csv`
pub fn write_dataset(root: &Path) -> PathBuf {
    let dir = root.join("data");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("weather_dataset.csv");
    std::fs::write(&path, dataset_csv()).unwrap();
    path
}

/// Конфигурация с базой в `root`, без переменных окружения
pub fn config_for(root: &Path) -> Config {
    let mut config = Config::new(root);
    config.model_dir = Some(root.join("models"));
    config.data_path = Some(root.join("data").join("weather_dataset.csv"));
    config
}
