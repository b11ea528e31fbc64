//! Weather ML CLI
//!
//! Subcommands print exactly one JSON document on stdout and exit with
//! status 1 on failure, so the binary can be driven as a subprocess.
//! Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use weather_ml::{
    models::{train_linear_regression, train_logistic_regression},
    predict::{classify_weather_with, predict_temperature_with},
    server, Config, LinearRegressionInput, LogisticRegressionInput, WeatherError,
};

/// Weather ML: temperature regression and rain/cloudiness classification
#[derive(Parser)]
#[command(name = "weather-ml")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory with trained model artifacts (overrides WEATHER_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Path to the training CSV (overrides WEATHER_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Base directory for default model/data locations (overrides WEATHER_BASE_DIR)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the temperature linear regression model
    TrainLinear,

    /// Train the rain and cloudiness logistic regression models
    TrainLogistic,

    /// Train all models
    Train,

    /// Predict temperature: <humidity> <pressure> <wind_speed> <clouds>
    PredictLinear {
        #[arg(allow_hyphen_values = true, allow_negative_numbers = true, num_args = 0..)]
        values: Vec<String>,
    },

    /// Classify weather: <temperature> <humidity> <pressure> <wind_speed> <clouds>
    PredictLogistic {
        #[arg(allow_hyphen_values = true, allow_negative_numbers = true, num_args = 0..)]
        values: Vec<String>,
    },

    /// Print training dataset statistics
    Stats,

    /// Run the HTTP API server
    Serve {
        /// Listen host (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

enum Failure {
    Usage,
    Weather(WeatherError),
}

impl From<WeatherError> for Failure {
    fn from(e: WeatherError) -> Self {
        Failure::Weather(e)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ошибки разбора аргументов тоже отдаются JSON-ом с кодом 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{}", e.render());
            return emit(Err(Failure::Usage));
        }
    };

    // Логи только в stderr: stdout занят JSON-ответом
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env();
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }
    if cli.model_dir.is_some() {
        config.model_dir = cli.model_dir;
    }
    if cli.data.is_some() {
        config.data_path = cli.data;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            match server::serve(config).await.context("server failed") {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("{:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        command => emit(run(command, &config)),
    }
}

fn emit(result: Result<serde_json::Value, Failure>) -> ExitCode {
    match result {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(Failure::Usage) => {
            println!("{}", json!({ "error": "Invalid arguments" }));
            ExitCode::FAILURE
        }
        Err(Failure::Weather(e)) => {
            tracing::debug!("Command failed: {}", e);
            println!("{}", e.to_json());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<serde_json::Value, Failure> {
    let value = match command {
        Commands::TrainLinear => json!({ "linear_regression": train_linear_regression(config)? }),
        Commands::TrainLogistic => {
            let training = train_logistic_regression(config)?;
            json!({
                "logistic_regression": {
                    "metrics": training.rain.metrics,
                    "confusion_matrix": training.rain.confusion,
                }
            })
        }
        Commands::Train => {
            let linear = train_linear_regression(config)?;
            let training = train_logistic_regression(config)?;
            json!({
                "linear_regression": linear,
                "logistic_regression": {
                    "metrics": training.rain.metrics,
                    "confusion_matrix": training.rain.confusion,
                }
            })
        }
        Commands::PredictLinear { values } => {
            let [humidity, pressure, wind_speed, clouds] = parse_floats::<4>(&values)?;
            let input = LinearRegressionInput {
                humidity,
                pressure,
                wind_speed,
                clouds,
            };
            to_value(predict_temperature_with(config, &input)?)?
        }
        Commands::PredictLogistic { values } => {
            let [temperature, humidity, pressure, wind_speed, clouds] = parse_floats::<5>(&values)?;
            let input = LogisticRegressionInput {
                temperature,
                humidity,
                pressure,
                wind_speed,
                clouds,
            };
            to_value(classify_weather_with(config, &input)?)?
        }
        Commands::Stats => to_value(weather_ml::get_dataset_stats(config)?)?,
        // serve обрабатывается в main
        Commands::Serve { .. } => return Err(Failure::Usage),
    };
    Ok(value)
}

/// Ровно N аргументов, каждый - конечное число
fn parse_floats<const N: usize>(values: &[String]) -> Result<[f64; N], Failure> {
    if values.len() != N {
        return Err(Failure::Usage);
    }
    let mut out = [0.0; N];
    for (slot, raw) in out.iter_mut().zip(values) {
        *slot = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(Failure::Usage)?;
    }
    Ok(out)
}

fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value, Failure> {
    serde_json::to_value(value).map_err(|e| Failure::Weather(e.into()))
}
