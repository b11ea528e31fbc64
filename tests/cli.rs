//! Соглашение о вызове бинарника как подпроцесса

mod common;

use std::process::{Command, Output};

use serde_json::Value;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weather-ml"))
        .args(args)
        .env_remove("WEATHER_MODEL_DIR")
        .env_remove("WEATHER_DATA_PATH")
        .env_remove("WEATHER_BASE_DIR")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn wrong_argument_count_prints_error_json() {
    let output = run_cli(&["predict-linear", "70", "1013"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["error"], "Invalid arguments");
}

#[test]
fn unparsable_float_prints_error_json() {
    let output = run_cli(&["predict-logistic", "22", "humid", "1013", "5", "50"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["error"], "Invalid arguments");
}

#[test]
fn clap_errors_follow_json_convention() {
    for args in [&[][..], &["predict-linear", "--model-dir"][..], &["no-such-command"][..]] {
        let output = run_cli(args);
        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert_eq!(stdout_json(&output)["error"], "Invalid arguments");
    }
}

#[test]
fn help_is_still_printed() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("predict-linear"));
}

#[test]
fn missing_models_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_str().unwrap();
    let model_dir = dir.path().join("models");
    let output = run_cli(&[
        "--base-dir",
        base,
        "--model-dir",
        model_dir.to_str().unwrap(),
        "predict-linear",
        "70",
        "1013",
        "5",
        "50",
    ]);
    assert_eq!(output.status.code(), Some(1));

    let body = stdout_json(&output);
    assert_eq!(body["error"], "Missing model/metric files");
    assert_eq!(body["missing_files"].as_array().unwrap().len(), 6);
    assert!(body["searched_dirs"].as_array().unwrap().len() >= 3);
}

#[test]
fn train_then_predict_from_command_line() {
    let dir = tempfile::tempdir().unwrap();
    let data = common::write_dataset(dir.path());
    let model_dir = dir.path().join("models");
    let common_args = [
        "--base-dir",
        dir.path().to_str().unwrap(),
        "--model-dir",
        model_dir.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ];

    let train = run_cli(&[&common_args[..], &["train"]].concat());
    assert!(train.status.success(), "{}", String::from_utf8_lossy(&train.stderr));
    let summary = stdout_json(&train);
    assert!(summary["linear_regression"]["rmse"].is_number());
    assert!(summary["logistic_regression"]["metrics"]["accuracy"].is_number());

    // Отрицательная температура не путается с флагом
    let predict = run_cli(
        &[&common_args[..], &["predict-logistic", "-3.5", "90", "1000", "4", "95"]].concat(),
    );
    assert!(predict.status.success(), "{}", String::from_utf8_lossy(&predict.stderr));
    let body = stdout_json(&predict);
    assert!(body["rain_probability"].is_number());
    assert_eq!(body["cloudiness_prediction"], "Cloudy");

    let stats = run_cli(&[&common_args[..], &["stats"]].concat());
    assert!(stats.status.success());
    assert_eq!(stdout_json(&stats)["total_records"], common::ROWS);
}
