//! Статистика по обучающему датасету

use serde_json::{Map, Value};

use crate::config::Config;
use crate::dataset::{Cell, WeatherTable};
use crate::error::Result;
use crate::types::{DatasetStats, FeatureStatistics};

const SAMPLE_ROWS: usize = 10;

pub fn get_dataset_stats(config: &Config) -> Result<DatasetStats> {
    let path = config.resolve_dataset()?;
    let table = WeatherTable::from_path(&path)?;
    summarize(&table)
}

pub fn summarize(table: &WeatherTable) -> Result<DatasetStats> {
    let mut statistics = Map::new();
    for (idx, name) in table.headers().iter().enumerate() {
        if !table.is_numeric(idx) {
            continue;
        }
        let values: Vec<f64> = table.column(idx).filter_map(Cell::as_f64).collect();
        if let Some(summary) = describe(&values) {
            statistics.insert(name.clone(), serde_json::to_value(summary)?);
        }
    }

    Ok(DatasetStats {
        total_records: table.len(),
        features: table.headers().to_vec(),
        statistics,
        sample_data: sample_rows(table, SAMPLE_ROWS),
    })
}

/// mean / median / выборочное std / min / max; `None` для пустого набора
pub fn describe(values: &[f64]) -> Option<FeatureStatistics> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let std = if values.len() > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(var.sqrt())
    } else {
        None
    };

    Some(FeatureStatistics {
        mean,
        median,
        std,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// Первые строки в виде объектов `столбец -> значение`.
/// В столбцах с дробными числами целые выводятся как дробные.
fn sample_rows(table: &WeatherTable, limit: usize) -> Vec<Map<String, Value>> {
    let float_columns: Vec<bool> = (0..table.headers().len())
        .map(|idx| table.column(idx).any(|c| matches!(c, Cell::Float(_))))
        .collect();

    table
        .rows()
        .iter()
        .take(limit)
        .map(|row| {
            table
                .headers()
                .iter()
                .zip(row)
                .enumerate()
                .map(|(idx, (name, cell))| {
                    let value = match cell {
                        Cell::Int(v) if float_columns[idx] => Value::from(*v as f64),
                        Cell::Int(v) => Value::from(*v),
                        Cell::Float(v) => Value::from(*v),
                        Cell::Text(s) => Value::from(s.as_str()),
                        Cell::Missing => Value::Null,
                    };
                    (name.clone(), value)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,temperature,humidity,rain
2024-01-01,10.5,80,1
2024-01-02,12,60,0
2024-01-03,14.5,,0
2024-01-04,9,40,1
";

    #[test]
    fn describes_values_like_pandas() {
        let s = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert!((s.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn single_value_has_no_sample_std() {
        let s = describe(&[7.0]).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.median, 7.0);
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn summary_covers_numeric_columns_only() {
        let table = WeatherTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let stats = summarize(&table).unwrap();

        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.features, vec!["date", "temperature", "humidity", "rain"]);
        assert!(!stats.statistics.contains_key("date"));

        // Пустая ячейка пропускается
        let humidity = stats.feature("humidity").unwrap();
        assert_eq!(humidity.mean, 60.0);
        assert_eq!(humidity.median, 60.0);

        // Порядок ключей как в заголовке, а не по алфавиту
        let keys: Vec<&String> = stats.statistics.keys().collect();
        assert_eq!(keys, vec!["temperature", "humidity", "rain"]);
    }

    #[test]
    fn sample_rows_keep_column_order_and_types() {
        let table = WeatherTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let stats = summarize(&table).unwrap();

        assert_eq!(stats.sample_data.len(), 4);
        let first = &stats.sample_data[0];
        let keys: Vec<&String> = first.keys().collect();
        assert_eq!(keys, vec!["date", "temperature", "humidity", "rain"]);
        assert_eq!(first["date"], "2024-01-01");
        assert_eq!(first["rain"], 1);

        // Целое в дробном столбце выводится как дробное
        assert_eq!(stats.sample_data[1]["temperature"], Value::from(12.0));
        assert_eq!(stats.sample_data[2]["humidity"], Value::Null);
    }
}
