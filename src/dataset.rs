//! Загрузка погодного датасета из CSV

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::{Result, WeatherError};

/// Признаки модели температуры
pub const TEMPERATURE_FEATURES: [&str; 4] = ["humidity", "pressure", "wind_speed", "clouds"];

/// Признаки классификаторов дождя и облачности
pub const CLASSIFIER_FEATURES: [&str; 5] =
    ["temperature", "humidity", "pressure", "wind_speed", "clouds"];

pub const TEMPERATURE_TARGET: &str = "temperature";
pub const RAIN_TARGET: &str = "rain";
pub const CLOUDINESS_TARGET: &str = "cloudiness";

/// Строки, которые читаются как пропуск (набор pandas `read_csv` по умолчанию)
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Значение одной ячейки CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if MISSING_TOKENS.contains(&raw) {
            return Cell::Missing;
        }
        if let Ok(v) = raw.parse::<i64>() {
            return Cell::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return Cell::Float(v);
        }
        Cell::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl WeatherTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Dataset loaded"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| WeatherError::UnknownColumn(name.to_string()))
    }

    /// Ячейки столбца по порядку строк
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Столбец числовой, если все непустые ячейки числа (и есть хотя бы одна)
    pub fn is_numeric(&self, idx: usize) -> bool {
        let mut any = false;
        for cell in self.column(idx) {
            match cell {
                Cell::Int(_) | Cell::Float(_) => any = true,
                Cell::Missing => {}
                Cell::Text(_) => return false,
            }
        }
        any
    }

    /// Матрица признаков (строки × столбцы `names`)
    pub fn features(&self, names: &[&str]) -> Result<Array2<f64>> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;

        let mut features = Array2::zeros((self.rows.len(), indices.len()));
        for (i, row) in self.rows.iter().enumerate() {
            for (j, &idx) in indices.iter().enumerate() {
                features[[i, j]] = row[idx].as_f64().ok_or_else(|| WeatherError::NonNumeric {
                    column: names[j].to_string(),
                    row: i + 1,
                })?;
            }
        }

        Ok(features)
    }

    pub fn target(&self, name: &str) -> Result<Array1<f64>> {
        let idx = self.column_index(name)?;
        self.column(idx)
            .enumerate()
            .map(|(i, cell)| {
                cell.as_f64().ok_or_else(|| WeatherError::NonNumeric {
                    column: name.to_string(),
                    row: i + 1,
                })
            })
            .collect()
    }

    /// Бинарная метка: любое ненулевое значение считается классом 1
    pub fn binary_target(&self, name: &str) -> Result<Array1<bool>> {
        Ok(self.target(name)?.mapv(|v| v != 0.0))
    }
}
