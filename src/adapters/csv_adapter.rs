//! CSV file data adapter.
//!
//! Reads `{symbol}.csv` under a base path. The file needs a `date` header
//! column (`%Y-%m-%d`); every other header becomes a numeric dataset column.
//! Empty cells load as missing values. Rows are sorted ascending by date
//! before the dataset is built.

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> ConclaveError {
    ConclaveError::Data { reason }
}

fn parse_cell(text: &str, column: &str, row: usize) -> Result<Option<f64>, ConclaveError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>().map(Some).map_err(|e| {
        data_error(format!(
            "invalid value '{}' in column '{}' at row {}: {}",
            text, column, row, e
        ))
    })
}

impl DataPort for CsvAdapter {
    fn fetch_dataset(&self, symbol: &str) -> Result<MarketDataset, ConclaveError> {
        let path = self.csv_path(symbol);
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| data_error(format!("failed to open {}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .clone();
        let date_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("date"))
            .ok_or_else(|| data_error(format!("{}: no 'date' column", path.display())))?;
        let value_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
        for (row_index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            let date_text = record
                .get(date_index)
                .ok_or_else(|| data_error(format!("missing date at row {}", row_index)))?;
            let date = NaiveDate::parse_from_str(date_text.trim(), "%Y-%m-%d").map_err(|e| {
                data_error(format!(
                    "invalid date '{}' at row {}: {}",
                    date_text, row_index, e
                ))
            })?;

            let mut values = Vec::with_capacity(value_columns.len());
            for (index, name) in &value_columns {
                let text = record.get(*index).unwrap_or("");
                values.push(parse_cell(text, name, row_index)?);
            }
            rows.push((date, values));
        }

        rows.sort_by_key(|(date, _)| *date);

        let mut dataset = MarketDataset::new(rows.iter().map(|(date, _)| *date).collect());
        for (column_index, (_, name)) in value_columns.iter().enumerate() {
            dataset.add_column(
                name,
                rows.iter().map(|(_, values)| values[column_index]).collect(),
            )?;
        }
        Ok(dataset)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ConclaveError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
