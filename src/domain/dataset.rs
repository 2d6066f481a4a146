//! Ordered, columnar market dataset.
//!
//! Rows are indexed by date in ascending temporal order; that order is never
//! permuted. Cells are `Option<f64>` where `None` marks a missing value
//! (unfilled warm-up window, gap in the source file). Feature computation only
//! ever appends columns; the row count changes only in the final
//! [`MarketDataset::drop_incomplete_rows`] trim.
//!
//! `Clone` is the isolation boundary: every hand-off to a feature module or an
//! agent works on its own deep copy, so no consumer can observe another's
//! mutations.

use crate::domain::error::ConclaveError;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct MarketDataset {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl MarketDataset {
    /// An empty dataset with the given date index and no columns yet.
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Fetch a column or fail with a [`ConclaveError::MissingColumn`] naming
    /// the consumer. Absent required data is always an error, never a default.
    pub fn require_column(
        &self,
        name: &str,
        needed_by: &str,
    ) -> Result<&[Option<f64>], ConclaveError> {
        self.column(name)
            .ok_or_else(|| ConclaveError::MissingColumn {
                column: name.to_string(),
                needed_by: needed_by.to_string(),
            })
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|values| values.get(row).copied().flatten())
    }

    /// Append a column. The length must match the row count and the name must
    /// not already be taken.
    pub fn add_column(
        &mut self,
        name: &str,
        values: Vec<Option<f64>>,
    ) -> Result<(), ConclaveError> {
        if self.has_column(name) {
            return Err(ConclaveError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        if values.len() != self.dates.len() {
            return Err(ConclaveError::ColumnLength {
                column: name.to_string(),
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.push(Column {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// True if any cell in any column is missing.
    pub fn has_missing(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.values.iter().any(|v| v.is_none()))
    }

    /// A copy keeping only rows where every column holds a value.
    pub fn drop_incomplete_rows(&self) -> MarketDataset {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&row| self.columns.iter().all(|c| c.values[row].is_some()))
            .collect();

        MarketDataset {
            dates: keep.iter().map(|&row| self.dates[row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: keep.iter().map(|&row| c.values[row]).collect(),
                })
                .collect(),
        }
    }

    /// A copy truncated to the first `len` rows.
    pub fn prefix(&self, len: usize) -> MarketDataset {
        let len = len.min(self.dates.len());
        MarketDataset {
            dates: self.dates[..len].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[..len].to_vec(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap())
            .collect()
    }

    fn sample_dataset() -> MarketDataset {
        let mut ds = MarketDataset::new(dates(3));
        ds.add_column("close", vec![Some(1.0), Some(2.0), Some(3.0)])
            .unwrap();
        ds
    }

    #[test]
    fn add_column_and_read_back() {
        let ds = sample_dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names(), vec!["close"]);
        assert_eq!(ds.value("close", 1), Some(2.0));
    }

    #[test]
    fn add_column_length_mismatch() {
        let mut ds = sample_dataset();
        let err = ds.add_column("short", vec![Some(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            ConclaveError::ColumnLength {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn add_column_duplicate_name() {
        let mut ds = sample_dataset();
        let err = ds
            .add_column("close", vec![Some(0.0), Some(0.0), Some(0.0)])
            .unwrap_err();
        assert!(matches!(err, ConclaveError::DuplicateColumn { .. }));
    }

    #[test]
    fn require_column_missing() {
        let ds = sample_dataset();
        let err = ds.require_column("SMA_20", "TrendAgent").unwrap_err();
        assert!(matches!(err, ConclaveError::MissingColumn { .. }));
        assert!(err.to_string().contains("TrendAgent"));
    }

    #[test]
    fn drop_incomplete_rows_keeps_complete_ones() {
        let mut ds = MarketDataset::new(dates(4));
        ds.add_column("a", vec![Some(1.0), None, Some(3.0), Some(4.0)])
            .unwrap();
        ds.add_column("b", vec![Some(1.0), Some(2.0), None, Some(4.0)])
            .unwrap();

        let trimmed = ds.drop_incomplete_rows();
        assert_eq!(trimmed.len(), 2);
        assert!(!trimmed.has_missing());
        assert_eq!(trimmed.value("a", 0), Some(1.0));
        assert_eq!(trimmed.value("b", 1), Some(4.0));
        assert_eq!(
            trimmed.dates(),
            &[
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
            ]
        );
        // original untouched
        assert_eq!(ds.len(), 4);
        assert!(ds.has_missing());
    }

    #[test]
    fn prefix_truncates_all_columns() {
        let ds = sample_dataset();
        let head = ds.prefix(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.value("close", 1), Some(2.0));
        assert_eq!(head.value("close", 2), None);
    }

    #[test]
    fn prefix_beyond_len_is_identity() {
        let ds = sample_dataset();
        assert_eq!(ds.prefix(10).len(), 3);
    }

    #[test]
    fn clone_is_isolated() {
        let ds = sample_dataset();
        let mut copy = ds.clone();
        copy.add_column("extra", vec![Some(0.0), Some(0.0), Some(0.0)])
            .unwrap();
        assert!(!ds.has_column("extra"));
    }
}
