//! Simple Moving Average feature.
//!
//! Value at row i is the arithmetic mean of the source column over rows
//! [i-window+1, i]. The first window-1 rows are missing; a missing source
//! value anywhere in the window makes that output missing too.

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::feature::FeatureModule;

pub struct SmaFeature {
    name: String,
    window: usize,
    column: String,
}

impl SmaFeature {
    pub fn new(window: usize, column: impl Into<String>) -> Self {
        Self {
            name: format!("SMA_{}", window),
            window,
            column: column.into(),
        }
    }
}

impl FeatureModule for SmaFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, dataset: &MarketDataset) -> Result<MarketDataset, ConclaveError> {
        let source = dataset.require_column(&self.column, &self.name)?;

        let mut values: Vec<Option<f64>> = Vec::with_capacity(source.len());
        for i in 0..source.len() {
            if self.window == 0 || i + 1 < self.window {
                values.push(None);
                continue;
            }
            let window = &source[i + 1 - self.window..=i];
            let mut sum = 0.0;
            let mut complete = true;
            for value in window {
                match value {
                    Some(v) => sum += v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            values.push(complete.then(|| sum / self.window as f64));
        }

        let mut out = dataset.clone();
        out.add_column(&self.name, values)?;
        Ok(out)
    }
}
