//! Exponential Moving Average feature.
//!
//! alpha = 2/(window+1), seeded with the first present source value, then
//! EMA[i] = alpha*v[i] + (1-alpha)*EMA[i-1]. Defined from row 0 with no
//! warm-up gap. A missing source value leaves a gap in the output without resetting
//! the smoothing state.

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::feature::FeatureModule;

pub struct EmaFeature {
    name: String,
    window: usize,
    column: String,
}

impl EmaFeature {
    pub fn new(window: usize, column: impl Into<String>) -> Self {
        Self {
            name: format!("EMA_{}", window),
            window,
            column: column.into(),
        }
    }
}

impl FeatureModule for EmaFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, dataset: &MarketDataset) -> Result<MarketDataset, ConclaveError> {
        let source = dataset.require_column(&self.column, &self.name)?;

        let alpha = 2.0 / (self.window as f64 + 1.0);
        let mut state: Option<f64> = None;
        let mut values: Vec<Option<f64>> = Vec::with_capacity(source.len());

        for value in source {
            match value {
                Some(v) => {
                    let ema = match state {
                        Some(prev) => alpha * v + (1.0 - alpha) * prev,
                        None => *v,
                    };
                    state = Some(ema);
                    values.push(Some(ema));
                }
                None => values.push(None),
            }
        }

        let mut out = dataset.clone();
        out.add_column(&self.name, values)?;
        Ok(out)
    }
}
