//! Relative Strength Index feature.
//!
//! delta[i] = v[i] - v[i-1]; gain/loss are the plain rolling means of the
//! clamped positive / absolute negative deltas over the trailing `window`
//! deltas; RSI = 100 - 100/(1 + gain/loss). When the rolling loss is exactly
//! zero the value is pinned to 100 regardless of gain, so a fully flat window
//! also reads 100. The first `window` rows are missing: the delta needs a
//! prior row, and the rolling mean needs `window` deltas.

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::feature::FeatureModule;

pub struct RsiFeature {
    name: String,
    window: usize,
    column: String,
}

impl RsiFeature {
    pub fn new(window: usize, column: impl Into<String>) -> Self {
        Self {
            name: format!("RSI_{}", window),
            window,
            column: column.into(),
        }
    }
}

impl FeatureModule for RsiFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, dataset: &MarketDataset) -> Result<MarketDataset, ConclaveError> {
        let source = dataset.require_column(&self.column, &self.name)?;

        let mut values: Vec<Option<f64>> = Vec::with_capacity(source.len());
        for i in 0..source.len() {
            if self.window == 0 || i < self.window {
                values.push(None);
                continue;
            }

            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            let mut complete = true;
            for j in (i + 1 - self.window)..=i {
                match (source[j - 1], source[j]) {
                    (Some(prev), Some(curr)) => {
                        let delta = curr - prev;
                        if delta > 0.0 {
                            gain_sum += delta;
                        } else {
                            loss_sum += -delta;
                        }
                    }
                    _ => {
                        complete = false;
                        break;
                    }
                }
            }
            if !complete {
                values.push(None);
                continue;
            }

            let gain = gain_sum / self.window as f64;
            let loss = loss_sum / self.window as f64;
            let rsi = if loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + gain / loss)
            };
            values.push(Some(rsi));
        }

        let mut out = dataset.clone();
        out.add_column(&self.name, values)?;
        Ok(out)
    }
}
