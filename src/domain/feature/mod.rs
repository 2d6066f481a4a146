//! Feature engineering: modules that enrich a dataset one column at a time.
//!
//! Quant rule: no look-ahead. The value a module writes at row *i* must be a
//! pure function of source rows `[0..i]`. Computing over a prefix of the
//! dataset must yield the same values as computing over the full dataset.

pub mod ema;
pub mod rsi;
pub mod sma;

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use tracing::debug;

/// A feature engineering module.
///
/// `compute` returns a copy of the input with exactly one new column named by
/// [`FeatureModule::name`]; the caller's dataset is never mutated. A missing
/// source column is a [`ConclaveError::MissingColumn`] error.
pub trait FeatureModule {
    /// Column identifier this module produces, e.g. `SMA_20`.
    fn name(&self) -> &str;

    fn compute(&self, dataset: &MarketDataset) -> Result<MarketDataset, ConclaveError>;
}

/// Ordered chain of feature modules.
///
/// Modules run strictly in registration order, each consuming the output of
/// the previous one, so a later module may read a column an earlier one
/// produced.
#[derive(Default)]
pub struct FeaturePipeline {
    modules: Vec<Box<dyn FeatureModule>>,
}

impl FeaturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module. Returns `&mut self` for chaining.
    pub fn add_feature(&mut self, module: Box<dyn FeatureModule>) -> &mut Self {
        self.modules.push(module);
        self
    }

    /// Registered module identifiers, in order. Lets callers wire agents to
    /// feature columns without hardcoding names.
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Run every module over a private copy of `raw`, then drop every row
    /// still containing a missing value in any column. The returned dataset is
    /// guaranteed complete; `raw` is left untouched.
    pub fn generate(&self, raw: &MarketDataset) -> Result<MarketDataset, ConclaveError> {
        let mut working = raw.clone();
        for module in &self.modules {
            working = module.compute(&working)?;
            debug!(feature = module.name(), "feature computed");
        }
        let trimmed = working.drop_incomplete_rows();
        debug!(
            rows_in = raw.len(),
            rows_out = trimmed.len(),
            features = self.modules.len(),
            "feature pipeline complete"
        );
        Ok(trimmed)
    }
}
