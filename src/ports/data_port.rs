//! Market data access port trait.

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;

/// Source of raw, time-ordered market datasets. Implementations must return
/// rows in ascending date order; everything downstream depends on it.
pub trait DataPort {
    fn fetch_dataset(&self, symbol: &str) -> Result<MarketDataset, ConclaveError>;

    fn list_symbols(&self) -> Result<Vec<String>, ConclaveError>;
}
