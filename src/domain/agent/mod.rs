//! Trading agents: independent rule-based opinions over an enriched dataset.

pub mod trend;

use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::signal::Signal;

/// An independent trading agent.
///
/// `analyze` must fail with [`ConclaveError::MissingColumn`] when a required
/// column is absent: corrupted data crashes rather than silently producing a
/// wrong signal. A column that is present but holds no value in the most
/// recent row is an expected "not enough history yet" state and yields a
/// WAIT signal with zero confidence instead.
pub trait Agent {
    fn name(&self) -> &str;

    fn analyze(&self, dataset: &MarketDataset) -> Result<Signal, ConclaveError>;
}
