//! Trend-following agent: compares a fast and a slow column on the latest row.

use crate::domain::agent::Agent;
use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::signal::{Action, Signal};

/// Buys when the fast column is above the slow one, sells when below.
/// Confidence scales with the relative gap: a 5% gap saturates at 1.0.
pub struct TrendAgent {
    name: String,
    fast_col: String,
    slow_col: String,
}

impl TrendAgent {
    pub fn new(
        name: impl Into<String>,
        fast_col: impl Into<String>,
        slow_col: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            fast_col: fast_col.into(),
            slow_col: slow_col.into(),
        }
    }
}

impl Agent for TrendAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, dataset: &MarketDataset) -> Result<Signal, ConclaveError> {
        let fast = dataset.require_column(&self.fast_col, &self.name)?;
        let slow = dataset.require_column(&self.slow_col, &self.name)?;

        let latest_fast = fast.last().copied().flatten();
        let latest_slow = slow.last().copied().flatten();
        let (Some(fast_val), Some(slow_val)) = (latest_fast, latest_slow) else {
            return Signal::new(&self.name, Action::Wait, 0.0);
        };

        if fast_val == slow_val {
            return Signal::new(&self.name, Action::Wait, 0.0);
        }

        let gap = (fast_val - slow_val).abs() / slow_val;
        let confidence = (gap * 20.0).min(1.0);
        let action = if fast_val > slow_val {
            Action::Buy
        } else {
            Action::Sell
        };

        Ok(Signal::new(&self.name, action, confidence)?
            .with_metadata("fast", serde_json::Value::from(fast_val))
            .with_metadata("slow", serde_json::Value::from(slow_val)))
    }
}
