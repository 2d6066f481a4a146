#![allow(dead_code)]

use chrono::NaiveDate;
use conclave::domain::agent::Agent;
use conclave::domain::dataset::MarketDataset;
use conclave::domain::error::ConclaveError;
use conclave::domain::signal::{Action, Signal};
use conclave::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Dataset with a single `close` column, dated daily from 2024-01-01.
pub fn close_dataset(prices: &[f64]) -> MarketDataset {
    let start = date(2024, 1, 1);
    let dates = (0..prices.len())
        .map(|i| start + chrono::Days::new(i as u64))
        .collect();
    let mut ds = MarketDataset::new(dates);
    ds.add_column("close", prices.iter().map(|&p| Some(p)).collect())
        .unwrap();
    ds
}

pub struct MockDataPort {
    pub datasets: HashMap<String, MarketDataset>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_dataset(mut self, symbol: &str, dataset: MarketDataset) -> Self {
        self.datasets.insert(symbol.to_string(), dataset);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_dataset(&self, symbol: &str) -> Result<MarketDataset, ConclaveError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ConclaveError::Data {
                reason: reason.clone(),
            });
        }
        self.datasets
            .get(symbol)
            .cloned()
            .ok_or_else(|| ConclaveError::Data {
                reason: format!("no dataset for {}", symbol),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, ConclaveError> {
        let mut symbols: Vec<String> = self.datasets.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Agent returning a fixed signal, used to script consensus scenarios.
pub struct FixedAgent {
    pub name: String,
    pub action: Action,
    pub confidence: f64,
}

impl FixedAgent {
    pub fn boxed(name: &str, action: Action, confidence: f64) -> Box<dyn Agent> {
        Box::new(Self {
            name: name.to_string(),
            action,
            confidence,
        })
    }
}

impl Agent for FixedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, _dataset: &MarketDataset) -> Result<Signal, ConclaveError> {
        Signal::new(&self.name, self.action, self.confidence)
    }
}

/// Agent that always fails, for fail-fast scenarios.
pub struct FailingAgent {
    pub name: String,
}

impl FailingAgent {
    pub fn boxed(name: &str) -> Box<dyn Agent> {
        Box::new(Self {
            name: name.to_string(),
        })
    }
}

impl Agent for FailingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, dataset: &MarketDataset) -> Result<Signal, ConclaveError> {
        dataset.require_column("does_not_exist", &self.name)?;
        unreachable!("require_column above always fails")
    }
}
