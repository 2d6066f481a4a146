//! Signal model: agent opinions and the aggregated consensus.

use crate::domain::error::ConclaveError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Authorized trade decisions. The polarity doubles as the multiplicative
/// sign in the consensus score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Wait,
}

impl Action {
    /// BUY = +1, SELL = -1, WAIT = 0.
    pub fn polarity(&self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
            Action::Wait => 0.0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Wait => "WAIT",
        };
        write!(f, "{}", name)
    }
}

/// One agent's opinion for one evaluation.
///
/// The constructor rejects confidence outside `[0.0, 1.0]`, so an invalid
/// signal cannot exist.
#[derive(Debug, Clone)]
pub struct Signal {
    agent: String,
    action: Action,
    confidence: f64,
    metadata: HashMap<String, serde_json::Value>,
}

impl Signal {
    pub fn new(
        agent: impl Into<String>,
        action: Action,
        confidence: f64,
    ) -> Result<Self, ConclaveError> {
        let agent = agent.into();
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConclaveError::InvalidConfidence { agent, confidence });
        }
        Ok(Self {
            agent,
            action,
            confidence,
            metadata: HashMap::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn metadata(&self) -> &HashMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Bracketed per-agent summary used in the consensus log, e.g.
    /// `[trend: BUY (80%)]`.
    pub fn log_entry(&self) -> String {
        format!(
            "[{}: {} ({:.0}%)]",
            self.agent,
            self.action,
            self.confidence * 100.0
        )
    }
}

/// The final aggregated decision.
///
/// Serializes to the exact shape the downstream dashboard consumes:
/// `Signal` / `Confiance` / `Log_Agents` / `Raw_Score`. Field names and
/// rounding (2 decimals for confidence, 4 for the raw score) are a hard
/// compatibility surface.
#[derive(Debug, Clone, Serialize)]
pub struct Consensus {
    #[serde(rename = "Signal")]
    pub action: Action,
    #[serde(rename = "Confiance")]
    pub confidence: f64,
    #[serde(rename = "Log_Agents")]
    pub agent_log: String,
    #[serde(rename = "Raw_Score")]
    pub raw_score: f64,
}
