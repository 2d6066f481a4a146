//! Consensus orchestrator: fans a dataset out to every registered agent and
//! folds their weighted signals into one decision.
//!
//! The roster is fixed at construction. Agents run strictly in registration
//! order; the order is a user-visible contract through the log line, not an
//! implementation detail. The first agent error aborts the whole evaluation;
//! partial results are never returned.

use crate::domain::agent::Agent;
use crate::domain::dataset::MarketDataset;
use crate::domain::error::ConclaveError;
use crate::domain::signal::{Action, Consensus};
use tracing::debug;

pub const DEFAULT_ACTIVATION_THRESHOLD: f64 = 0.4;

pub struct Orchestrator {
    roster: Vec<(Box<dyn Agent>, f64)>,
    activation_threshold: f64,
    total_weight: f64,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("roster", &self.roster.len())
            .field("activation_threshold", &self.activation_threshold)
            .field("total_weight", &self.total_weight)
            .finish()
    }
}

impl Orchestrator {
    /// Build an orchestrator over an ordered `(agent, weight)` roster.
    ///
    /// Fails fast on configurations that could never produce a sound
    /// consensus: an empty roster, a negative weight, an all-zero total
    /// weight, or a threshold outside [0, 1].
    pub fn new(
        roster: Vec<(Box<dyn Agent>, f64)>,
        activation_threshold: f64,
    ) -> Result<Self, ConclaveError> {
        if roster.is_empty() {
            return Err(ConclaveError::EmptyRoster);
        }
        if !(0.0..=1.0).contains(&activation_threshold) {
            return Err(ConclaveError::InvalidThreshold {
                value: activation_threshold,
            });
        }
        for (agent, weight) in &roster {
            if *weight < 0.0 {
                return Err(ConclaveError::NegativeWeight {
                    agent: agent.name().to_string(),
                    weight: *weight,
                });
            }
        }
        let total_weight: f64 = roster.iter().map(|(_, weight)| weight).sum();
        if total_weight == 0.0 {
            return Err(ConclaveError::ZeroTotalWeight);
        }

        Ok(Self {
            roster,
            activation_threshold,
            total_weight,
        })
    }

    pub fn activation_threshold(&self) -> f64 {
        self.activation_threshold
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.roster.iter().map(|(agent, _)| agent.name()).collect()
    }

    /// Query every agent and compute the final decision. Stateless: each call
    /// is a pure aggregation over the roster and the supplied dataset.
    pub fn get_consensus(&self, dataset: &MarketDataset) -> Result<Consensus, ConclaveError> {
        // Signal collection, fail fast if an agent crashes. Each agent gets
        // its own copy of the dataset so none can corrupt another's view.
        let mut signals = Vec::with_capacity(self.roster.len());
        for (agent, _) in &self.roster {
            let isolated = dataset.clone();
            let signal =
                agent
                    .analyze(&isolated)
                    .map_err(|source| ConclaveError::AgentFailure {
                        agent: agent.name().to_string(),
                        source: Box::new(source),
                    })?;
            debug!(
                agent = agent.name(),
                action = %signal.action(),
                confidence = signal.confidence(),
                "signal collected"
            );
            signals.push(signal);
        }

        // Weighted average over the static roster, independent of which
        // actions fired.
        let mut weighted_score = 0.0;
        let mut log_entries = Vec::with_capacity(signals.len());
        for ((_, weight), signal) in self.roster.iter().zip(&signals) {
            weighted_score += signal.action().polarity() * signal.confidence() * weight;
            log_entries.push(signal.log_entry());
        }

        let final_score = weighted_score / self.total_weight;
        let abs_confidence = final_score.abs();

        let action = if abs_confidence >= self.activation_threshold {
            if final_score > 0.0 {
                Action::Buy
            } else {
                Action::Sell
            }
        } else {
            Action::Wait
        };

        Ok(Consensus {
            action,
            confidence: round_to(abs_confidence, 2),
            agent_log: log_entries.join(" | "),
            raw_score: round_to(final_score, 4),
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
