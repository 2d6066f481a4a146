//! Domain error types.
//!
//! All fatal conditions propagate unmodified to the top-level caller. There is
//! no retry and no default substitution: a consensus is never produced from
//! corrupted or incomplete inputs.

/// Top-level error type for conclave.
#[derive(Debug, thiserror::Error)]
pub enum ConclaveError {
    #[error("the orchestrator requires at least one registered agent")]
    EmptyRoster,

    #[error("agent '{agent}' registered with negative weight {weight}")]
    NegativeWeight { agent: String, weight: f64 },

    #[error("total agent weight is zero; the consensus score would be undefined")]
    ZeroTotalWeight,

    #[error("activation threshold {value} is outside [0.0, 1.0]")]
    InvalidThreshold { value: f64 },

    #[error("confidence must be between 0.0 and 1.0, got {confidence} (agent '{agent}')")]
    InvalidConfidence { agent: String, confidence: f64 },

    #[error("column '{column}' missing from dataset (required by {needed_by})")]
    MissingColumn { column: String, needed_by: String },

    #[error("column '{column}' is already present in the dataset")]
    DuplicateColumn { column: String },

    #[error("column '{column}' has {actual} values but the dataset has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("agent '{agent}' failed during analysis: {source}")]
    AgentFailure {
        agent: String,
        #[source]
        source: Box<ConclaveError>,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ConclaveError> for std::process::ExitCode {
    fn from(err: &ConclaveError) -> Self {
        let code: u8 = match err {
            ConclaveError::Io(_) => 1,
            ConclaveError::ConfigParse { .. }
            | ConclaveError::ConfigMissing { .. }
            | ConclaveError::ConfigInvalid { .. } => 2,
            ConclaveError::Data { .. } | ConclaveError::Report { .. } => 3,
            ConclaveError::EmptyRoster
            | ConclaveError::NegativeWeight { .. }
            | ConclaveError::ZeroTotalWeight
            | ConclaveError::InvalidThreshold { .. }
            | ConclaveError::InvalidConfidence { .. } => 4,
            ConclaveError::MissingColumn { .. }
            | ConclaveError::DuplicateColumn { .. }
            | ConclaveError::ColumnLength { .. }
            | ConclaveError::AgentFailure { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
