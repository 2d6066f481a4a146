//! Consensus report output port trait.

use crate::domain::error::ConclaveError;
use crate::domain::signal::Consensus;

/// Port for exporting a consensus decision to an external reporting system.
pub trait ReportPort {
    fn write(&self, consensus: &Consensus, output_path: &str) -> Result<(), ConclaveError>;
}
