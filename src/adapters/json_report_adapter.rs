//! JSON consensus report adapter.
//!
//! Writes the consensus in the exact field contract the downstream dashboard
//! consumes: `Signal`, `Confiance`, `Log_Agents`, `Raw_Score`.

use crate::domain::error::ConclaveError;
use crate::domain::signal::Consensus;
use crate::ports::report_port::ReportPort;
use std::fs;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, consensus: &Consensus, output_path: &str) -> Result<(), ConclaveError> {
        let json = serde_json::to_string_pretty(consensus).map_err(|e| {
            ConclaveError::Report {
                reason: format!("failed to serialize consensus: {}", e),
            }
        })?;
        fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Action;
    use tempfile::TempDir;

    #[test]
    fn writes_dashboard_contract() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        let consensus = Consensus {
            action: Action::Sell,
            confidence: 0.9,
            agent_log: "[M1: SELL (90%)]".to_string(),
            raw_score: -0.9,
        };
        JsonReportAdapter
            .write(&consensus, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["Signal"], "SELL");
        assert_eq!(json["Confiance"], 0.9);
        assert_eq!(json["Log_Agents"], "[M1: SELL (90%)]");
        assert_eq!(json["Raw_Score"], -0.9);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let consensus = Consensus {
            action: Action::Wait,
            confidence: 0.0,
            agent_log: String::new(),
            raw_score: 0.0,
        };
        let err = JsonReportAdapter
            .write(&consensus, "/nonexistent/dir/report.json")
            .unwrap_err();
        assert!(matches!(err, ConclaveError::Io(_)));
    }
}
