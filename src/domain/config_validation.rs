//! Runtime configuration: parsing and validation of feature and agent
//! definitions, and assembly of the pipeline and orchestrator they describe.
//!
//! Feature definitions use the `KIND_WINDOW` form the feature columns
//! themselves are named with (`SMA_20`, `RSI_14`), optionally suffixed with
//! `@column` to read something other than `close`. Agents live in
//! `[agent.NAME]` sections listed under `[orchestrator] agents`.

use std::path::PathBuf;

use crate::domain::agent::Agent;
use crate::domain::agent::trend::TrendAgent;
use crate::domain::error::ConclaveError;
use crate::domain::feature::ema::EmaFeature;
use crate::domain::feature::rsi::RsiFeature;
use crate::domain::feature::sma::SmaFeature;
use crate::domain::feature::{FeatureModule, FeaturePipeline};
use crate::domain::orchestrator::{DEFAULT_ACTIVATION_THRESHOLD, Orchestrator};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SOURCE_COLUMN: &str = "close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Sma,
    Ema,
    Rsi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDef {
    pub kind: FeatureKind,
    pub window: usize,
    pub column: String,
}

impl FeatureDef {
    pub fn instantiate(&self) -> Box<dyn FeatureModule> {
        match self.kind {
            FeatureKind::Sma => Box::new(SmaFeature::new(self.window, &self.column)),
            FeatureKind::Ema => Box::new(EmaFeature::new(self.window, &self.column)),
            FeatureKind::Rsi => Box::new(RsiFeature::new(self.window, &self.column)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentDef {
    pub name: String,
    pub fast: String,
    pub slow: String,
    pub weight: f64,
}

impl AgentDef {
    pub fn instantiate(&self) -> Box<dyn Agent> {
        Box::new(TrendAgent::new(&self.name, &self.fast, &self.slow))
    }
}

/// Everything a consensus run needs, parsed and validated.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_path: PathBuf,
    pub symbol: String,
    pub features: Vec<FeatureDef>,
    pub agents: Vec<AgentDef>,
    pub activation_threshold: f64,
}

fn invalid(key: &str, reason: String) -> ConclaveError {
    ConclaveError::ConfigInvalid {
        section: "pipeline".to_string(),
        key: key.to_string(),
        reason,
    }
}

/// Parse one feature definition like `SMA_20` or `EMA_12@open`.
pub fn parse_feature_def(text: &str) -> Result<FeatureDef, ConclaveError> {
    let (head, column) = match text.split_once('@') {
        Some((head, column)) => (head.trim(), column.trim()),
        None => (text.trim(), DEFAULT_SOURCE_COLUMN),
    };
    if column.is_empty() {
        return Err(invalid(
            "features",
            format!("'{}': empty source column", text),
        ));
    }

    let Some((kind_text, window_text)) = head.split_once('_') else {
        return Err(invalid(
            "features",
            format!("'{}': expected KIND_WINDOW, e.g. SMA_20", text),
        ));
    };

    let kind = match kind_text.to_ascii_uppercase().as_str() {
        "SMA" => FeatureKind::Sma,
        "EMA" => FeatureKind::Ema,
        "RSI" => FeatureKind::Rsi,
        other => {
            return Err(invalid(
                "features",
                format!("'{}': unknown feature kind '{}'", text, other),
            ));
        }
    };

    let window: usize = window_text.parse().map_err(|_| {
        invalid(
            "features",
            format!("'{}': window '{}' is not a number", text, window_text),
        )
    })?;
    if window == 0 {
        return Err(invalid(
            "features",
            format!("'{}': window must be at least 1", text),
        ));
    }

    Ok(FeatureDef {
        kind,
        window,
        column: column.to_string(),
    })
}

/// Load and validate the full runtime configuration from a config source.
pub fn load_runtime_config(cfg: &dyn ConfigPort) -> Result<RuntimeConfig, ConclaveError> {
    let missing = |section: &str, key: &str| ConclaveError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    };

    let data_path = cfg
        .get_string("data", "path")
        .ok_or_else(|| missing("data", "path"))?;
    let symbol = cfg
        .get_string("data", "symbol")
        .ok_or_else(|| missing("data", "symbol"))?;

    let feature_texts = cfg.get_list("pipeline", "features");
    if feature_texts.is_empty() {
        return Err(missing("pipeline", "features"));
    }
    let features = feature_texts
        .iter()
        .map(|text| parse_feature_def(text))
        .collect::<Result<Vec<_>, _>>()?;

    let activation_threshold = cfg.get_double(
        "orchestrator",
        "activation_threshold",
        DEFAULT_ACTIVATION_THRESHOLD,
    );

    let agent_names = cfg.get_list("orchestrator", "agents");
    if agent_names.is_empty() {
        return Err(missing("orchestrator", "agents"));
    }

    let mut agents = Vec::with_capacity(agent_names.len());
    for name in &agent_names {
        let section = format!("agent.{}", name);
        let kind = cfg
            .get_string(&section, "kind")
            .unwrap_or_else(|| "trend".to_string());
        if kind != "trend" {
            return Err(ConclaveError::ConfigInvalid {
                section: section.clone(),
                key: "kind".to_string(),
                reason: format!("unknown agent kind '{}'", kind),
            });
        }

        let fast = cfg
            .get_string(&section, "fast")
            .ok_or_else(|| missing(&section, "fast"))?;
        let slow = cfg
            .get_string(&section, "slow")
            .ok_or_else(|| missing(&section, "slow"))?;
        let weight = cfg.get_double(&section, "weight", 1.0);
        if weight < 0.0 {
            return Err(ConclaveError::ConfigInvalid {
                section: section.clone(),
                key: "weight".to_string(),
                reason: format!("weight {} is negative", weight),
            });
        }

        agents.push(AgentDef {
            name: name.clone(),
            fast,
            slow,
            weight,
        });
    }

    Ok(RuntimeConfig {
        data_path: PathBuf::from(data_path),
        symbol,
        features,
        agents,
        activation_threshold,
    })
}

pub fn build_pipeline(defs: &[FeatureDef]) -> FeaturePipeline {
    let mut pipeline = FeaturePipeline::new();
    for def in defs {
        pipeline.add_feature(def.instantiate());
    }
    pipeline
}

pub fn build_orchestrator(config: &RuntimeConfig) -> Result<Orchestrator, ConclaveError> {
    let roster = config
        .agents
        .iter()
        .map(|def| (def.instantiate(), def.weight))
        .collect();
    Orchestrator::new(roster, config.activation_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StubConfig {
        values: HashMap<(String, String), String>,
    }

    impl StubConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            let values = entries
                .iter()
                .map(|(section, key, value)| {
                    ((section.to_string(), key.to_string()), value.to_string())
                })
                .collect();
            Self { values }
        }
    }

    impl ConfigPort for StubConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn full_config() -> StubConfig {
        StubConfig::new(&[
            ("data", "path", "./data"),
            ("data", "symbol", "BHP"),
            ("pipeline", "features", "SMA_20, SMA_50, RSI_14"),
            ("orchestrator", "activation_threshold", "0.4"),
            ("orchestrator", "agents", "trend"),
            ("agent.trend", "fast", "SMA_20"),
            ("agent.trend", "slow", "SMA_50"),
            ("agent.trend", "weight", "1.5"),
        ])
    }

    #[test]
    fn parse_simple_feature_def() {
        let def = parse_feature_def("SMA_20").unwrap();
        assert_eq!(
            def,
            FeatureDef {
                kind: FeatureKind::Sma,
                window: 20,
                column: "close".into()
            }
        );
    }

    #[test]
    fn parse_feature_def_with_source_column() {
        let def = parse_feature_def("EMA_12@open").unwrap();
        assert_eq!(def.kind, FeatureKind::Ema);
        assert_eq!(def.window, 12);
        assert_eq!(def.column, "open");
    }

    #[test]
    fn parse_feature_def_case_insensitive_kind() {
        assert_eq!(parse_feature_def("rsi_14").unwrap().kind, FeatureKind::Rsi);
    }

    #[test]
    fn parse_feature_def_rejects_unknown_kind() {
        let err = parse_feature_def("MACD_12").unwrap_err();
        assert!(err.to_string().contains("unknown feature kind"));
    }

    #[test]
    fn parse_feature_def_rejects_zero_window() {
        let err = parse_feature_def("SMA_0").unwrap_err();
        assert!(err.to_string().contains("window must be at least 1"));
    }

    #[test]
    fn parse_feature_def_rejects_missing_window() {
        assert!(parse_feature_def("SMA").is_err());
        assert!(parse_feature_def("SMA_abc").is_err());
    }

    #[test]
    fn instantiated_module_names_match_defs() {
        let sma = parse_feature_def("SMA_20").unwrap().instantiate();
        assert_eq!(sma.name(), "SMA_20");
        let rsi = parse_feature_def("rsi_14").unwrap().instantiate();
        assert_eq!(rsi.name(), "RSI_14");
    }

    #[test]
    fn load_full_runtime_config() {
        let config = load_runtime_config(&full_config()).unwrap();
        assert_eq!(config.symbol, "BHP");
        assert_eq!(config.features.len(), 3);
        assert_eq!(config.activation_threshold, 0.4);
        assert_eq!(config.agents.len(), 1);
        assert_eq!(config.agents[0].fast, "SMA_20");
        assert_eq!(config.agents[0].weight, 1.5);
    }

    #[test]
    fn missing_features_key_is_an_error() {
        let cfg = StubConfig::new(&[("data", "path", "./data"), ("data", "symbol", "BHP")]);
        let err = load_runtime_config(&cfg).unwrap_err();
        assert!(matches!(err, ConclaveError::ConfigMissing { .. }));
    }

    #[test]
    fn missing_agent_column_is_an_error() {
        let cfg = StubConfig::new(&[
            ("data", "path", "./data"),
            ("data", "symbol", "BHP"),
            ("pipeline", "features", "SMA_20"),
            ("orchestrator", "agents", "trend"),
            ("agent.trend", "fast", "SMA_20"),
        ]);
        let err = load_runtime_config(&cfg).unwrap_err();
        match err {
            ConclaveError::ConfigMissing { section, key } => {
                assert_eq!(section, "agent.trend");
                assert_eq!(key, "slow");
            }
            other => panic!("expected ConfigMissing, got {:?}", other),
        }
    }

    #[test]
    fn negative_agent_weight_is_an_error() {
        let cfg = StubConfig::new(&[
            ("data", "path", "./data"),
            ("data", "symbol", "BHP"),
            ("pipeline", "features", "SMA_20"),
            ("orchestrator", "agents", "trend"),
            ("agent.trend", "fast", "SMA_20"),
            ("agent.trend", "slow", "SMA_50"),
            ("agent.trend", "weight", "-2.0"),
        ]);
        let err = load_runtime_config(&cfg).unwrap_err();
        assert!(matches!(err, ConclaveError::ConfigInvalid { .. }));
    }

    #[test]
    fn unknown_agent_kind_is_an_error() {
        let cfg = StubConfig::new(&[
            ("data", "path", "./data"),
            ("data", "symbol", "BHP"),
            ("pipeline", "features", "SMA_20"),
            ("orchestrator", "agents", "mystery"),
            ("agent.mystery", "kind", "oracle"),
            ("agent.mystery", "fast", "SMA_20"),
            ("agent.mystery", "slow", "SMA_50"),
        ]);
        let err = load_runtime_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("unknown agent kind"));
    }

    #[test]
    fn build_pipeline_preserves_order() {
        let config = load_runtime_config(&full_config()).unwrap();
        let pipeline = build_pipeline(&config.features);
        assert_eq!(pipeline.names(), vec!["SMA_20", "SMA_50", "RSI_14"]);
    }

    #[test]
    fn build_orchestrator_from_config() {
        let config = load_runtime_config(&full_config()).unwrap();
        let orch = build_orchestrator(&config).unwrap();
        assert_eq!(orch.agent_names(), vec!["trend"]);
        assert_eq!(orch.activation_threshold(), 0.4);
    }

    #[test]
    fn threshold_defaults_when_absent() {
        let cfg = StubConfig::new(&[
            ("data", "path", "./data"),
            ("data", "symbol", "BHP"),
            ("pipeline", "features", "SMA_20"),
            ("orchestrator", "agents", "trend"),
            ("agent.trend", "fast", "SMA_20"),
            ("agent.trend", "slow", "SMA_50"),
        ]);
        let config = load_runtime_config(&cfg).unwrap();
        assert_eq!(config.activation_threshold, DEFAULT_ACTIVATION_THRESHOLD);
    }
}
