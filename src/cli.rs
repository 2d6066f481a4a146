//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{
    build_orchestrator, build_pipeline, load_runtime_config, RuntimeConfig,
};
use crate::domain::error::ConclaveError;
use crate::domain::signal::Consensus;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "conclave", about = "Technical-indicator consensus engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the feature pipeline and compute an agent consensus
    Consensus {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without touching market data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available under the configured data path
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Consensus {
            config,
            symbol,
            output,
        } => run_consensus(&config, symbol.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(&err)
        }
    }
}

fn load_config(path: &Path) -> Result<RuntimeConfig, ConclaveError> {
    let adapter =
        FileConfigAdapter::from_file(path).map_err(|e| ConclaveError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    load_runtime_config(&adapter)
}

fn run_consensus(
    config_path: &Path,
    symbol: Option<&str>,
    output: Option<&Path>,
) -> Result<(), ConclaveError> {
    let config = load_config(config_path)?;
    let symbol = symbol.unwrap_or(&config.symbol);

    let data_port = CsvAdapter::new(config.data_path.clone());
    let raw = data_port.fetch_dataset(symbol)?;
    info!(symbol, rows = raw.len(), "dataset loaded");

    let pipeline = build_pipeline(&config.features);
    let enriched = pipeline.generate(&raw)?;
    info!(
        rows = enriched.len(),
        features = ?pipeline.names(),
        "features generated"
    );

    let orchestrator = build_orchestrator(&config)?;
    let consensus = orchestrator.get_consensus(&enriched)?;

    print_consensus(&consensus)?;
    if let Some(path) = output {
        JsonReportAdapter.write(&consensus, &path.to_string_lossy())?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn print_consensus(consensus: &Consensus) -> Result<(), ConclaveError> {
    let json = serde_json::to_string_pretty(consensus).map_err(|e| ConclaveError::Report {
        reason: format!("failed to serialize consensus: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), ConclaveError> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config.features);
    let orchestrator = build_orchestrator(&config)?;

    println!(
        "configuration OK: {} feature(s) {:?}, {} agent(s) {:?}, threshold {}",
        pipeline.len(),
        pipeline.names(),
        orchestrator.agent_names().len(),
        orchestrator.agent_names(),
        orchestrator.activation_threshold()
    );
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), ConclaveError> {
    let config = load_config(config_path)?;
    let data_port = CsvAdapter::new(config.data_path);
    for symbol in data_port.list_symbols()? {
        println!("{}", symbol);
    }
    Ok(())
}
