use clap::{Parser, Subcommand, ValueEnum};
use fleetscope_core::WorkloadReference;
use fleetscope_explorer::{default_registry, ExplorerError, ExplorerRegistry, ReplicaEstimate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fleetscope", about = "Workload replica and resource explorer")]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, env = "FLEETSCOPE_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report replicas and per-replica requirements of every workload in a manifest
    Explore {
        /// YAML or JSON manifest, may hold several documents
        #[arg(short, long)]
        file: PathBuf,
        /// Report format
        #[arg(short, long, value_enum, default_value = "yaml")]
        output: OutputFormat,
    },
    /// List the workload kinds that can be explored
    Kinds,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Exploration result for one workload of a manifest
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadReport {
    api_version: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(flatten)]
    estimate: ReplicaEstimate,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match cli.command {
        Commands::Explore { file, output } => run_explore(&file, output),
        Commands::Kinds => run_kinds(),
    }
}

/// Explore every workload in a manifest file and print the reports
fn run_explore(file: &Path, output: OutputFormat) -> miette::Result<()> {
    let reports = explore_manifest(file, default_registry())?;
    info!("Explored {} workloads from {}", reports.len(), file.display());

    let rendered = match output {
        OutputFormat::Json => fleetscope_core::to_json_pretty(&reports)?,
        OutputFormat::Yaml => fleetscope_core::to_yaml(&reports)?,
    };
    println!("{}", rendered);

    Ok(())
}

/// List registered kinds, one apiVersion/kind per line
fn run_kinds() -> miette::Result<()> {
    let mut kinds: Vec<_> = default_registry().kinds().collect();
    kinds.sort();

    for gvk in kinds {
        println!("{}", gvk);
    }

    Ok(())
}

/// Read a manifest and explore each document; unsupported kinds are skipped
fn explore_manifest(file: &Path, registry: &ExplorerRegistry) -> miette::Result<Vec<WorkloadReport>> {
    let data = std::fs::read_to_string(file)
        .map_err(|e| miette::miette!("Failed to read manifest '{}': {}", file.display(), e))?;

    let mut reports = Vec::new();
    for object in fleetscope_core::from_yaml_documents(&data)? {
        let workload = WorkloadReference::from_object(object)?;

        let estimate = match registry.explore(&workload) {
            Ok(estimate) => estimate,
            Err(ExplorerError::UnsupportedKind { gvk }) => {
                warn!("Skipping {}: no replica explorer registered for {}", workload, gvk);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        reports.push(WorkloadReport {
            api_version: workload.gvk().api_version(),
            kind: workload.gvk().kind.clone(),
            name: workload.name().map(str::to_string),
            namespace: workload.namespace().map(str::to_string),
            estimate,
        });
    }

    Ok(reports)
}
