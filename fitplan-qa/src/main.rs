//! fitplan-qa - sequence quality checks for fitness class plans
//!
//! Analyzes a movement sequence (from a JSON file or a stored class) for
//! consecutive muscle-group overlap and prints the report to stdout.
//! Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitplan_common::config::{
    load_toml_config_with_source, resolve_database_path, ReportFormat, TomlConfig,
};
use fitplan_common::db::{LazySqliteStore, PlanStore};
use fitplan_common::models::parse_sequence_str;
use fitplan_qa::{default_registry, report, ClassQaService, SequenceQualityAnalyzer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Command-line arguments for fitplan-qa
#[derive(Parser, Debug)]
#[command(name = "fitplan-qa")]
#[command(about = "Sequence quality checks for fitness class plans")]
#[command(version)]
struct Args {
    /// TOML configuration file (defaults to the platform config directory)
    #[arg(short, long, env = "FITPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides FITPLAN_DATABASE and the config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Report format: markdown or json
    #[arg(short, long, env = "FITPLAN_FORMAT")]
    format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a JSON array of movements
    Analyze {
        /// Path to the sequence JSON file
        file: PathBuf,
    },
    /// Store a JSON sequence as a new class plan
    Import {
        /// Path to the sequence JSON file
        file: PathBuf,
        /// Class title
        #[arg(short, long)]
        title: String,
    },
    /// Print the QA report for a stored class
    Class {
        /// Class plan id
        class_id: Uuid,
    },
    /// List registered tools
    Tools,
    /// Execute a registered tool and print its JSON output
    RunTool {
        /// Tool id
        id: String,
        /// Tool parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before the subscriber exists; its source is logged after init
    let (config, config_source) = load_toml_config_with_source(args.config.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting fitplan-qa v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let format = match &args.format {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => config.report.format,
    };

    match args.command {
        Command::Analyze { file } => {
            let sequence = read_sequence(&file)?;
            let report = SequenceQualityAnalyzer::new()
                .analyze(&sequence)
                .context("Sequence analysis failed")?;
            println!("{}", report::render(&report, format)?);
        }
        Command::Import { file, title } => {
            let sequence = read_sequence(&file)?;
            let store = open_store(args.database, &config);
            let plan = store
                .import_class(&title, &sequence)
                .await
                .context("Failed to store class")?;
            info!("Stored class '{}' with {} movements", plan.title, plan.movement_ids.len());
            println!("{}", plan.id);
        }
        Command::Class { class_id } => {
            let store = open_store(args.database, &config);
            let service = ClassQaService::new(store);
            let qa = service.report_for_class(class_id).await?;
            println!("{}", qa.render(format)?);
        }
        Command::Tools => {
            // Listing never touches the database
            let registry = default_registry(open_store(args.database, &config))?;
            for tool in registry.descriptors() {
                println!("{:<24} {}", tool.id, tool.summary);
            }
        }
        Command::RunTool { id, params } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).context("--params is not valid JSON")?;
            let registry = default_registry(open_store(args.database, &config))?;
            let output = registry.execute(&id, params).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn read_sequence(file: &std::path::Path) -> Result<Vec<fitplan_common::Movement>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(parse_sequence_str(&text)?)
}

/// Store handle for the resolved path; the file is opened on first use
fn open_store(cli_path: Option<PathBuf>, config: &TomlConfig) -> Arc<dyn PlanStore> {
    let db_path = resolve_database_path(cli_path.as_deref(), config);
    info!("Database path: {}", db_path.display());
    Arc::new(LazySqliteStore::new(db_path))
}
