//! MDP Ingest - channel ingestion tool

use anyhow::Result;
use clap::Parser;
use mdp_common::logging::{init_logging, LogConfig, LogLevel};
use mdp_ingest::{
    checkpoint::CheckpointStore, cleaner::DataCleaner, config::IngestConfig, media::MediaStore,
    orchestrator::IngestOrchestrator, registry::ChannelRegistry, sink::CsvRecordSink,
    source::HttpMessageSource,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mdp-ingest")]
#[command(author, version, about = "MDP channel ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Ingest all configured channels
    Run {
        /// Ignore the checkpoint file and start every channel from zero
        #[arg(long)]
        no_checkpoint: bool,
    },

    /// Clean the record log into a normalized, deduplicated copy
    Clean {
        /// Input record log (defaults to the configured one)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the cleaned copy
        #[arg(short, long, default_value = "./data/records_cleaned.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("mdp-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let config = IngestConfig::from_env()?;

    match cli.command {
        Command::Run { no_checkpoint } => {
            info!("Starting ingestion run");

            let registry = ChannelRegistry::from_config(&config);
            let source = HttpMessageSource::new(&config.api)?;
            let sink = CsvRecordSink::open(&config.paths.record_log)?;
            let media = MediaStore::new(&config.paths.media_root, &config.api)?;

            let checkpoints = if no_checkpoint || !config.checkpointing {
                info!("Checkpointing disabled, all channels start from zero");
                None
            } else {
                Some(CheckpointStore::load(&config.paths.checkpoint_file)?)
            };

            let mut orchestrator = IngestOrchestrator::new(
                registry,
                source,
                sink,
                media,
                checkpoints,
                config.fetch_limit,
            );

            let report = orchestrator.run().await;

            if !report.is_clean() {
                anyhow::bail!(
                    "{} of {} channels failed (see log for per-channel errors)",
                    report.failed(),
                    report.channels.len()
                );
            }
        },
        Command::Clean { input, output } => {
            let input = input.unwrap_or_else(|| config.paths.record_log.clone());
            info!("Cleaning record log");

            let stats = DataCleaner::new(&input, &output).run()?;
            info!(
                read = stats.rows_read,
                dropped = stats.rows_dropped,
                duplicates = stats.duplicates_removed,
                written = stats.rows_written,
                "clean complete"
            );
        },
    }

    Ok(())
}
