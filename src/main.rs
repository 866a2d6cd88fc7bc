use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use logship::config::PipelineConfig;
use logship::error::LogshipResult;
use logship::runner;
use logship::state::Stage;

#[derive(Parser)]
#[command(
    name = "logship",
    version,
    about = "Batch pipeline for daily web server access logs"
)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the source log and artifacts
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// IP address dropped by the filter stage
    #[arg(long, global = true)]
    blocked_ip: Option<String>,

    /// Endpoint receiving the completion notification
    #[arg(long, global = true)]
    webhook_url: Option<String>,

    /// Notification timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the whole pipeline: scan, extract, filter, archive, notify
    Run,
    /// Check that the source log exists
    Scan,
    /// Extract one IP address per log line
    Extract,
    /// Drop the blocked address from the extracted data
    Filter,
    /// Pack the filtered data into a tar archive
    Archive,
    /// Send the completion notification
    Notify,
}

fn resolve_config(cli: &Cli) -> LogshipResult<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(blocked_ip) = &cli.blocked_ip {
        config.blocked_ip = blocked_ip.clone();
    }
    if let Some(webhook_url) = &cli.webhook_url {
        config.webhook_url = webhook_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    Ok(config)
}

fn run_single(config: &PipelineConfig, stage: Stage) -> LogshipResult<bool> {
    let pipeline = runner::stage_pipeline(stage);
    let mut context = runner::seed_context(config);
    let result = pipeline.execute(&mut context)?;
    Ok(result.success)
}

fn execute(cli: &Cli) -> LogshipResult<bool> {
    let config = resolve_config(cli)?;

    match cli.command {
        Command::Run => {
            let (result, _state) = runner::run(&config)?;
            Ok(result.success)
        }
        Command::Scan => run_single(&config, Stage::Checking),
        Command::Extract => run_single(&config, Stage::Extracting),
        Command::Filter => run_single(&config, Stage::Filtering),
        Command::Archive => run_single(&config, Stage::Archiving),
        Command::Notify => run_single(&config, Stage::Notifying),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "logship failed");
            ExitCode::FAILURE
        }
    }
}
