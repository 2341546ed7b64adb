use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, info, warn};

use tally_bootstrap::{run_standalone, RunOptions};
use tally_domain::RunMode;
use tally_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "tally", version)]
#[command(about = "Roll user events up into per-user daily summaries", long_about = None)]
struct Args {
    /// Input JSON file of events
    #[arg(short = 'i', long, value_name = "PATH", value_parser = NonEmptyStringValueParser::new())]
    input: String,

    /// Output JSON file of daily summaries
    #[arg(short = 'o', long, value_name = "PATH", value_parser = NonEmptyStringValueParser::new())]
    output: String,

    /// Merge into the existing output, skipping events counted before
    #[arg(long)]
    update: bool,

    /// Deduplication index file (overrides config)
    #[arg(long, value_name = "PATH")]
    index: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::MissingRequiredArgument | ErrorKind::InvalidValue => {
                println!("{}", Args::command().render_usage());
                return ExitCode::FAILURE;
            }
            _ => err.exit(),
        },
    };

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_tracing(&config) {
        eprintln!("Error initializing logging: {err:#}");
        return ExitCode::FAILURE;
    }
    match &config.source {
        Some(path) => info!("config loaded from {}", path.display()),
        None => warn!("config file not found, using defaults"),
    }

    let options = RunOptions {
        input: PathBuf::from(args.input),
        output: PathBuf::from(args.output),
        index: args
            .index
            .unwrap_or_else(|| PathBuf::from(&config.index_path)),
        mode: RunMode::from(args.update),
    };

    match run_standalone(&options) {
        Ok(outcome) => {
            info!(
                summaries = outcome.store.len(),
                indexed = outcome.indexed,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("run failed: {}", err);
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, or to `<log_dir>/tally.log` when configured. Stdout is
/// left for usage text.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))?;
    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::never(dir, "tally.log"))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
