//! Command-line front end for the Gathering community events store.
//!
//! Opens the event store over a snapshot file under the configured data
//! directory, runs one subcommand, and exits. Command output goes to stdout;
//! logs go to stderr.
//!
//! Exit codes: `0` success, `1` unexpected failure, `2` validation failure,
//! `3` unknown event id.

mod commands;
mod render;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gathering_core::{EventError, EventStore, FileStorage, GatheringConfig, LogFormat};
use gathering_core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, execute};
use crate::render::ConsoleNotifier;

/// Config file read when `--config` is not given. Optional.
const DEFAULT_CONFIG_PATH: &str = "gathering.yaml";

#[derive(Parser)]
#[command(name = "gathering")]
#[command(about = "Manage community events")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// An explicit `--config` must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> anyhow::Result<GatheringConfig> {
    match path {
        Some(path) => GatheringConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => GatheringConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
            .with_context(|| format!("loading {DEFAULT_CONFIG_PATH}")),
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn run(command: Command, config: &GatheringConfig) -> anyhow::Result<()> {
    let storage = FileStorage::new(&config.storage.data_dir);
    let mut store = EventStore::open_with(
        storage,
        config.storage.key.as_str(),
        config.storage.empty_slot(),
    )
    .with_notifier(ConsoleNotifier);

    let mut stdout = std::io::stdout().lock();
    execute(&mut store, command, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<EventError>() {
        Some(EventError::ValidationFailed(errors)) => {
            eprintln!("{}", render::field_report(errors));
            ExitCode::from(2)
        }
        Some(EventError::NotFound(id)) => {
            eprintln!("error: no event with id {id}");
            ExitCode::from(3)
        }
        _ => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
