//! Soundboard - terminal soundboard with hotkeys and profiles
//!
//! Without a subcommand the interactive board opens. Subcommands give
//! headless, scriptable access to the same profiles.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use soundboard::cli::{
    CliResult, ConfigArgs, DevicesArgs, ExitCode, ExportArgs, GlobalOptions, ImportArgs,
    ProfileArgs, SoundArgs,
};
use soundboard::config::Config;
use soundboard::tui;

/// Soundboard - play sounds from hotkeys, organised in profiles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Profile store file (overrides the configured one)
    #[arg(long, value_name = "FILE", global = true)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage profiles
    Profile(ProfileArgs),
    /// Manage and play sounds
    Sound(SoundArgs),
    /// Export a profile to a JSON file
    Export(ExportArgs),
    /// Import profiles from a JSON file
    Import(ImportArgs),
    /// View and change configuration
    Config(ConfigArgs),
    /// List audio output devices
    Devices(DevicesArgs),
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalOptions {
        store: cli.store.clone(),
    };

    match cli.command {
        Some(command) => {
            init_stderr_logging(cli.verbose);
            if let Err(err) = run_command(command, &global) {
                eprintln!("Error: {err}");
                std::process::exit(err.exit_code());
            }
        }
        None => {
            if let Err(err) = run_board(&global, cli.verbose) {
                eprintln!("Error: {err:#}");
                std::process::exit(ExitCode::IoError as i32);
            }
        }
    }
}

fn run_command(command: Commands, global: &GlobalOptions) -> CliResult<()> {
    match command {
        Commands::Profile(args) => args.execute(global),
        Commands::Sound(args) => args.execute(global),
        Commands::Export(args) => args.execute(global),
        Commands::Import(args) => args.execute(global),
        Commands::Config(args) => args.execute(global),
        Commands::Devices(args) => args.execute(),
    }
}

fn run_board(global: &GlobalOptions, verbose: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store_path = match &global.store {
        Some(path) => path.clone(),
        None => config.store_path()?,
    };

    init_file_logging(verbose)?;
    tui::run(config, store_path)
}

fn env_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into())
}

fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// The board owns the terminal, so its logs go to a file.
fn init_file_logging(verbose: bool) -> Result<()> {
    let path = Config::log_file_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
