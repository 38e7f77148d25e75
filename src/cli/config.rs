//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, GlobalOptions};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Master volume (0.0 to 1.0)
    #[arg(long, value_name = "VOLUME")]
    volume: Option<f32>,

    /// Maximum number of sounds per profile
    #[arg(long, value_name = "N")]
    max_sounds: Option<usize>,

    /// Buttons per row on the board
    #[arg(long, value_name = "N")]
    columns: Option<usize>,

    /// Profile store file
    #[arg(long = "store", value_name = "FILE")]
    store_file: Option<PathBuf>,

    /// Output device name (empty string resets to the system default)
    #[arg(long, value_name = "NAME")]
    device: Option<String>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    store_file: String,
    max_sounds_per_profile: usize,
    volume: f32,
    loop_playback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_device: Option<String>,
    grid_columns: usize,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(global),
            ConfigCommand::Set(args) => args.execute(global),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let config = global.config()?;
        let output = ConfigOutput {
            config_file: Config::config_file_path()
                .map(|p| p.to_string_lossy().to_string())
                .map_err(|e| CliError::io(format!("Failed to resolve config file: {e}")))?,
            store_file: global.store_path(&config)?.to_string_lossy().to_string(),
            max_sounds_per_profile: config.board.max_bindings_per_profile,
            volume: config.playback.volume,
            loop_playback: config.playback.loop_playback,
            output_device: config.playback.output_device.clone(),
            grid_columns: config.ui.grid_columns,
        };

        if self.json {
            print_json(&output)?;
        } else {
            output_human_readable(&output);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        if self.volume.is_none()
            && self.max_sounds.is_none()
            && self.columns.is_none()
            && self.store_file.is_none()
            && self.device.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --volume, --max-sounds, --columns, --store, or --device",
            ));
        }

        let mut config = global.config()?;

        if let Some(volume) = self.volume {
            config.playback.volume = volume;
        }
        if let Some(max) = self.max_sounds {
            config.board.max_bindings_per_profile = max;
        }
        if let Some(columns) = self.columns {
            config.ui.grid_columns = columns;
        }
        if let Some(path) = &self.store_file {
            config.paths.store_file = Some(path.clone());
        }
        if let Some(device) = &self.device {
            let device = device.trim();
            config.playback.output_device = (!device.is_empty()).then(|| device.to_string());
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(output: &ConfigOutput) {
    println!("Soundboard Configuration");
    println!("========================");
    println!();

    println!("Files:");
    println!("  Config File: {}", output.config_file);
    println!("  Profile Store: {}", output.store_file);
    println!();

    println!("Board:");
    println!("  Max Sounds per Profile: {}", output.max_sounds_per_profile);
    println!("  Grid Columns: {}", output.grid_columns);
    println!();

    println!("Playback:");
    println!("  Volume: {:.2}", output.volume);
    println!("  Loop: {}", if output.loop_playback { "on" } else { "off" });
    println!(
        "  Output Device: {}",
        output.output_device.as_deref().unwrap_or("(system default)")
    );
    println!();
}
