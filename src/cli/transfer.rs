//! Export and import commands.

use crate::cli::common::{display_path, CliResult, GlobalOptions};
use crate::services::{export_profile, import_profiles};
use clap::Args;
use std::path::PathBuf;

/// Write one profile to a standalone JSON file
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Profile to export (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Import profiles from a JSON file
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// File written by `export` (or any profile store)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Replace profiles that already exist
    #[arg(long)]
    pub overwrite: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, registry) = global.open_registry()?;
        let name = match &self.profile {
            Some(name) => name.clone(),
            None => registry.active_profile().name.clone(),
        };

        export_profile(&registry, &name, &self.output)?;
        println!("Exported profile '{name}' to {}", display_path(&self.output));
        Ok(())
    }
}

impl ImportArgs {
    /// Execute the import command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        let names = import_profiles(&mut registry, &self.file, self.overwrite)?;

        if names.is_empty() {
            println!("No profiles found in {}", display_path(&self.file));
        } else {
            println!("Imported {} profile(s): {}", names.len(), names.join(", "));
            println!("Active profile: {}", registry.active_profile().name);
        }
        Ok(())
    }
}
