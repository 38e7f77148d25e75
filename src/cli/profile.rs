//! Profile management commands.
//!
//! Provides commands to list, create, delete and activate profiles.

use crate::cli::common::{print_json, CliResult, GlobalOptions};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Manage profiles
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Profile subcommand
    #[command(subcommand)]
    pub command: ProfileCommand,
}

/// Profile management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    /// List all profiles
    List(ListProfilesArgs),
    /// Create a profile and make it active
    Create(CreateProfileArgs),
    /// Delete a profile
    Delete(DeleteProfileArgs),
    /// Switch the active profile
    Use(UseProfileArgs),
}

/// List all profiles
#[derive(Debug, Clone, Args)]
pub struct ListProfilesArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a profile and make it active
#[derive(Debug, Clone, Args)]
pub struct CreateProfileArgs {
    /// Profile name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Delete a profile
#[derive(Debug, Clone, Args)]
pub struct DeleteProfileArgs {
    /// Profile name ("Default" cannot be deleted)
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Switch the active profile
#[derive(Debug, Clone, Args)]
pub struct UseProfileArgs {
    /// Profile name
    #[arg(value_name = "NAME")]
    pub name: String,
}

// JSON response types
#[derive(Debug, Serialize)]
struct ProfileItem {
    name: String,
    sounds: usize,
    active: bool,
}

#[derive(Debug, Serialize)]
struct ListProfilesResponse {
    active: String,
    profiles: Vec<ProfileItem>,
    count: usize,
}

impl ProfileArgs {
    /// Execute the profile command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            ProfileCommand::List(args) => args.execute(global),
            ProfileCommand::Create(args) => args.execute(global),
            ProfileCommand::Delete(args) => args.execute(global),
            ProfileCommand::Use(args) => args.execute(global),
        }
    }
}

impl ListProfilesArgs {
    /// Execute the list command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, registry) = global.open_registry()?;
        let active = registry.active_profile().name.clone();

        let profiles: Vec<ProfileItem> = registry
            .registry()
            .profiles()
            .iter()
            .map(|p| ProfileItem {
                name: p.name.clone(),
                sounds: p.len(),
                active: p.name == active,
            })
            .collect();

        let response = ListProfilesResponse {
            active,
            count: profiles.len(),
            profiles,
        };

        if self.json {
            print_json(&response)?;
        } else {
            println!("Profiles ({}):", response.count);
            println!();
            for profile in response.profiles {
                let marker = if profile.active { "*" } else { " " };
                println!("{marker} {:<30} {} sound(s)", profile.name, profile.sounds);
            }
        }

        Ok(())
    }
}

impl CreateProfileArgs {
    /// Execute the create command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        registry.create_profile(&self.name)?;
        println!("Created profile '{}' (now active)", self.name.trim());
        Ok(())
    }
}

impl DeleteProfileArgs {
    /// Execute the delete command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        registry.delete_profile(&self.name)?;
        println!(
            "Deleted profile '{}'. Active profile: {}",
            self.name,
            registry.active_profile().name
        );
        Ok(())
    }
}

impl UseProfileArgs {
    /// Execute the use command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        registry.set_active_profile(&self.name)?;
        println!("Active profile: {}", self.name);
        Ok(())
    }
}
