//! Sound management and playback commands.
//!
//! Provides commands to list, add, remove, rename and play the sounds of a
//! profile. `--profile` defaults to the active profile everywhere.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Subcommand};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::cli::common::{display_path, print_json, resolve_profile, CliError, CliResult, GlobalOptions};
use crate::models::{Hotkey, SoundBinding};
use crate::playback::{self, PlaybackAdapter};
use crate::services::HotkeyUpdate;

/// How often `sound play` checks whether the clip finished.
const PLAYBACK_POLL: Duration = Duration::from_millis(50);

/// Manage and play sounds
#[derive(Debug, Clone, Args)]
pub struct SoundArgs {
    /// Sound subcommand
    #[command(subcommand)]
    pub command: SoundCommand,
}

/// Sound subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum SoundCommand {
    /// List the sounds of a profile
    List(ListSoundsArgs),
    /// Bind a sound file to a new button
    Add(AddSoundArgs),
    /// Remove a sound
    Remove(RemoveSoundArgs),
    /// Rename a sound and/or change its hotkey
    Rename(RenameSoundArgs),
    /// Play a sound and wait until it ends
    Play(PlaySoundArgs),
    /// Play a random sound of a profile
    Random(RandomSoundArgs),
}

/// List the sounds of a profile
#[derive(Debug, Clone, Args)]
pub struct ListSoundsArgs {
    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Only show sounds whose name contains this text
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Bind a sound file to a new button
#[derive(Debug, Clone, Args)]
pub struct AddSoundArgs {
    /// Button name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Audio file (wav, mp3, ogg or flac)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Hotkey, e.g. F1 or Ctrl+1
    #[arg(short, long, value_name = "HOTKEY")]
    pub key: Option<String>,

    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,
}

/// Remove a sound
#[derive(Debug, Clone, Args)]
pub struct RemoveSoundArgs {
    /// Button name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,
}

/// Rename a sound and/or change its hotkey
#[derive(Debug, Clone, Args)]
pub struct RenameSoundArgs {
    /// Current button name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// New button name
    #[arg(long, value_name = "NEW_NAME")]
    pub to: Option<String>,

    /// New hotkey
    #[arg(short, long, value_name = "HOTKEY", conflicts_with = "clear_key")]
    pub key: Option<String>,

    /// Remove the hotkey
    #[arg(long)]
    pub clear_key: bool,

    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,
}

/// Play a sound and wait until it ends
#[derive(Debug, Clone, Args)]
pub struct PlaySoundArgs {
    /// Button name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Volume from 0.0 to 1.0 (defaults to the configured volume)
    #[arg(long, value_name = "VOLUME")]
    pub volume: Option<f32>,

    /// Loop until interrupted (Ctrl-C)
    #[arg(long = "loop")]
    pub looping: bool,
}

/// Play a random sound of a profile
#[derive(Debug, Clone, Args)]
pub struct RandomSoundArgs {
    /// Profile (defaults to the active profile)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Volume from 0.0 to 1.0 (defaults to the configured volume)
    #[arg(long, value_name = "VOLUME")]
    pub volume: Option<f32>,
}

// JSON response types
#[derive(Debug, Serialize)]
struct SoundItem {
    name: String,
    file: String,
    key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListSoundsResponse {
    profile: String,
    sounds: Vec<SoundItem>,
    count: usize,
}

impl From<&SoundBinding> for SoundItem {
    fn from(binding: &SoundBinding) -> Self {
        Self {
            name: binding.name.clone(),
            file: display_path(&binding.file),
            key: binding.hotkey.map(|h| h.to_string()),
        }
    }
}

impl SoundArgs {
    /// Execute the sound command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            SoundCommand::List(args) => args.execute(global),
            SoundCommand::Add(args) => args.execute(global),
            SoundCommand::Remove(args) => args.execute(global),
            SoundCommand::Rename(args) => args.execute(global),
            SoundCommand::Play(args) => args.execute(global),
            SoundCommand::Random(args) => args.execute(global),
        }
    }
}

impl ListSoundsArgs {
    /// Execute the list command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?;

        let sounds: Vec<SoundItem> = profile
            .filter(self.filter.as_deref().unwrap_or_default())
            .into_iter()
            .map(SoundItem::from)
            .collect();

        let response = ListSoundsResponse {
            profile: profile.name.clone(),
            count: sounds.len(),
            sounds,
        };

        if self.json {
            print_json(&response)?;
        } else if response.count == 0 {
            println!("No sounds in profile '{}'.", response.profile);
        } else {
            println!("Sounds in '{}' ({}):", response.profile, response.count);
            println!();
            for sound in response.sounds {
                println!(
                    "  {:<24} {:<14} {}",
                    sound.name,
                    sound.key.unwrap_or_else(|| "-".to_string()),
                    sound.file
                );
            }
        }

        Ok(())
    }
}

impl AddSoundArgs {
    /// Execute the add command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?.name.clone();

        registry.add_binding(&profile, &self.name, &self.file, self.key.as_deref())?;
        println!("Added '{}' to profile '{profile}'", self.name.trim());
        Ok(())
    }
}

impl RemoveSoundArgs {
    /// Execute the remove command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (_, mut registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?.name.clone();

        registry.remove_binding(&profile, &self.name)?;
        println!("Removed '{}' from profile '{profile}'", self.name);
        Ok(())
    }
}

impl RenameSoundArgs {
    /// Execute the rename command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let hotkey = match (&self.key, self.clear_key) {
            (Some(key), _) => HotkeyUpdate::Set(key.parse::<Hotkey>()?),
            (None, true) => HotkeyUpdate::Clear,
            (None, false) => HotkeyUpdate::Keep,
        };
        if self.to.is_none() && hotkey == HotkeyUpdate::Keep {
            return Err(CliError::validation(
                "Nothing to change: pass --to, --key or --clear-key",
            ));
        }

        let (_, mut registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?.name.clone();

        registry.rename_or_rebind(&profile, &self.name, self.to.as_deref(), hotkey)?;
        println!("Updated '{}' in profile '{profile}'", self.name);
        Ok(())
    }
}

impl PlaySoundArgs {
    /// Execute the play command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (config, registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?;
        let binding = profile
            .get(&self.name)
            .ok_or_else(|| CliError::validation(format!("Sound '{}' not found", self.name)))?;

        let volume = checked_volume(self.volume, config.playback.volume)?;
        let mut adapter = playback::open_adapter(config.playback.output_device.as_deref())?;
        adapter.play(&binding.file, volume, self.looping)?;
        println!("Playing '{}'", binding.name);

        wait_until_idle(adapter.as_ref());
        Ok(())
    }
}

impl RandomSoundArgs {
    /// Execute the random command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let (config, registry) = global.open_registry()?;
        let profile = resolve_profile(&registry, self.profile.as_deref())?;
        let binding = profile
            .bindings()
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| CliError::validation(format!("Profile '{}' has no sounds", profile.name)))?;

        let volume = checked_volume(self.volume, config.playback.volume)?;
        let mut adapter = playback::open_adapter(config.playback.output_device.as_deref())?;
        adapter.play(&binding.file, volume, false)?;
        println!("Playing '{}'", binding.name);

        wait_until_idle(adapter.as_ref());
        Ok(())
    }
}

fn checked_volume(requested: Option<f32>, configured: f32) -> CliResult<f32> {
    match requested {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(CliError::validation(format!(
            "Volume must be between 0.0 and 1.0 (got {v})"
        ))),
        Some(v) => Ok(v),
        None => Ok(configured),
    }
}

fn wait_until_idle(adapter: &dyn PlaybackAdapter) {
    while !adapter.is_idle() {
        thread::sleep(PLAYBACK_POLL);
    }
}
