//! CLI command handlers.
//!
//! Headless, scriptable access to profiles, sounds and playback. Every
//! command goes through the same [`ProfileRegistry`](crate::services::ProfileRegistry)
//! as the interactive board.

pub mod common;
pub mod config;
pub mod devices;
pub mod profile;
pub mod sound;
pub mod transfer;

// Re-export types used by main.rs
pub use common::{CliError, CliResult, ExitCode, GlobalOptions};
pub use config::ConfigArgs;
pub use devices::DevicesArgs;
pub use profile::ProfileArgs;
pub use sound::SoundArgs;
pub use transfer::{ExportArgs, ImportArgs};
