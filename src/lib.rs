//! Soundboard Library
//!
//! Core of the terminal soundboard: the profile and sound model, JSON
//! persistence, audio playback, and the CLI and interactive board built on
//! top of them.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod playback;
pub mod services;
pub mod tui;

pub use error::{BoardError, ErrorKind};
