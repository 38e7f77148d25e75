//! Data models for profiles, sound bindings and hotkeys.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of UI, persistence and playback.

pub mod binding;
pub mod hotkey;
pub mod profile;
pub mod registry;

// Re-export all model types
pub use binding::SoundBinding;
pub use hotkey::{Hotkey, Key};
pub use profile::Profile;
pub use registry::Registry;
