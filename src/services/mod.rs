//! Service layer for business logic.
//!
//! This module contains services that encapsulate the profile rules,
//! persistence and playback coordination shared by the CLI and the board.

pub mod board;
pub mod registry;
pub mod store;
pub mod transfer;

// Re-export commonly used types and functions
pub use board::{Soundboard, TriggerError};
pub use registry::{HotkeyUpdate, ProfileRegistry};
pub use store::{JsonFileStore, MemoryStore, ProfileStore};
pub use transfer::{export_profile, import_profiles};
