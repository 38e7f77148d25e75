//! Decoded clips kept per path, converted to the output format.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use super::decoder::{decode_file, Clip};
use super::error::Result;

#[derive(Debug)]
struct Entry {
    clip: Arc<Clip>,
    modified: Option<SystemTime>,
}

/// Clip cache for one output format.
///
/// An entry is decoded again when the file's modification time changes, so
/// replacing a file on disk is picked up on the next play.
#[derive(Debug)]
pub struct ClipCache {
    entries: HashMap<PathBuf, Entry>,
    sample_rate: u32,
    channels: usize,
}

impl ClipCache {
    #[must_use]
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            entries: HashMap::new(),
            sample_rate,
            channels,
        }
    }

    /// The clip for `path`, decoding it if it is missing or stale.
    pub fn get(&mut self, path: &Path) -> Result<Arc<Clip>> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.clip));
            }
            debug!(path = %path.display(), "file changed, decoding again");
        }

        let clip = Arc::new(decode_file(path)?.prepare(self.sample_rate, self.channels)?);
        debug!(path = %path.display(), "cached clip");
        self.entries.insert(
            path.to_path_buf(),
            Entry {
                clip: Arc::clone(&clip),
                modified,
            },
        );
        Ok(clip)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
