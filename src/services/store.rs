//! Persistence store for the profile registry.
//!
//! The registry is written as a single versioned JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "active": "Default",
//!   "profiles": [
//!     { "name": "Default", "sounds": [ { "name": "Airhorn", "file": "/s/air.wav", "key": "F1" } ] }
//!   ]
//! }
//! ```
//!
//! Two older unversioned shapes are still read: a plain map of
//! `profile -> sound -> {file, key}`, and the tabbed variant
//! `profile -> {"tabs": {tab -> sound -> {file, key}}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::STORE_VERSION;
use crate::error::{BoardError, Result};
use crate::models::{Hotkey, Profile, Registry, SoundBinding};

/// Loads and saves full registry snapshots.
pub trait ProfileStore {
    /// Reads the persisted registry.
    ///
    /// A store with nothing in it yields [`Registry::new`]. A store holding
    /// data that cannot be understood fails with [`BoardError::CorruptStore`].
    fn load(&self) -> Result<Registry>;

    /// Persists the full registry, replacing whatever was stored before.
    fn save(&mut self, registry: &Registry) -> Result<()>;

    /// Moves unreadable data aside so the next save does not destroy it.
    ///
    /// Returns where the data went, if anywhere.
    fn quarantine(&mut self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file absent, starting empty");
            return Ok(Registry::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| BoardError::io(&self.path, e))?;
        let document = decode(&content, &self.path)?;
        let registry = Registry::from_parts(document.profiles, document.active);

        info!(
            path = %self.path.display(),
            profiles = registry.profiles().len(),
            "loaded profile store"
        );
        Ok(registry)
    }

    fn save(&mut self, registry: &Registry) -> Result<()> {
        let content = encode(registry.profiles(), registry.active_name())
            .map_err(|e| BoardError::io(&self.path, e.into()))?;
        write_atomic(&self.path, &content)?;
        debug!(path = %self.path.display(), "saved profile store");
        Ok(())
    }

    fn quarantine(&mut self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut target = self.path.clone().into_os_string();
        target.push(".corrupt");
        let target = PathBuf::from(target);

        fs::rename(&self.path, &target).map_err(|e| BoardError::io(&self.path, e))?;
        warn!(
            from = %self.path.display(),
            to = %target.display(),
            "moved unreadable profile store aside"
        );
        Ok(Some(target))
    }
}

/// In-memory store keeping the last saved snapshot.
///
/// Saves can be made to fail, which exercises the unsaved-changes path
/// without touching the file system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Registry>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot.
    #[must_use]
    pub fn with_snapshot(registry: Registry) -> Self {
        Self {
            snapshot: Some(registry),
            ..Self::default()
        }
    }

    /// Makes every following save fail (or succeed again).
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// The last successfully saved registry.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Registry> {
        self.snapshot.as_ref()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Registry> {
        Ok(self.snapshot.clone().unwrap_or_default())
    }

    fn save(&mut self, registry: &Registry) -> Result<()> {
        if self.fail_saves {
            return Err(BoardError::io(
                "<memory>",
                std::io::Error::other("simulated save failure"),
            ));
        }
        self.snapshot = Some(registry.clone());
        self.saves += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Document format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    active: Option<String>,
    #[serde(default)]
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    name: String,
    #[serde(default)]
    sounds: Vec<SoundEntry>,
}

#[derive(Debug, Deserialize)]
struct SoundEntry {
    name: String,
    file: PathBuf,
    #[serde(default)]
    key: String,
}

#[derive(Debug, Serialize)]
struct SoundEntryOut<'a> {
    name: &'a str,
    file: &'a Path,
    key: String,
}

#[derive(Debug, Serialize)]
struct ProfileEntryOut<'a> {
    name: &'a str,
    sounds: Vec<SoundEntryOut<'a>>,
}

#[derive(Debug, Serialize)]
struct StoreDocumentOut<'a> {
    version: u32,
    active: &'a str,
    profiles: Vec<ProfileEntryOut<'a>>,
}

/// Profiles read from a document, before registry invariants are applied.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub profiles: Vec<Profile>,
    pub active: Option<String>,
}

/// Serializes profiles in the current versioned shape.
pub(crate) fn encode<'a>(
    profiles: impl IntoIterator<Item = &'a Profile>,
    active: &str,
) -> serde_json::Result<String> {
    let document = StoreDocumentOut {
        version: STORE_VERSION,
        active,
        profiles: profiles
            .into_iter()
            .map(|profile| ProfileEntryOut {
                name: &profile.name,
                sounds: profile
                    .iter()
                    .map(|b| SoundEntryOut {
                        name: &b.name,
                        file: &b.file,
                        key: b.hotkey.map(|h| h.to_string()).unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document)
}

/// Parses any supported document shape.
///
/// Empty or whitespace-only content decodes to no profiles.
pub(crate) fn decode(content: &str, path: &Path) -> Result<Decoded> {
    let corrupt = |reason: String| BoardError::CorruptStore {
        path: path.to_path_buf(),
        reason,
    };

    if content.trim().is_empty() {
        return Ok(Decoded {
            profiles: Vec::new(),
            active: None,
        });
    }

    let value: Value = serde_json::from_str(content).map_err(|e| corrupt(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(corrupt("top level must be a JSON object".to_string()));
    };

    let decoded = if root.get("version").is_some_and(Value::is_number) {
        decode_versioned(Value::Object(root)).map_err(corrupt)?
    } else {
        debug!(path = %path.display(), "reading unversioned profile document");
        decode_legacy(root).map_err(corrupt)?
    };

    let mut seen = Vec::with_capacity(decoded.profiles.len());
    for profile in &decoded.profiles {
        if seen.contains(&profile.name.as_str()) {
            return Err(corrupt(format!("profile '{}' appears twice", profile.name)));
        }
        seen.push(profile.name.as_str());
    }

    Ok(decoded)
}

fn decode_versioned(value: Value) -> std::result::Result<Decoded, String> {
    let document: StoreDocument = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if document.version > STORE_VERSION {
        return Err(format!(
            "unsupported store version {} (newest known is {STORE_VERSION})",
            document.version
        ));
    }

    let profiles = document
        .profiles
        .into_iter()
        .map(|entry| {
            let sounds = entry.sounds.into_iter().map(|s| (s.name, s.file, s.key));
            build_profile(entry.name, sounds)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Decoded {
        profiles,
        active: document.active,
    })
}

fn decode_legacy(root: Map<String, Value>) -> std::result::Result<Decoded, String> {
    let mut profiles = Vec::with_capacity(root.len());

    for (name, body) in root {
        let Value::Object(body) = body else {
            return Err(format!("profile '{name}' must be an object"));
        };

        let mut sounds = Vec::new();
        match body.get("tabs") {
            Some(Value::Object(tabs)) if body.len() == 1 && !tabs.contains_key("file") => {
                for (tab, tab_sounds) in tabs {
                    let Value::Object(tab_sounds) = tab_sounds else {
                        return Err(format!("tab '{tab}' in profile '{name}' must be an object"));
                    };
                    collect_legacy_sounds(tab_sounds, Some(tab), &mut sounds)?;
                }
            }
            _ => collect_legacy_sounds(&body, None, &mut sounds)?,
        }

        profiles.push(migrate_legacy_profile(name, sounds)?);
    }

    Ok(Decoded {
        profiles,
        active: None,
    })
}

/// A sound read from an unversioned document.
struct LegacySound {
    tab: Option<String>,
    name: String,
    file: PathBuf,
    key: String,
}

fn collect_legacy_sounds(
    map: &Map<String, Value>,
    tab: Option<&str>,
    out: &mut Vec<LegacySound>,
) -> std::result::Result<(), String> {
    for (name, entry) in map {
        let file = entry
            .get("file")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("sound '{name}' is missing a \"file\" string"))?;
        let key = entry.get("key").and_then(Value::as_str).unwrap_or_default();
        out.push(LegacySound {
            tab: tab.map(str::to_string),
            name: name.clone(),
            file: PathBuf::from(file),
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Builds a profile from a versioned document, where every rule already held.
fn build_profile(
    name: String,
    sounds: impl Iterator<Item = (String, PathBuf, String)>,
) -> std::result::Result<Profile, String> {
    crate::models::binding::validate_name(&name).map_err(|e| e.to_string())?;
    let mut profile = Profile::new(name);

    for (sound, file, key) in sounds {
        let hotkey = match Hotkey::parse_optional(&key) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!(profile = %profile.name, sound = %sound, "dropping hotkey: {e}");
                None
            }
        };
        let binding = SoundBinding::restore(sound, file, hotkey).map_err(|e| e.to_string())?;
        profile.push_unbounded(binding).map_err(|e| e.to_string())?;
    }

    Ok(profile)
}

/// Builds a profile from an unversioned document.
///
/// Older documents never enforced the current rules. Long names are kept,
/// a name repeated across tabs gets the tab appended, and a hotkey already
/// taken in the profile is dropped.
fn migrate_legacy_profile(name: String, sounds: Vec<LegacySound>) -> std::result::Result<Profile, String> {
    if name.trim().is_empty() {
        return Err("profile name cannot be empty".to_string());
    }
    let mut profile = Profile::new(name);

    for sound in sounds {
        if sound.name.trim().is_empty() {
            return Err(format!("profile '{}' has a sound without a name", profile.name));
        }

        let mut hotkey = match Hotkey::parse_optional(&sound.key) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!(profile = %profile.name, sound = %sound.name, "dropping hotkey: {e}");
                None
            }
        };
        if let Some(taken) = hotkey.and_then(|h| profile.find_by_hotkey(&h)) {
            warn!(
                profile = %profile.name,
                sound = %sound.name,
                bound_to = %taken.name,
                "dropping hotkey already in use"
            );
            hotkey = None;
        }

        let name = unique_legacy_name(&profile, sound.name, sound.tab.as_deref());
        profile
            .push_unbounded(SoundBinding {
                name,
                file: sound.file,
                hotkey,
            })
            .map_err(|e| e.to_string())?;
    }

    Ok(profile)
}

/// `name`, or `name (tab)` / `name (tab) 2` ... when it is already taken.
fn unique_legacy_name(profile: &Profile, name: String, tab: Option<&str>) -> String {
    if profile.get(&name).is_none() {
        return name;
    }

    let base = match tab {
        Some(tab) => format!("{name} ({tab})"),
        None => name.clone(),
    };
    let mut candidate = base.clone();
    let mut n = 2;
    while profile.get(&candidate).is_some() {
        candidate = format!("{base} {n}");
        n += 1;
    }
    warn!(profile = %profile.name, sound = %name, renamed = %candidate, "renaming repeated sound");
    candidate
}

/// Writes `content` to `<path>.tmp` and renames it over `path`.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BoardError::io(parent, e))?;
    }

    let mut temp = path.to_path_buf().into_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, content).map_err(|e| BoardError::io(&temp, e))?;
    fs::rename(&temp, path).map_err(|e| BoardError::io(path, e))?;
    Ok(())
}
