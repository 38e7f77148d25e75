//! Profile registry service.
//!
//! [`ProfileRegistry`] is the single owner of the profile data. Every
//! mutation goes through it, is validated against the profile invariants,
//! and is persisted through a [`ProfileStore`] once it succeeds.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_PROFILE;
use crate::error::{BoardError, Result};
use crate::models::binding::{validate_audio_file, validate_name};
use crate::models::{Hotkey, Profile, Registry, SoundBinding};
use crate::services::store::ProfileStore;

/// How [`ProfileRegistry::rename_or_rebind`] treats the hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotkeyUpdate {
    /// Leave the current hotkey as is
    #[default]
    Keep,
    /// Remove the hotkey
    Clear,
    /// Bind a new hotkey
    Set(Hotkey),
}

/// Owns the registry, its store and the unsaved-changes flag.
///
/// Mutations take `&mut self`, so there is exactly one writer at a time.
/// A failed save never rolls back the in-memory change; it is reported to
/// the caller and remembered in [`has_unsaved_changes`](Self::has_unsaved_changes)
/// until a later save succeeds.
#[derive(Debug)]
pub struct ProfileRegistry<S: ProfileStore> {
    registry: Registry,
    store: S,
    max_bindings: usize,
    unsaved: bool,
}

impl<S: ProfileStore> ProfileRegistry<S> {
    /// Loads the registry from `store`.
    ///
    /// A corrupt store is moved aside (when the store supports it) and the
    /// registry starts over with an empty "Default" profile. Other load
    /// failures are returned.
    pub fn open(mut store: S, max_bindings: usize) -> Result<Self> {
        let registry = match store.load() {
            Ok(registry) => registry,
            Err(err @ BoardError::CorruptStore { .. }) => {
                warn!("{err}; starting with an empty Default profile");
                match store.quarantine() {
                    Ok(Some(path)) => info!(backup = %path.display(), "kept unreadable store"),
                    Ok(None) => {}
                    Err(e) => warn!("could not move unreadable store aside: {e}"),
                }
                Registry::new()
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            registry,
            store,
            max_bindings: max_bindings.max(1),
            unsaved: false,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Profile names in creation order.
    #[must_use]
    pub fn list_profiles(&self) -> Vec<&str> {
        self.registry
            .profiles()
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// The currently selected profile.
    #[must_use]
    pub fn active_profile(&self) -> &Profile {
        self.registry.active()
    }

    /// Bindings of `profile` in layout order.
    pub fn list_bindings(&self, profile: &str) -> Result<&[SoundBinding]> {
        self.registry
            .get(profile)
            .map(Profile::bindings)
            .ok_or_else(|| BoardError::profile_not_found(profile))
    }

    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.registry.get(name)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Per-profile binding limit.
    #[must_use]
    pub fn max_bindings(&self) -> usize {
        self.max_bindings
    }

    /// Changes the per-profile limit. Profiles already above it keep their bindings.
    pub fn set_max_bindings(&mut self, max: usize) {
        self.max_bindings = max.max(1);
    }

    /// True when the last save failed and the store is behind memory.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    // -----------------------------------------------------------------------
    // Profile operations
    // -----------------------------------------------------------------------

    /// Creates an empty profile and makes it active.
    pub fn create_profile(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        validate_name(name)?;
        if self.registry.contains(name) {
            return Err(BoardError::DuplicateProfile(name.to_string()));
        }

        self.registry.push(Profile::new(name));
        self.registry.set_active(name);
        info!(profile = name, "created profile");
        self.persist()
    }

    /// Deletes a profile. Deleting the active profile activates "Default".
    pub fn delete_profile(&mut self, name: &str) -> Result<()> {
        if name == DEFAULT_PROFILE {
            return Err(BoardError::ProtectedProfile(name.to_string()));
        }
        self.registry
            .remove(name)
            .ok_or_else(|| BoardError::profile_not_found(name))?;

        info!(profile = name, active = self.registry.active_name(), "deleted profile");
        self.persist()
    }

    /// Switches the active profile.
    pub fn set_active_profile(&mut self, name: &str) -> Result<()> {
        if !self.registry.contains(name) {
            return Err(BoardError::profile_not_found(name));
        }
        if self.registry.active_name() == name {
            return Ok(());
        }

        self.registry.set_active(name);
        debug!(profile = name, "switched active profile");
        self.persist()
    }

    // -----------------------------------------------------------------------
    // Binding operations
    // -----------------------------------------------------------------------

    /// Appends a binding to `profile`.
    ///
    /// Checks run in a fixed order and the first failure wins: unknown
    /// profile, invalid name, unparseable hotkey, duplicate name, duplicate
    /// hotkey, unreadable file, full profile. `hotkey` may be empty for none.
    pub fn add_binding(
        &mut self,
        profile: &str,
        name: &str,
        file: impl Into<PathBuf>,
        hotkey: Option<&str>,
    ) -> Result<()> {
        let max = self.max_bindings;
        let target = self
            .registry
            .get_mut(profile)
            .ok_or_else(|| BoardError::profile_not_found(profile))?;

        let name = name.trim();
        validate_name(name)?;
        let hotkey = match hotkey {
            Some(input) => Hotkey::parse_optional(input)?,
            None => None,
        };
        target.check_available(name, hotkey.as_ref(), None)?;

        let file = file.into();
        validate_audio_file(&file)?;

        target.push(
            SoundBinding {
                name: name.to_string(),
                file,
                hotkey,
            },
            max,
        )?;

        info!(profile, sound = name, "added sound");
        self.persist()
    }

    /// Removes the binding `name` from `profile`.
    pub fn remove_binding(&mut self, profile: &str, name: &str) -> Result<()> {
        let target = self
            .registry
            .get_mut(profile)
            .ok_or_else(|| BoardError::profile_not_found(profile))?;
        target.remove(name)?;

        info!(profile, sound = name, "removed sound");
        self.persist()
    }

    /// Renames a binding and/or changes its hotkey as one step.
    ///
    /// The binding keeps its place in the layout. If the new name or hotkey
    /// collides with another binding the original is left untouched.
    pub fn rename_or_rebind(
        &mut self,
        profile: &str,
        name: &str,
        new_name: Option<&str>,
        hotkey: HotkeyUpdate,
    ) -> Result<()> {
        let target = self
            .registry
            .get_mut(profile)
            .ok_or_else(|| BoardError::profile_not_found(profile))?;
        let index = target
            .position(name)
            .ok_or_else(|| BoardError::sound_not_found(name))?;
        let current = &target.bindings()[index];

        // Names restored from old documents may break today's length limit
        let new_name = match new_name {
            Some(requested) => {
                let requested = requested.trim();
                validate_name(requested)?;
                requested.to_string()
            }
            None => current.name.clone(),
        };
        let new_hotkey = match hotkey {
            HotkeyUpdate::Keep => current.hotkey,
            HotkeyUpdate::Clear => None,
            HotkeyUpdate::Set(hotkey) => Some(hotkey),
        };
        target.check_available(&new_name, new_hotkey.as_ref(), Some(name))?;

        let updated = SoundBinding {
            name: new_name,
            file: current.file.clone(),
            hotkey: new_hotkey,
        };
        info!(
            profile,
            sound = name,
            new_name = %updated.name,
            hotkey = %updated.hotkey.map(|h| h.to_string()).unwrap_or_default(),
            "updated sound"
        );
        target.replace(index, updated);
        self.persist()
    }

    /// Retries a save that failed earlier. Does nothing when already saved.
    pub fn flush(&mut self) -> Result<()> {
        if self.unsaved {
            self.persist()
        } else {
            Ok(())
        }
    }

    /// Inserts or replaces whole profiles, activating the last one.
    ///
    /// Callers have validated every profile already.
    pub(crate) fn install_profiles(&mut self, profiles: Vec<Profile>) -> Result<()> {
        let Some(last) = profiles.last().map(|p| p.name.clone()) else {
            return Ok(());
        };
        for profile in profiles {
            self.registry.upsert(profile);
        }
        self.registry.set_active(&last);
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        match self.store.save(&self.registry) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                warn!("saving profiles failed, keeping changes in memory: {err}");
                self.unsaved = true;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_BINDINGS;
    use crate::error::ErrorKind;
    use crate::services::store::{JsonFileStore, MemoryStore};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        registry: ProfileRegistry<MemoryStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                registry: ProfileRegistry::open(MemoryStore::new(), DEFAULT_MAX_BINDINGS).unwrap(),
            }
        }

        fn sound(&self, file: &str) -> PathBuf {
            let path = self.dir.path().join(file);
            if !path.exists() {
                fs::write(&path, b"RIFF").unwrap();
            }
            path
        }

        fn add(&mut self, profile: &str, name: &str, key: Option<&str>) -> Result<()> {
            let file = self.sound(&format!("{name}.wav"));
            self.registry.add_binding(profile, name, file, key)
        }

        fn names(&self, profile: &str) -> Vec<String> {
            self.registry
                .list_bindings(profile)
                .unwrap()
                .iter()
                .map(|b| b.name.clone())
                .collect()
        }
    }

    fn assert_unique(profile: &Profile) {
        for (i, a) in profile.iter().enumerate() {
            for b in profile.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
                if a.hotkey.is_some() {
                    assert_ne!(a.hotkey, b.hotkey);
                }
            }
        }
    }

    #[test]
    fn test_open_empty_store() {
        let fx = Fixture::new();
        assert_eq!(fx.registry.list_profiles(), ["Default"]);
        assert_eq!(fx.registry.active_profile().name, "Default");
        assert!(fx.registry.list_bindings("Default").unwrap().is_empty());
        assert!(!fx.registry.has_unsaved_changes());
    }

    #[test]
    fn test_open_corrupt_file_degrades_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{\"Default\": [").unwrap();

        let registry = ProfileRegistry::open(JsonFileStore::new(&path), 10).unwrap();
        assert_eq!(registry.list_profiles(), ["Default"]);
        assert!(dir.path().join("profiles.json.corrupt").exists());
    }

    #[test]
    fn test_create_profile_becomes_active() {
        let mut fx = Fixture::new();
        fx.registry.create_profile("Work").unwrap();

        assert_eq!(fx.registry.list_profiles(), ["Default", "Work"]);
        assert_eq!(fx.registry.active_profile().name, "Work");

        let err = fx.registry.create_profile("Work").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateProfile);
        let err = fx.registry.create_profile("  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }

    #[test]
    fn test_delete_default_is_protected() {
        let mut fx = Fixture::new();
        let err = fx.registry.delete_profile("Default").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtectedProfile);

        fx.registry.create_profile("Work").unwrap();
        let err = fx.registry.delete_profile("Default").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtectedProfile);
    }

    #[test]
    fn test_delete_active_profile_falls_back_to_default() {
        let mut fx = Fixture::new();
        fx.registry.create_profile("Work").unwrap();
        assert_eq!(fx.registry.active_profile().name, "Work");

        fx.registry.delete_profile("Work").unwrap();
        assert_eq!(fx.registry.active_profile().name, "Default");
        assert!(!fx.registry.list_profiles().contains(&"Work"));

        let err = fx.registry.delete_profile("Work").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_set_active_profile() {
        let mut fx = Fixture::new();
        fx.registry.create_profile("Work").unwrap();
        fx.add("Work", "Ding", None).unwrap();

        fx.registry.set_active_profile("Default").unwrap();
        assert_eq!(fx.registry.active_profile().name, "Default");
        assert_eq!(fx.names("Work"), ["Ding"]);

        let err = fx.registry.set_active_profile("Missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(fx.registry.active_profile().name, "Default");
    }

    #[test]
    fn test_add_binding_appends_once_at_end() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", Some("F1")).unwrap();
        fx.add("Default", "Klaxon", Some("")).unwrap();
        fx.add("Default", "Bell", None).unwrap();

        assert_eq!(fx.names("Default"), ["Airhorn", "Klaxon", "Bell"]);
        let bindings = fx.registry.list_bindings("Default").unwrap();
        assert!(bindings[1].hotkey.is_none());
        assert_eq!(fx.registry.store().save_count(), 3);
    }

    #[test]
    fn test_duplicate_hotkey_scenario() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", Some("F1")).unwrap();

        // File existence is checked after uniqueness
        let err = fx
            .registry
            .add_binding("Default", "Klaxon", "/sounds/klax.wav", Some("F1"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateHotkey);
        assert_eq!(fx.names("Default"), ["Airhorn"]);
    }

    #[test]
    fn test_profile_full_scenario() {
        let mut fx = Fixture::new();
        for i in 0..DEFAULT_MAX_BINDINGS {
            fx.add("Default", &format!("Sound {i}"), None).unwrap();
        }

        let err = fx.add("Default", "Eleventh", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProfileFull);
        assert_eq!(fx.names("Default").len(), DEFAULT_MAX_BINDINGS);
    }

    #[test]
    fn test_add_binding_check_order() {
        let mut fx = Fixture::new();
        fx.registry.set_max_bindings(1);
        fx.add("Default", "Airhorn", Some("F1")).unwrap();
        let missing = Path::new("/definitely/missing.wav");

        let cases = [
            ("Nope", "", Some("Bad+Key"), ErrorKind::NotFound),
            ("Default", "", Some("Bad+Key"), ErrorKind::InvalidName),
            ("Default", "Airhorn", Some("Bad+Key"), ErrorKind::InvalidHotkey),
            ("Default", "Airhorn", Some("F1"), ErrorKind::DuplicateName),
            ("Default", "Klaxon", Some("F1"), ErrorKind::DuplicateHotkey),
            ("Default", "Klaxon", Some("F2"), ErrorKind::InvalidFile),
        ];
        for (profile, name, key, expected) in cases {
            let err = fx
                .registry
                .add_binding(profile, name, missing, key)
                .unwrap_err();
            assert_eq!(err.kind(), expected, "{profile}/{name}/{key:?}");
        }

        let file = fx.sound("klaxon.wav");
        let err = fx
            .registry
            .add_binding("Default", "Klaxon", file, Some("F2"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProfileFull);
        assert_eq!(fx.names("Default"), ["Airhorn"]);
    }

    #[test]
    fn test_hotkeys_are_unique_per_profile_only() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", Some("F1")).unwrap();
        fx.registry.create_profile("Work").unwrap();
        fx.add("Work", "Ding", Some("F1")).unwrap();

        assert_unique(fx.registry.profile("Default").unwrap());
        assert_unique(fx.registry.profile("Work").unwrap());
    }

    #[test]
    fn test_remove_binding() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", None).unwrap();
        fx.add("Default", "Klaxon", None).unwrap();

        fx.registry.remove_binding("Default", "Airhorn").unwrap();
        assert_eq!(fx.names("Default"), ["Klaxon"]);

        let err = fx.registry.remove_binding("Default", "Airhorn").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = fx.registry.remove_binding("Nope", "Klaxon").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rename_keeps_position_and_file() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", Some("F1")).unwrap();
        fx.add("Default", "Klaxon", Some("F2")).unwrap();
        fx.add("Default", "Bell", None).unwrap();
        let file = fx.registry.profile("Default").unwrap().get("Klaxon").unwrap().file.clone();

        fx.registry
            .rename_or_rebind("Default", "Klaxon", Some("Siren"), HotkeyUpdate::Keep)
            .unwrap();

        assert_eq!(fx.names("Default"), ["Airhorn", "Siren", "Bell"]);
        let siren = fx.registry.profile("Default").unwrap().get("Siren").unwrap().clone();
        assert_eq!(siren.file, file);
        assert_eq!(siren.hotkey.unwrap().to_string(), "F2");
    }

    #[test]
    fn test_rebind_against_self_and_others() {
        let mut fx = Fixture::new();
        fx.add("Default", "Airhorn", Some("F1")).unwrap();
        fx.add("Default", "Klaxon", Some("F2")).unwrap();
        let f1: Hotkey = "F1".parse().unwrap();
        let f3: Hotkey = "F3".parse().unwrap();

        // Own hotkey and own name never collide
        fx.registry
            .rename_or_rebind("Default", "Airhorn", Some("Airhorn"), HotkeyUpdate::Set(f1))
            .unwrap();

        let err = fx
            .registry
            .rename_or_rebind("Default", "Klaxon", None, HotkeyUpdate::Set(f1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateHotkey);

        let err = fx
            .registry
            .rename_or_rebind("Default", "Klaxon", Some("Airhorn"), HotkeyUpdate::Set(f3))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);

        // Failed updates leave the binding untouched
        let klaxon = fx.registry.profile("Default").unwrap().get("Klaxon").unwrap();
        assert_eq!(klaxon.hotkey.unwrap().to_string(), "F2");

        fx.registry
            .rename_or_rebind("Default", "Klaxon", None, HotkeyUpdate::Clear)
            .unwrap();
        assert!(fx.registry.profile("Default").unwrap().get("Klaxon").unwrap().hotkey.is_none());
    }

    #[test]
    fn test_rebind_keeps_long_restored_name() {
        let long = "x".repeat(80);
        let mut default = Profile::new("Default");
        default
            .push_unbounded(SoundBinding {
                name: long.clone(),
                file: PathBuf::from("/s/long.wav"),
                hotkey: None,
            })
            .unwrap();
        let store = MemoryStore::with_snapshot(Registry::from_parts(vec![default], None));
        let mut registry = ProfileRegistry::open(store, DEFAULT_MAX_BINDINGS).unwrap();

        let f4: Hotkey = "F4".parse().unwrap();
        registry
            .rename_or_rebind("Default", &long, None, HotkeyUpdate::Set(f4))
            .unwrap();
        assert_eq!(registry.active_profile().get(&long).unwrap().hotkey, Some(f4));

        let err = registry
            .rename_or_rebind("Default", &long, Some(&"y".repeat(80)), HotkeyUpdate::Keep)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }

    #[test]
    fn test_rename_missing_sound() {
        let mut fx = Fixture::new();
        let err = fx
            .registry
            .rename_or_rebind("Default", "Ghost", Some("Boo"), HotkeyUpdate::Keep)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_save_failure_keeps_mutation() {
        let mut fx = Fixture::new();
        fx.registry.store_mut().set_fail_saves(true);

        let err = fx.add("Default", "Airhorn", Some("F1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(fx.names("Default"), ["Airhorn"]);
        assert!(fx.registry.has_unsaved_changes());
        assert!(fx.registry.store().snapshot().is_none());

        fx.registry.store_mut().set_fail_saves(false);
        fx.registry.flush().unwrap();
        assert!(!fx.registry.has_unsaved_changes());
        let saved = fx.registry.store().snapshot().unwrap();
        assert_eq!(saved.get("Default").unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_persist_through_file_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        let sound = dir.path().join("air.wav");
        fs::write(&sound, b"RIFF").unwrap();

        {
            let mut registry = ProfileRegistry::open(JsonFileStore::new(&path), 10).unwrap();
            registry.create_profile("Work").unwrap();
            registry.add_binding("Work", "Airhorn", &sound, Some("ctrl+1")).unwrap();
        }

        let reopened = ProfileRegistry::open(JsonFileStore::new(&path), 10).unwrap();
        assert_eq!(reopened.list_profiles(), ["Default", "Work"]);
        assert_eq!(reopened.active_profile().name, "Work");
        let airhorn = &reopened.list_bindings("Work").unwrap()[0];
        assert_eq!(airhorn.hotkey.unwrap().to_string(), "Ctrl+1");
        assert_eq!(airhorn.file, sound);
    }
}
