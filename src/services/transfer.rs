//! Profile export and import.
//!
//! Exported files use the same document format as the profile store, holding
//! just the exported profile. Any document the store can read can be imported.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{BoardError, Result};
use crate::models::{Profile, SoundBinding};
use crate::services::registry::ProfileRegistry;
use crate::services::store::{self, ProfileStore};

/// Writes profile `name` to `path` as a standalone document.
pub fn export_profile<S: ProfileStore>(
    registry: &ProfileRegistry<S>,
    name: &str,
    path: &Path,
) -> Result<()> {
    let profile = registry
        .profile(name)
        .ok_or_else(|| BoardError::profile_not_found(name))?;

    let content =
        store::encode([profile], &profile.name).map_err(|e| BoardError::io(path, e.into()))?;
    store::write_atomic(path, &content)?;

    info!(profile = name, path = %path.display(), sounds = profile.len(), "exported profile");
    Ok(())
}

/// Imports every profile found in `path`.
///
/// Each sound is validated as if it were added by hand, so files that no
/// longer exist are rejected. Existing profiles are only replaced when
/// `overwrite` is set. Nothing changes unless every profile is valid. The
/// last imported profile becomes active.
///
/// Returns the names of the imported profiles in document order.
pub fn import_profiles<S: ProfileStore>(
    registry: &mut ProfileRegistry<S>,
    path: &Path,
    overwrite: bool,
) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| BoardError::io(path, e))?;
    let decoded = store::decode(&content, path)?;

    let max = registry.max_bindings();
    let mut incoming = Vec::with_capacity(decoded.profiles.len());
    for profile in decoded.profiles {
        if !overwrite && registry.profile(&profile.name).is_some() {
            return Err(BoardError::DuplicateProfile(profile.name));
        }
        incoming.push(revalidate(profile, max)?);
    }

    let names: Vec<String> = incoming.iter().map(|p| p.name.clone()).collect();
    registry.install_profiles(incoming)?;

    info!(path = %path.display(), profiles = ?names, "imported profiles");
    Ok(names)
}

/// Rebuilds a decoded profile through the same checks as a manual add.
fn revalidate(profile: Profile, max: usize) -> Result<Profile> {
    let mut checked = Profile::new(profile.name.clone());
    for binding in profile.iter() {
        let binding = SoundBinding::new(binding.name.clone(), binding.file.clone(), binding.hotkey)?;
        checked.push(binding, max)?;
    }
    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::services::store::MemoryStore;
    use tempfile::TempDir;

    fn registry_with_sound(dir: &TempDir) -> ProfileRegistry<MemoryStore> {
        let sound = dir.path().join("ding.wav");
        fs::write(&sound, b"RIFF").unwrap();

        let mut registry = ProfileRegistry::open(MemoryStore::new(), 10).unwrap();
        registry.create_profile("Work").unwrap();
        registry.add_binding("Work", "Ding", &sound, Some("F3")).unwrap();
        registry
    }

    #[test]
    fn test_export_then_import_into_fresh_registry() {
        let dir = TempDir::new().unwrap();
        let source = registry_with_sound(&dir);
        let exported = dir.path().join("work.json");
        export_profile(&source, "Work", &exported).unwrap();

        let mut target = ProfileRegistry::open(MemoryStore::new(), 10).unwrap();
        let names = import_profiles(&mut target, &exported, false).unwrap();

        assert_eq!(names, ["Work"]);
        assert_eq!(target.active_profile().name, "Work");
        assert_eq!(target.list_bindings("Work").unwrap(), source.list_bindings("Work").unwrap());
    }

    #[test]
    fn test_export_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let source = registry_with_sound(&dir);
        let err = export_profile(&source, "Games", &dir.path().join("x.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_import_existing_requires_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_with_sound(&dir);
        let exported = dir.path().join("work.json");
        export_profile(&registry, "Work", &exported).unwrap();
        registry.remove_binding("Work", "Ding").unwrap();

        let err = import_profiles(&mut registry, &exported, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateProfile);
        assert!(registry.list_bindings("Work").unwrap().is_empty());

        import_profiles(&mut registry, &exported, true).unwrap();
        assert_eq!(registry.list_bindings("Work").unwrap().len(), 1);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.wav");
        fs::write(&good, b"RIFF").unwrap();
        let document = serde_json::json!({
            "Games": {"Ok": {"file": good, "key": "F1"}},
            "Broken": {"Gone": {"file": dir.path().join("gone.wav"), "key": ""}}
        });
        let path = dir.path().join("legacy.json");
        fs::write(&path, document.to_string()).unwrap();

        let mut registry = ProfileRegistry::open(MemoryStore::new(), 10).unwrap();
        let err = import_profiles(&mut registry, &path, false).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidFile);
        assert_eq!(registry.list_profiles(), ["Default"]);
        assert_eq!(registry.store().save_count(), 0);
    }

    #[test]
    fn test_import_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        let mut registry = ProfileRegistry::open(MemoryStore::new(), 10).unwrap();
        let err = import_profiles(&mut registry, &path, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStore);
    }
}
