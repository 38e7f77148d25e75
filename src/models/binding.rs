//! Sound bindings: a display name, an audio file and an optional hotkey.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::constants::{AUDIO_EXTENSIONS, MAX_NAME_LEN};
use crate::error::{BoardError, Result};
use crate::models::Hotkey;

/// Association between a button name, an audio file and an optional hotkey.
///
/// # Validation
///
/// - Name must be non-empty (after trimming) and at most 64 characters
/// - File must exist, be readable and carry an audio extension at bind time
/// - Name and hotkey uniqueness are enforced by the owning [`Profile`](crate::models::Profile)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBinding {
    /// Button label, unique within the profile
    pub name: String,
    /// Path of the audio file
    pub file: PathBuf,
    /// Optional hotkey, unique within the profile
    pub hotkey: Option<Hotkey>,
}

impl SoundBinding {
    /// Creates a binding, validating the name and the audio file.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, hotkey: Option<Hotkey>) -> Result<Self> {
        let name = name.into();
        let file = file.into();
        validate_name(&name)?;
        validate_audio_file(&file)?;
        Ok(Self { name, file, hotkey })
    }

    /// Creates a binding from persisted data without touching the file system.
    ///
    /// Stored bindings are not re-validated against the disk: a file deleted
    /// after binding only fails when it is played.
    pub(crate) fn restore(name: String, file: PathBuf, hotkey: Option<Hotkey>) -> Result<Self> {
        validate_name(&name)?;
        Ok(Self { name, file, hotkey })
    }

    /// Returns true when the name contains `query`, ignoring case.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Validates a profile or sound name.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: String| BoardError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty".to_string()));
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(invalid(format!(
            "name exceeds maximum length of {MAX_NAME_LEN} characters (got {len})"
        )));
    }

    Ok(())
}

/// Checks that `path` is an existing, readable file with a supported audio extension.
pub fn validate_audio_file(path: &Path) -> Result<()> {
    let invalid = |reason: &str| BoardError::InvalidFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension {
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(invalid(&format!(
                "unsupported file type (expected one of: {})",
                AUDIO_EXTENSIONS.join(", ")
            )))
        }
    }

    if !path.exists() {
        return Err(invalid("file does not exist"));
    }
    if !path.is_file() {
        return Err(invalid("not a regular file"));
    }

    File::open(path).map_err(|e| invalid(&format!("file is not readable: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"RIFF").unwrap();
        path
    }

    #[test]
    fn test_new_valid() {
        let dir = TempDir::new().unwrap();
        let file = touch(&dir, "air.wav");
        let binding = SoundBinding::new("Airhorn", &file, Some("F1".parse().unwrap())).unwrap();

        assert_eq!(binding.name, "Airhorn");
        assert_eq!(binding.file, file);
        assert_eq!(binding.hotkey.unwrap().to_string(), "F1");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let file = touch(&dir, "LOUD.MP3");
        assert!(validate_audio_file(&file).is_ok());
    }

    #[test]
    fn test_invalid_files() {
        let dir = TempDir::new().unwrap();
        let text = touch(&dir, "notes.txt");
        let missing = dir.path().join("missing.wav");
        let folder = dir.path().join("folder.wav");
        fs::create_dir(&folder).unwrap();

        for path in [text, missing, folder] {
            let err = validate_audio_file(&path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFile, "path: {}", path.display());
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Airhorn").is_ok());
        assert!(validate_name("Sad Trombone 2").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN)).is_ok());

        assert_eq!(validate_name("").unwrap_err().kind(), ErrorKind::InvalidName);
        assert_eq!(validate_name("   ").unwrap_err().kind(), ErrorKind::InvalidName);
        assert_eq!(
            validate_name(&"a".repeat(MAX_NAME_LEN + 1)).unwrap_err().kind(),
            ErrorKind::InvalidName
        );
    }

    #[test]
    fn test_restore_skips_file_check() {
        let binding =
            SoundBinding::restore("Gone".into(), PathBuf::from("/nowhere/gone.wav"), None).unwrap();
        assert_eq!(binding.name, "Gone");
    }

    #[test]
    fn test_matches_ignores_case() {
        let binding = SoundBinding::restore("Sad Trombone".into(), PathBuf::from("x.wav"), None).unwrap();
        assert!(binding.matches("trom"));
        assert!(binding.matches("SAD"));
        assert!(!binding.matches("horn"));
    }
}
