//! Profiles: named, ordered collections of sound bindings.

use crate::error::{BoardError, Result};
use crate::models::{Hotkey, SoundBinding};

/// A named collection of sound bindings.
///
/// Bindings keep their insertion order, which is the order buttons are laid
/// out in. No two bindings share a name, and no two bindings share a hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile name, unique within the registry
    pub name: String,
    bindings: Vec<SoundBinding>,
}

impl Profile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    /// Bindings in insertion order.
    #[must_use]
    pub fn bindings(&self) -> &[SoundBinding] {
        &self.bindings
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SoundBinding> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Looks up a binding by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SoundBinding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Position of a binding in the layout order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.name == name)
    }

    /// Looks up the binding that owns `hotkey`.
    #[must_use]
    pub fn find_by_hotkey(&self, hotkey: &Hotkey) -> Option<&SoundBinding> {
        self.bindings
            .iter()
            .find(|b| b.hotkey.as_ref() == Some(hotkey))
    }

    /// Bindings whose name contains `query` (case-insensitive), in layout order.
    ///
    /// An empty query returns every binding.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&SoundBinding> {
        let query = query.trim();
        self.bindings.iter().filter(|b| b.matches(query)).collect()
    }

    /// Checks that `name` and `hotkey` are free in this profile.
    ///
    /// The binding named `except` is ignored, so a binding never collides
    /// with itself during a rename or rebind.
    pub fn check_available(&self, name: &str, hotkey: Option<&Hotkey>, except: Option<&str>) -> Result<()> {
        if self.others(except).any(|b| b.name == name) {
            return Err(BoardError::DuplicateName {
                profile: self.name.clone(),
                name: name.to_string(),
            });
        }

        if let Some(hotkey) = hotkey {
            if let Some(owner) = self.others(except).find(|b| b.hotkey.as_ref() == Some(hotkey)) {
                return Err(BoardError::DuplicateHotkey {
                    profile: self.name.clone(),
                    hotkey: hotkey.to_string(),
                    bound_to: owner.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn others<'a>(&'a self, except: Option<&'a str>) -> impl Iterator<Item = &'a SoundBinding> + 'a {
        self.bindings
            .iter()
            .filter(move |b| Some(b.name.as_str()) != except)
    }

    /// Appends a binding after checking uniqueness and the size limit.
    pub fn push(&mut self, binding: SoundBinding, max: usize) -> Result<()> {
        self.check_available(&binding.name, binding.hotkey.as_ref(), None)?;

        if self.bindings.len() >= max {
            return Err(BoardError::ProfileFull {
                profile: self.name.clone(),
                max,
            });
        }

        self.bindings.push(binding);
        Ok(())
    }

    /// Appends a binding checking uniqueness only (used when loading a store).
    pub(crate) fn push_unbounded(&mut self, binding: SoundBinding) -> Result<()> {
        self.push(binding, usize::MAX)
    }

    /// Removes and returns the binding named `name`.
    pub fn remove(&mut self, name: &str) -> Result<SoundBinding> {
        let index = self
            .position(name)
            .ok_or_else(|| BoardError::sound_not_found(name))?;
        Ok(self.bindings.remove(index))
    }

    /// Replaces the binding at `index` in place.
    pub(crate) fn replace(&mut self, index: usize, binding: SoundBinding) {
        self.bindings[index] = binding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::PathBuf;

    fn binding(name: &str, key: Option<&str>) -> SoundBinding {
        SoundBinding::restore(
            name.to_string(),
            PathBuf::from(format!("/sounds/{name}.wav")),
            key.map(|k| k.parse().unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_push_preserves_order() {
        let mut profile = Profile::new("Default");
        profile.push(binding("Airhorn", Some("F1")), 10).unwrap();
        profile.push(binding("Klaxon", None), 10).unwrap();
        profile.push(binding("Bell", Some("F2")), 10).unwrap();

        let names: Vec<_> = profile.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Airhorn", "Klaxon", "Bell"]);
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut profile = Profile::new("Default");
        profile.push(binding("Airhorn", Some("F1")), 10).unwrap();

        let err = profile.push(binding("Airhorn", None), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);

        let err = profile.push(binding("Klaxon", Some("f1")), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateHotkey);

        // Bindings without hotkeys never collide on the hotkey
        profile.push(binding("One", None), 10).unwrap();
        profile.push(binding("Two", None), 10).unwrap();
        assert_eq!(profile.len(), 3);
    }

    #[test]
    fn test_push_rejects_when_full() {
        let mut profile = Profile::new("Tiny");
        profile.push(binding("A", None), 2).unwrap();
        profile.push(binding("B", None), 2).unwrap();

        let err = profile.push(binding("C", None), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProfileFull);
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_check_available_ignores_self() {
        let mut profile = Profile::new("Default");
        profile.push(binding("Airhorn", Some("F1")), 10).unwrap();

        let f1: Hotkey = "F1".parse().unwrap();
        assert!(profile
            .check_available("Airhorn", Some(&f1), Some("Airhorn"))
            .is_ok());
        assert!(profile.check_available("Airhorn", None, None).is_err());
    }

    #[test]
    fn test_find_by_hotkey_and_filter() {
        let mut profile = Profile::new("Default");
        profile.push(binding("Airhorn", Some("F1")), 10).unwrap();
        profile.push(binding("Sad Trombone", Some("Ctrl+T")), 10).unwrap();

        let ctrl_t: Hotkey = "ctrl+t".parse().unwrap();
        assert_eq!(profile.find_by_hotkey(&ctrl_t).unwrap().name, "Sad Trombone");

        let hits: Vec<_> = profile.filter("HORN").iter().map(|b| b.name.clone()).collect();
        assert_eq!(hits, ["Airhorn"]);
        assert_eq!(profile.filter("").len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut profile = Profile::new("Default");
        profile.push(binding("Airhorn", None), 10).unwrap();

        assert_eq!(profile.remove("Airhorn").unwrap().name, "Airhorn");
        assert!(profile.is_empty());
        assert_eq!(profile.remove("Airhorn").unwrap_err().kind(), ErrorKind::NotFound);
    }
}
