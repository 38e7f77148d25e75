//! The full set of profiles plus the active-profile pointer.

use crate::constants::DEFAULT_PROFILE;
use crate::models::Profile;

/// All profiles, in creation order, and the name of the active one.
///
/// # Invariants
///
/// - The "Default" profile always exists
/// - Profile names are unique
/// - `active` always names an existing profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    profiles: Vec<Profile>,
    active: String,
}

impl Registry {
    /// Creates a registry holding only the empty "Default" profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: vec![Profile::new(DEFAULT_PROFILE)],
            active: DEFAULT_PROFILE.to_string(),
        }
    }

    /// Builds a registry from loaded parts, restoring the invariants.
    ///
    /// A missing "Default" profile is inserted first, and an unknown active
    /// name falls back to "Default". Callers guarantee unique names.
    pub(crate) fn from_parts(mut profiles: Vec<Profile>, active: Option<String>) -> Self {
        if !profiles.iter().any(|p| p.name == DEFAULT_PROFILE) {
            profiles.insert(0, Profile::new(DEFAULT_PROFILE));
        }

        let active = active
            .filter(|name| profiles.iter().any(|p| &p.name == name))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        Self { profiles, active }
    }

    /// Profiles in creation order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Name of the active profile.
    #[must_use]
    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// The active profile.
    #[must_use]
    pub fn active(&self) -> &Profile {
        self.profiles
            .iter()
            .find(|p| p.name == self.active)
            .unwrap_or(&self.profiles[0])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }

    pub(crate) fn push(&mut self, profile: Profile) {
        self.profiles.push(profile);
    }

    /// Replaces a same-named profile in place, or appends it.
    pub(crate) fn upsert(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Profile> {
        let index = self.profiles.iter().position(|p| p.name == name)?;
        let removed = self.profiles.remove(index);
        if self.active == name {
            self.active = DEFAULT_PROFILE.to_string();
        }
        Some(removed)
    }

    /// Points the registry at another profile. The caller checks existence.
    pub(crate) fn set_active(&mut self, name: &str) {
        self.active = name.to_string();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
