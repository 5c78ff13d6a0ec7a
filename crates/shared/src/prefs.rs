//! Player preference storage.
//!
//! A preference bag is a small persistent string map owned by the platform.
//! Only two keys exist, and they are always written together.

use std::collections::BTreeMap;

use crate::models::PlayerAppearance;

pub const PREFERENCES_NAMESPACE: &str = "PlayerSettings";
pub const COLOR_KEY: &str = "color";
pub const SHAPE_KEY: &str = "shape";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference backend error: {0}")]
    Backend(String),
}

pub trait PreferenceBag {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Write every entry in one commit: either all land or none do.
    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<(), PreferenceError>;
}

/// In-process bag, used by tests and as a fallback when no storage exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl PreferenceBag for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<(), PreferenceError> {
        for (k, v) in entries {
            self.values.insert((*k).to_string(), (*v).to_string());
        }
        Ok(())
    }
}

fn read_or_none<P: PreferenceBag + ?Sized>(bag: &P, key: &str) -> Option<String> {
    match bag.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read preference, using default");
            None
        }
    }
}

/// Read the local player's appearance. Missing, unreadable or unrecognised
/// values fall back to blue / square.
pub fn load_appearance<P: PreferenceBag + ?Sized>(bag: &P) -> PlayerAppearance {
    let color = read_or_none(bag, COLOR_KEY);
    let shape = read_or_none(bag, SHAPE_KEY);
    let appearance = PlayerAppearance::from_prefs(color.as_deref(), shape.as_deref());

    if let Some(c) = color.as_deref() {
        if appearance.color.pref_value() != c {
            tracing::debug!(value = c, "Unrecognised color preference");
        }
    }
    if let Some(s) = shape.as_deref() {
        if appearance.shape.pref_value() != s {
            tracing::debug!(value = s, "Unrecognised shape preference");
        }
    }
    appearance
}
