//! Browser-backed preference bag.
//!
//! The whole namespace lives in one `localStorage` item as a JSON object, so
//! a multi-key write is a single `setItem` and lands atomically.

use std::collections::BTreeMap;

use escom_shared::prefs::{PreferenceBag, PreferenceError, PREFERENCES_NAMESPACE};

type Entries = BTreeMap<String, String>;

fn parse_entries(raw: Option<&str>) -> Result<Entries, PreferenceError> {
    match raw {
        None => Ok(Entries::new()),
        Some(json) => {
            serde_json::from_str(json).map_err(|e| PreferenceError::Backend(e.to_string()))
        }
    }
}

/// Merge `entries` into the stored JSON and return the new JSON.
///
/// A corrupt stored object is replaced rather than blocking the save.
fn merge_entries(raw: Option<&str>, entries: &[(&str, &str)]) -> Result<String, PreferenceError> {
    let mut map = parse_entries(raw).unwrap_or_default();
    for (k, v) in entries {
        map.insert((*k).to_string(), (*v).to_string());
    }
    serde_json::to_string(&map).map_err(|e| PreferenceError::Backend(e.to_string()))
}

pub struct LocalStoragePreferences {
    storage: Option<web_sys::Storage>,
}

impl LocalStoragePreferences {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, preferences will not persist");
        }
        LocalStoragePreferences { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PreferenceError> {
        self.storage
            .as_ref()
            .ok_or_else(|| PreferenceError::Backend("localStorage unavailable".to_string()))
    }

    fn raw(&self) -> Result<Option<String>, PreferenceError> {
        self.storage()?
            .get_item(PREFERENCES_NAMESPACE)
            .map_err(|e| PreferenceError::Backend(format!("{e:?}")))
    }
}

impl PreferenceBag for LocalStoragePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let raw = self.raw()?;
        Ok(parse_entries(raw.as_deref())?.remove(key))
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<(), PreferenceError> {
        let raw = self.raw()?;
        let json = merge_entries(raw.as_deref(), entries)?;
        self.storage()?
            .set_item(PREFERENCES_NAMESPACE, &json)
            .map_err(|e| PreferenceError::Backend(format!("{e:?}")))
    }
}
