use std::cell::RefCell;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::scanner::MarkerAlignment;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings at {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings store unavailable: {0}")]
    Store(String),
}

/// Host-provided persistence for the plugin's settings blob
pub trait SettingsStore {
    /// The stored blob, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>, SettingsError>;

    fn save(&self, blob: &str) -> Result<(), SettingsError>;
}

const MY_SETTING_KEY: &str = "mySetting";
const MARKER_ALIGNMENT_KEY: &str = "markerAlignment";

/// Plugin settings
///
/// Stored keys are merged one at a time over [`Settings::default`]: a missing
/// or invalid value leaves that field at its default without touching the
/// others.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub my_setting: String,
    pub marker_alignment: MarkerAlignment,
    /// Keys this version does not know about, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            my_setting: "default".to_string(),
            marker_alignment: MarkerAlignment::default(),
            extra: Map::new(),
        }
    }
}

/// Move `key` out of `stored` into `field` if its value has the right shape.
fn merge_key<T: DeserializeOwned>(stored: &mut Map<String, Value>, key: &str, field: &mut T) {
    let Some(value) = stored.remove(key) else {
        return;
    };
    match serde_json::from_value(value) {
        Ok(parsed) => *field = parsed,
        Err(e) => log::warn!("ignoring stored {key}: {e}; keeping the default"),
    }
}

impl Settings {
    /// Parse a stored blob. Only a blob that is not a JSON object is an error.
    pub fn from_json(blob: &str) -> Result<Self, SettingsError> {
        let mut stored: Map<String, Value> = serde_json::from_str(blob)?;
        let mut settings = Self::default();
        merge_key(&mut stored, MY_SETTING_KEY, &mut settings.my_setting);
        merge_key(&mut stored, MARKER_ALIGNMENT_KEY, &mut settings.marker_alignment);
        settings.extra = stored;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Strict load: any store or parse failure is returned.
    pub fn try_load<S: SettingsStore>(store: &S) -> Result<Self, SettingsError> {
        match store.load()? {
            Some(blob) if !blob.trim().is_empty() => Self::from_json(&blob),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings, falling back to defaults when the store is unreadable
    /// or the blob is corrupt.
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        Self::try_load(store).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Self::default()
        })
    }

    pub fn save<S: SettingsStore>(&self, store: &S) -> Result<(), SettingsError> {
        store.save(&self.to_json()?)
    }
}

/// In-memory store, for hosts without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: RefCell::new(Some(blob.to_string())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.blob.borrow().clone())
    }

    fn save(&self, blob: &str) -> Result<(), SettingsError> {
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn load(&self) -> Result<Option<String>, SettingsError> {
            Err(SettingsError::Store("offline".to_string()))
        }

        fn save(&self, _blob: &str) -> Result<(), SettingsError> {
            Err(SettingsError::Store("offline".to_string()))
        }
    }

    #[test]
    fn test_missing_blob_gives_defaults() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.my_setting, "default");
        assert_eq!(settings.marker_alignment, MarkerAlignment::Untrimmed);
    }

    #[test]
    fn test_partial_blob_merges_with_defaults() {
        let store = MemoryStore::with_blob(r#"{"mySetting":"custom"}"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.my_setting, "custom");
        assert_eq!(settings.marker_alignment, MarkerAlignment::Untrimmed);
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_defaults() {
        let store = MemoryStore::with_blob("{not json");
        assert!(Settings::try_load(&store).is_err());
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_non_object_blob_falls_back_to_defaults() {
        let store = MemoryStore::with_blob("[1, 2]");
        assert!(Settings::try_load(&store).is_err());
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_invalid_value_only_resets_its_own_key() {
        let store = MemoryStore::with_blob(
            r#"{"mySetting":"custom","markerAlignment":"Trimmed","legacyFlag":true}"#,
        );
        let settings = Settings::try_load(&store).unwrap();
        assert_eq!(settings.my_setting, "custom");
        assert_eq!(settings.marker_alignment, MarkerAlignment::Untrimmed);

        settings.save(&store).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&store.blob().unwrap()).unwrap();
        assert_eq!(saved["mySetting"], "custom");
        assert_eq!(saved["legacyFlag"], serde_json::Value::Bool(true));
        assert_eq!(saved["markerAlignment"], "untrimmed");
    }

    #[test]
    fn test_wrongly_typed_setting_keeps_default() {
        let store = MemoryStore::with_blob(r#"{"mySetting":42,"markerAlignment":"trimmed"}"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.my_setting, "default");
        assert_eq!(settings.marker_alignment, MarkerAlignment::Trimmed);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_unreadable_store_falls_back_to_defaults() {
        assert_eq!(Settings::load(&BrokenStore), Settings::default());
        assert!(Settings::default().save(&BrokenStore).is_err());
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let store = MemoryStore::with_blob(r#"{"mySetting":"x","legacyFlag":true}"#);
        let settings = Settings::load(&store);
        settings.save(&store).unwrap();

        let saved: serde_json::Value = serde_json::from_str(&store.blob().unwrap()).unwrap();
        assert_eq!(saved["legacyFlag"], serde_json::Value::Bool(true));
        assert_eq!(saved["mySetting"], "x");
        assert_eq!(saved["markerAlignment"], "untrimmed");
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            marker_alignment: MarkerAlignment::Trimmed,
            ..Settings::default()
        };
        settings.save(&store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }
}
