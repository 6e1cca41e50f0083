//! Preference storage for roster-table.
//!
//! A flat string key-value store. Only the theme is stored today.
//!
//! Structure:
//! - Pure functions: path computation, theme lookup
//! - Effect functions: preference file I/O

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};

use crate::error::PreferenceError;
use crate::types::Theme;

/// Key the theme preference is stored under.
pub const THEME_KEY: &str = "theme";

/// Preference filename within the config directory.
const PREFERENCES_FILENAME: &str = "preferences.json";

/// Key-value preference storage.
pub trait PreferenceStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Returns the default preference file path.
///
/// On Linux: ~/.config/roster-table/preferences.json
pub fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster-table")
        .join(PREFERENCES_FILENAME)
}

/// Theme stored in the given store, light when absent.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    Theme::from_preference(store.get(THEME_KEY).as_deref())
}

/// Record the theme choice.
pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, theme.as_str())
}

// ============================================================================
// STORES
// ============================================================================

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                PreferenceError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        debug!("loaded {} preference(s) from {}", values.len(), path.display());
        Ok(JsonFileStore { path, values })
    }

    /// Load the store, starting empty if the file cannot be read.
    ///
    /// The unreadable file is overwritten on the next `set`.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("{}; starting with default preferences", e);
                JsonFileStore {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents =
            serde_json::to_string_pretty(&self.values).map_err(|source| PreferenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, contents).map_err(io_err)
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_preferences_path_is_reasonable() {
        let path = default_preferences_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("roster-table"));
        assert!(path_str.ends_with("preferences.json"));
    }

    #[test]
    fn test_memory_store_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_memory_store_round_trips_theme() {
        let mut store = MemoryStore::new();
        save_theme(&mut store, Theme::Dark).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(load_theme(&store), Theme::Dark);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path().join("nope.json")).unwrap();
        assert_eq!(store.get(THEME_KEY), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("preferences.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        save_theme(&mut store, Theme::Dark).unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_theme(&reopened), Theme::Dark);

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["theme"], "dark");
    }

    #[test]
    fn test_every_toggle_is_written() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        save_theme(&mut store, Theme::Dark).unwrap();
        save_theme(&mut store, Theme::Light).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, PreferenceError::Parse { .. }));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_light() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut store = JsonFileStore::open_or_empty(&path);
        assert_eq!(load_theme(&store), Theme::Light);

        save_theme(&mut store, Theme::Dark).unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_theme(&reopened), Theme::Dark);
    }

    #[test]
    fn test_unknown_theme_value_is_light() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(load_theme(&store), Theme::Light);
    }
}
