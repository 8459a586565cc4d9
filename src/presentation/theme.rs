//! Light/dark theme preference and the key-value store that persists it

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Preference key the theme is stored under
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Saved preference, or Light when nothing (valid) is stored
    pub fn load(store: &dyn PreferenceStore) -> Self {
        store
            .get(THEME_KEY)
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    pub fn save(self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }
}

/// String key-value store for UI preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, nothing survives a restart
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open the file, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        log::debug!("Saved preference {}={} to {}", key, value, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        let store = MemoryPreferenceStore::default();
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_toggle_and_save() {
        let mut store = MemoryPreferenceStore::default();
        let theme = Theme::load(&store).toggle();
        theme.save(&mut store).unwrap();

        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
    }

    #[test]
    fn test_garbage_value_reads_as_light() {
        let mut store = MemoryPreferenceStore::default();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("solar_prefs_{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFilePreferenceStore::open(&path).unwrap();
            assert_eq!(store.path(), path.as_path());
            assert_eq!(Theme::load(&store), Theme::Light);
            Theme::Dark.save(&mut store).unwrap();
        }

        let reopened = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(Theme::load(&reopened), Theme::Dark);

        fs::remove_file(&path).unwrap();
    }
}
