use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::db::DbConnection;
use crate::models::Settings;

/// Settings document persisted as pretty-printed JSON
///
/// The document is read and written whole: callers load it, change the
/// struct in memory and save it back.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data dir>/settings.json`
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(DbConnection::data_dir()?.join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, writing the defaults first if the file is absent
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            log::info!("Created default settings at {}", self.path.display());
            return Ok(settings);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", self.path.display()))
    }

    /// Overwrite the whole document
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))
    }

    /// Restore and persist the defaults
    pub fn reset(&self) -> Result<Settings> {
        let settings = Settings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_materializes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("sub").join("settings.json"));

        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(store.path().exists());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["appearance"]["opacity"], 95);
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_save_overwrites_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("settings.json"));

        let mut settings = store.load().unwrap();
        settings.appearance.opacity = 40;
        settings.quadrants.names[0] = "Do first".to_string();
        store.save(&settings).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.appearance.opacity, 40);
        assert_eq!(reloaded.quadrants.names[0], "Do first");

        assert_eq!(store.reset().unwrap(), Settings::default());
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings"));
    }
}
