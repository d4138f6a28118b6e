use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::PersistedSettings;
use crate::infra::gemini::ProviderConfig;

const APP_QUALIFIER: &str = "in";
const APP_ORG: &str = "AgroProfit";
const APP_NAME: &str = "AgroProfit";

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

pub fn load_settings() -> Option<PersistedSettings> {
    let path = settings_file()?;
    load_settings_from(&path)
}

fn load_settings_from(path: &Path) -> Option<PersistedSettings> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => {
            debug!("[settings] Loaded settings from {}", path.display());
            Some(settings)
        }
        Err(err) => {
            warn!("[settings] Ignoring unreadable settings file {}: {err}", path.display());
            None
        }
    }
}

pub fn save_settings(settings: &PersistedSettings) -> Result<(), SettingsSaveError> {
    let path = settings_file().ok_or(SettingsSaveError::StorageUnavailable)?;
    save_settings_to(&path, settings)
}

fn save_settings_to(path: &Path, settings: &PersistedSettings) -> Result<(), SettingsSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    debug!("[settings] Saved settings to {}", path.display());
    Ok(())
}

/// Provider configuration for the current process: defaults, then environment
/// (including `.env`), then whatever the user saved.
pub fn provider_config(saved: &PersistedSettings) -> ProviderConfig {
    ProviderConfig::layered(|name| std::env::var(name).ok(), saved)
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("agroprofit-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_settings_survive_save_and_load() {
        let path = scratch_path("settings.json");
        let settings = PersistedSettings {
            api_key: Some("abc".to_string()),
            model: Some("gemini-2.5-pro".to_string()),
            base_url: None,
        };

        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), Some(settings));

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_or_corrupt_file_loads_nothing() {
        let path = scratch_path("settings.json");
        assert_eq!(load_settings_from(&path), None);

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert_eq!(load_settings_from(&path), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = scratch_path("settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"model": "gemini-lite"}"#).unwrap();

        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.model.as_deref(), Some("gemini-lite"));
        assert_eq!(loaded.api_key, None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
