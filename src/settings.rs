use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calendar::DEFAULT_WALK_LIMIT_DAYS;
use crate::layout::{LayoutSettings, TimelineEngine};
use crate::model::ViewMode;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no home directory to hold settings")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub view_mode: ViewMode,
    pub layout: LayoutSettings,
    /// Ceiling on any single day-by-day calendar walk.
    pub walk_limit_days: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Week,
            layout: LayoutSettings::default(),
            walk_limit_days: DEFAULT_WALK_LIMIT_DAYS,
        }
    }
}

impl AppSettings {
    /// `<config dir>/settings.json` for this application.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        directories::ProjectDirs::from("com", "presales", "presales-gantt")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn engine(&self) -> TimelineEngine {
        TimelineEngine::new(self.layout).with_walk_limit(self.walk_limit_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load_or_default(&dir.path().join("settings.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppSettings::load(&path), Err(SettingsError::Json { .. })));
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = AppSettings::default();
        settings.view_mode = ViewMode::Quarter;
        settings.layout.densities.quarter = 6.0;
        settings.walk_limit_days = 1_000;
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn engine_carries_settings() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "viewMode": "month", "walkLimitDays": 500 }"#).unwrap();
        let engine = settings.engine();
        assert_eq!(settings.view_mode, ViewMode::Month);
        assert_eq!(engine.walk_limit_days, 500);
        assert_eq!(engine.config_for(ViewMode::Month).pixels_per_day, 20.0);
    }
}
