use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Default configuration
pub const DEFAULT_LOG_FILTER: &str = "traq_view=info";
pub const DEFAULT_THEME: &str = "dark";
pub const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted viewer settings (`settings.json` in the config dir).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Store snapshot to load at startup. Relative paths resolve against
    /// the data dir.
    pub snapshot_path: Option<PathBuf>,
    /// "dark" or "light"
    pub theme: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Path opened at startup, e.g. `/channels/<id>`.
    pub start_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            theme: DEFAULT_THEME.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            start_path: crate::route::HOME_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Snapshot location: the configured path, or `snapshot.json` in the
    /// data dir.
    pub fn resolved_snapshot_path(&self) -> Option<PathBuf> {
        let data_dir = project_dirs().map(|p| p.data_dir().to_path_buf());
        match &self.snapshot_path {
            Some(path) if path.is_absolute() => Some(path.clone()),
            Some(path) => data_dir.map(|dir| dir.join(path)),
            None => data_dir.map(|dir| dir.join(SNAPSHOT_FILE)),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "traq-view", "traq-view")
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    let proj = project_dirs().ok_or(ConfigError::NoConfigDir)?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.join("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings, falling back to defaults when the file is missing or
/// unreadable.
pub fn load_settings() -> Settings {
    let path = match settings_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "using default settings");
            return Settings::default();
        }
    };
    if !path.exists() {
        return Settings::default();
    }
    load_settings_from(&path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default settings");
        Settings::default()
    })
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let data = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(data.as_bytes()).map_err(io_err)?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    save_settings_to(&settings_path()?, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("traq-view-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "theme": "light" }"#).unwrap();
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(settings.start_path, "/");
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_file("settings.json");
        let settings = Settings {
            snapshot_path: Some(PathBuf::from("/tmp/snap.json")),
            theme: "light".into(),
            ..Settings::default()
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_invalid_settings_file() {
        let path = temp_file("broken.json");
        fs::write(&path, "[1, 2").unwrap();
        let result = load_settings_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_absolute_snapshot_path_kept() {
        let settings = Settings {
            snapshot_path: Some(PathBuf::from("/data/snap.json")),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolved_snapshot_path(),
            Some(PathBuf::from("/data/snap.json"))
        );
    }
}
