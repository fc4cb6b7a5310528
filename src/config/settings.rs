//! Application settings and paths.
//!
//! Manages XDG-compliant paths for configuration and data. Paths are resolved
//! once by the caller and passed down rather than held globally.

use crate::error::{ConfigError, ConfigResult};
use crate::query::DEFAULT_RECENT_LIMIT;
use crate::storage::LoadPolicy;
use crate::workflow::ReviewPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/scandesk)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/scandesk)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform directories for this user.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "scandesk", "scandesk")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Use explicit directories, e.g. in tests.
    pub fn at(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the path to the record storage directory.
    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Overrides the XDG records directory.
    pub data_dir: Option<PathBuf>,
    /// Length of the recent-uploads list.
    pub recent_limit: usize,
    /// Default rule set for `review`.
    pub review_policy: ReviewPolicy,
    /// Behaviour when a stored collection cannot be parsed.
    pub on_corrupt: LoadPolicy,
    /// Default output format.
    pub default_output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            review_policy: ReviewPolicy::Strict,
            on_corrupt: LoadPolicy::Strict,
            default_output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults if
    /// no file exists yet.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let file = paths.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Directory the record store should open.
    pub fn records_dir(&self, paths: &Paths) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths.records_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.recent_limit, 5);
        assert_eq!(settings.review_policy, ReviewPolicy::Strict);
        assert_eq!(settings.on_corrupt, LoadPolicy::Strict);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path().join("config"), dir.path().join("data"));
        assert_eq!(AppSettings::load(&paths).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_written_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path().join("config"), dir.path().join("data"));

        let settings = AppSettings {
            recent_limit: 10,
            review_policy: ReviewPolicy::Permissive,
            on_corrupt: LoadPolicy::TreatAsEmpty,
            ..AppSettings::default()
        };
        fs::create_dir_all(&paths.config_dir).unwrap();
        fs::write(
            paths.settings_file(),
            serde_json::to_string_pretty(&settings).unwrap(),
        )
        .unwrap();

        assert_eq!(AppSettings::load(&paths).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{"on_corrupt": "reset-empty"}"#).unwrap();

        let settings = AppSettings::load_from(&file).unwrap();
        assert_eq!(settings.on_corrupt, LoadPolicy::TreatAsEmpty);
        assert_eq!(settings.recent_limit, 5);
    }

    #[test]
    fn test_records_dir_override() {
        let paths = Paths::at("/cfg", "/data");
        let mut settings = AppSettings::default();
        assert_eq!(settings.records_dir(&paths), PathBuf::from("/data/records"));

        settings.data_dir = Some(PathBuf::from("/elsewhere"));
        assert_eq!(settings.records_dir(&paths), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "{ nope").unwrap();
        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
