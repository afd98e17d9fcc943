//! Configuration management module.
//!
//! This module handles loading, saving, and validating application
//! configuration, including the API location, access token, and list
//! preferences.

mod error;

pub use error::ConfigError;

use crate::collection::ListSettings;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/crm-tui";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: Option<String>,
    pub base_url: String,
    pub page_size: usize,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub theme_name: String,
    pub export_dir: Option<PathBuf>,
    file_path: Option<PathBuf>,
}

/// Values given on the command line, applied over the file.
///
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub access_token: Option<String>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_theme_name() -> String {
    "tokyo-night".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default values.
    ///
    pub fn new() -> Config {
        Config {
            access_token: None,
            base_url: default_base_url(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            theme_name: default_theme_name(),
            export_dir: None,
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.access_token = data.access_token.filter(|t| !t.trim().is_empty());
            self.base_url = data.base_url;
            self.page_size = data.page_size;
            self.debounce_ms = data.debounce_ms;
            self.request_timeout_secs = data.request_timeout_secs;
            self.theme_name = data.theme_name;
            self.export_dir = data.export_dir;
        }

        Ok(())
    }

    /// Apply command line values over the loaded ones.
    ///
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size;
        }
        if let Some(token) = overrides.access_token {
            self.access_token = Some(token);
        }
    }

    /// Check the values are usable.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                message: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            access_token: self.access_token.clone(),
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            debounce_ms: self.debounce_ms,
            request_timeout_secs: self.request_timeout_secs,
            theme_name: self.theme_name.clone(),
            export_dir: self.export_dir.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Return list settings for the collections.
    ///
    pub fn list_settings(&self) -> ListSettings {
        ListSettings {
            page_size: self.page_size,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the export directory, falling back to the working directory.
    ///
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("crm-tui-config-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.list_settings().debounce, Duration::from_millis(500));
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_keeps_defaults() {
        let dir = scratch_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert!(config.access_token.is_none());
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.file_path(), Some(dir.join(FILE_NAME).as_path()));
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        config.access_token = Some("token-1234".to_string());
        config.base_url = "https://crm.example.com".to_string();
        config.page_size = 25;
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded.access_token.as_deref(), Some("token-1234"));
        assert_eq!(reloaded.base_url, "https://crm.example.com");
        assert_eq!(reloaded.page_size, 25);
        assert_eq!(reloaded.theme_name, "tokyo-night");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "page_size: 50\naccess_token: ''\n").unwrap();

        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.debounce_ms, 500);
        assert!(config.access_token.is_none());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "page_size: [not, a, number]\n").unwrap();

        let mut config = Config::new();
        let err = config.load(dir.to_str()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::DeserializationFailed(_))
        ));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_save_without_path() {
        assert!(Config::new().save().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::new();
        config.apply_overrides(Overrides {
            base_url: Some("http://10.0.0.2:8080".to_string()),
            page_size: Some(20),
            access_token: None,
        });
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.page_size, 20);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::new();
        config.page_size = 0;
        assert!(config.validate().unwrap_err().to_string().contains("page_size"));

        let mut config = Config::new();
        config.base_url = " ".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("base_url"));

        let mut config = Config::new();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
