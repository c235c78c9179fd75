//! Persisted user settings.
//!
//! Two values survive between runs: the server URL and the default tags
//! pre-filled into every clip. They live in a small TOML file:
//!
//! ```toml
//! server_url = "http://localhost:3179/"
//! default_tags = "inbox,web"
//! ```
//!
//! Both are validated on load and again before saving, so a stored file is
//! always one the uploader accepts.

use std::fs;
use std::path::{Path, PathBuf};

use clipkeep_client::parse_server_url;
use clipkeep_core::TagList;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SettingsError;

const APP_DIR: &str = "clipkeep";
const FILE_NAME: &str = "settings.toml";

/// Settings persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the blob server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Comma-separated tags used when a clip names none.
    pub default_tags: String,
}

impl Settings {
    /// Default settings file location.
    ///
    /// `$XDG_CONFIG_HOME/clipkeep/settings.toml`, falling back to
    /// `$HOME/.config/clipkeep/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join(APP_DIR).join(FILE_NAME))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Settings = toml::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate and write settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;

        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, toml::to_string_pretty(self)?).map_err(io_err)?;

        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Check that the server URL parses and the default tags are acceptable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server_url.is_some() {
            self.server_url()?;
        }
        self.default_tags()?;
        Ok(())
    }

    /// The parsed server URL.
    pub fn server_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .server_url
            .as_deref()
            .ok_or_else(|| SettingsError::Invalid("no server URL configured".into()))?;
        parse_server_url(raw).map_err(|e| SettingsError::Invalid(e.to_string()))
    }

    /// The parsed default tags.
    pub fn default_tags(&self) -> Result<TagList, SettingsError> {
        TagList::parse(&self.default_tags).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}
