//! Form settings persistence.
//!
//! Settings live in a small JSON document at `<config dir>/dynform/config.json`
//! unless [`CONFIG_PATH_ENV`] points elsewhere. A missing file is not an
//! error; a malformed file is logged and replaced by defaults so a bad edit
//! never prevents a form from opening.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs_next::config_dir;
use dynform_types::FormSettings;
use thiserror::Error;
use tracing::{debug, warn};

use crate::expand_tilde;

/// Environment variable allowing callers to override the configuration file path.
pub const CONFIG_PATH_ENV: &str = "DYNFORM_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error surfaced when reading configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path of the settings file, honouring [`CONFIG_PATH_ENV`].
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dynform")
        .join(CONFIG_FILE_NAME)
}

/// Log file used by hosts that own the terminal.
pub fn default_log_path() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("dynform").join("dynform.log")
}

/// Loads settings from [`default_config_path`].
pub fn load_form_settings() -> Result<FormSettings, ConfigError> {
    load_form_settings_from(&default_config_path())
}

/// Loads settings from an explicit path.
pub fn load_form_settings_from(path: &Path) -> Result<FormSettings, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => {
                debug!(path = %path.display(), "loaded form settings");
                Ok(settings)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse form settings; using defaults"
                );
                Ok(FormSettings::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(FormSettings::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
