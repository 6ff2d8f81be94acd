//! Dashboard configuration persistence.
//!
//! The configuration lives in the platform config folder:
//! - macOS: ~/Library/Application Support/com.DataSentinel.Data-Sentinel/
//! - Windows: %APPDATA%/DataSentinel/Data Sentinel/config/
//! - Linux: ~/.config/datasentinel/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sentinel_model::DashboardConfig;

use crate::error::{IngestError, Result};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "DataSentinel";
const APP_NAME: &str = "Data Sentinel";
const CONFIG_FILENAME: &str = "sentinel.toml";

/// Default configuration file path.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load the configuration at `path`.
///
/// A missing file yields the defaults; a file that does not parse is an error.
pub fn load_config(path: &Path) -> Result<DashboardConfig> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let config = toml::from_str(&content).map_err(|e| IngestError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            tracing::info!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(DashboardConfig::default())
        }
        Err(e) => Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Render `config` as TOML.
pub fn config_to_toml(config: &DashboardConfig) -> std::result::Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

/// Write `config` to `path` as TOML, creating the parent folder if needed.
pub fn save_config(config: &DashboardConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let content = config_to_toml(config).map_err(|e| IngestError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), "saved configuration");
    Ok(())
}
