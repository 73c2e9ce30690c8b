use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default base URL of the npm website
pub const DEFAULT_BASE_URL: &str = "https://www.npmjs.com";

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("version-stats/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration file structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub registry: RegistryConfig,
    pub defaults: DefaultsConfig,
}

/// Where and how the package page is fetched
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

/// Filter defaults applied when the matching flag is not given
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultsConfig {
    pub show_deprecated: bool,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub min: Option<String>,
    pub limit_total: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            show_deprecated: true,
            sort: None,
            limit: None,
            min: None,
            limit_total: None,
        }
    }
}

impl Config {
    /// Load the configuration at `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config file.
/// Uses $XDG_CONFIG_HOME/version-stats/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/version-stats/config.json,
/// or ./version-stats/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("version-stats")
}
