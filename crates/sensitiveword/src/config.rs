//! Configuration management for sensitiveword.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::StoreKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "sensitiveword";

/// Environment variable prefix.
const ENV_PREFIX: &str = "SENSITIVEWORD_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SENSITIVEWORD_`, nested keys
///    separated by `__`, e.g. `SENSITIVEWORD_STORE__KIND=durable`)
/// 2. TOML config file at `~/.config/sensitiveword/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store configuration.
    pub store: StoreConfig,
    /// Initial filter contents.
    pub filter: FilterConfig,
}

/// Store-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend holds words and excluded symbols.
    pub kind: StoreKind,
    /// Directory holding both stores and any legacy list files.
    /// The durable store defaults to `~/.local/share/sensitiveword`; the
    /// memory store only touches the filesystem when this is set.
    pub path: Option<PathBuf>,
    /// Entry name of the sensitive word store under `path`.
    pub words_name: String,
    /// Entry name of the excluded symbol store under `path`.
    pub excluded_symbols_name: String,
}

/// Initial contents merged into the stores at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Sensitive words.
    pub words: Vec<String>,
    /// Excluded symbols; every character of each entry is skipped.
    pub excluded_symbols: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            path: None,
            words_name: "sensitive_words".to_string(),
            excluded_symbols_name: "excluded_symbols".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        validate_store_name("words_name", &self.store.words_name)?;
        validate_store_name("excluded_symbols_name", &self.store.excluded_symbols_name)?;

        if self.store.words_name == self.store.excluded_symbols_name {
            return Err(Error::ConfigValidation {
                message: format!(
                    "words_name and excluded_symbols_name must differ (both are '{}')",
                    self.store.words_name
                ),
            });
        }

        Ok(())
    }

    /// Directory holding the stores, resolving defaults if not set.
    ///
    /// Returns `None` for a memory store without an explicit path.
    #[must_use]
    pub fn store_dir(&self) -> Option<PathBuf> {
        match self.store.kind {
            StoreKind::Durable => Some(
                self.store
                    .path
                    .clone()
                    .unwrap_or_else(Self::default_data_dir),
            ),
            StoreKind::Memory => self.store.path.clone(),
        }
    }

    /// Path of the sensitive word store under `dir`.
    #[must_use]
    pub fn words_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.store.words_name)
    }

    /// Path of the excluded symbol store under `dir`.
    #[must_use]
    pub fn excluded_symbols_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.store.excluded_symbols_name)
    }
}

fn validate_store_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("{field} must not be empty"),
        });
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::ConfigValidation {
            message: format!("{field} must be a plain file name, got '{name}'"),
        });
    }
    Ok(())
}
