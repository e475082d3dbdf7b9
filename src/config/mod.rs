//! Application-level preferences persisted to `config.json` in the data
//! directory.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{self, ensure_dir};
use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::BookError;

pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
    /// Disables ANSI styling in CLI output.
    #[serde(default)]
    pub plain_output: bool,
    /// Horizon for the `upcoming` listing when no override is given.
    #[serde(default = "Config::default_upcoming_days")]
    pub upcoming_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            currency: CurrencyCode::default(),
            plain_output: false,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            last_opened_book: None,
        }
    }
}

impl Config {
    fn default_upcoming_days() -> i64 {
        DEFAULT_UPCOMING_DAYS
    }
}

/// Loads and saves the configuration file, tolerating a missing file by
/// falling back to defaults.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BookError> {
        Self::from_base(utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BookError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BookError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: utils::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, BookError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(&self.path)?)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), BookError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        utils::replace_file(&self.path, &serde_json::to_string_pretty(config)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
