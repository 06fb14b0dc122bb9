use std::path::Path;

use crate::ai::{BookConfig, Difficulty, SearchConfig};
use crate::error::ConfigError;
use crate::game::CELLS;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bot strength, 1 (random) to 3 (search).
    pub difficulty: u8,
    /// Seed for the random and tactical agents; OS entropy when unset.
    pub seed: Option<u64>,
    pub search: SearchConfig,
    pub book: BookConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            difficulty: 3,
            seed: None,
            search: SearchConfig::default(),
            book: BookConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_level(self.difficulty)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3).contains(&self.difficulty) {
            return Err(ConfigError::Validation(
                "difficulty must be 1, 2 or 3".into(),
            ));
        }
        if self.search.time_budget_ms == 0 {
            return Err(ConfigError::Validation(
                "search.time_budget_ms must be > 0".into(),
            ));
        }
        if self.search.start_depth == 0 {
            return Err(ConfigError::Validation(
                "search.start_depth must be >= 1".into(),
            ));
        }
        if self.search.max_depth < self.search.start_depth {
            return Err(ConfigError::Validation(
                "search.max_depth must be >= search.start_depth".into(),
            ));
        }
        if self.search.tt_capacity == 0 {
            return Err(ConfigError::Validation(
                "search.tt_capacity must be > 0".into(),
            ));
        }
        if self.book.max_ply as usize > CELLS {
            return Err(ConfigError::Validation(
                "book.max_ply must be <= 42".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
