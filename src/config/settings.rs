//! User settings for Pocketbook
//!
//! Defaults applied when a command does not say otherwise: bucket width,
//! ranking length, deleted-record visibility and currency symbol.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::PocketbookPaths;
use crate::analytics::Granularity;
use crate::error::{PocketbookError, PocketbookResult};

/// User settings for Pocketbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Bucket width used by `history` without `--by`
    #[serde(default)]
    pub default_granularity: Granularity,

    /// Ranking length used by `report` without `--top`
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Whether soft-deleted records are shown by default
    #[serde(default)]
    pub include_deleted: bool,

    /// Currency symbol for terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_top_n() -> usize {
    5
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_granularity: Granularity::default(),
            top_n: default_top_n(),
            include_deleted: false,
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &PocketbookPaths) -> PocketbookResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            debug!(path = %settings_path.display(), "no settings file, using defaults");
            // Not saved here; `init` persists explicitly
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PocketbookError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PocketbookError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PocketbookPaths) -> PocketbookResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PocketbookError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PocketbookError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_granularity, Granularity::Month);
        assert_eq!(settings.top_n, 5);
        assert!(!settings.include_deleted);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            default_granularity: Granularity::Week,
            top_n: 3,
            currency_symbol: "€".to_string(),
            ..Default::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"top_n": 10}"#).unwrap();
        assert_eq!(settings.top_n, 10);
        assert_eq!(settings.default_granularity, Granularity::Month);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, PocketbookError::Config(_)));
    }
}
