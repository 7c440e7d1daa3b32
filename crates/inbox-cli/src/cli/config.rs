use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::TimeDelta;
use inbox_core::models::FilterState;
use inbox_core::CoreConfig;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "unified-inbox";
const CONFIG_FILE_NAME: &str = "config.json";

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// JSON fixture file to load instead of the built-in sample inbox
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_path: Option<PathBuf>,

    /// How long `archive` hides an item when no duration is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_snooze_hours: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_disabled_sources: Option<bool>,

    /// Filters the feed starts with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_filters: Option<FilterState>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// `<config dir>/unified-inbox/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// An explicit path must exist. Without one the default location is
    /// tried, and a missing default file just means defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Core settings with the overrides from this file applied. A snooze
    /// that does not fit a time span is an error.
    pub fn core_config(&self) -> Result<CoreConfig> {
        let mut config = CoreConfig::default();
        if let Some(filters) = &self.default_filters {
            config.default_filters = filters.clone();
        }
        if let Some(hide) = self.hide_disabled_sources {
            config.default_filters.hide_disabled_sources = hide;
        }
        if let Some(hours) = self.archive_snooze_hours {
            config.archive_snooze_secs = hours
                .checked_mul(60 * 60)
                .filter(|secs| TimeDelta::try_seconds(*secs).is_some())
                .ok_or_else(|| anyhow!("archiveSnoozeHours out of range: {}", hours))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::models::{MentionSource, SortBy};
    use std::io::Write;

    #[test]
    fn test_parse_config_minimal() {
        let config: CliConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.core_config().unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_parse_config_full() {
        let json = r#"{
            "fixturesPath": "/tmp/inbox.json",
            "archiveSnoozeHours": 48,
            "hideDisabledSources": true,
            "defaultFilters": {"sources": ["chat"], "sortBy": "priority"}
        }"#;
        let config: CliConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fixtures_path, Some(PathBuf::from("/tmp/inbox.json")));

        let core = config.core_config().unwrap();
        assert_eq!(core.archive_snooze_secs, 48 * 3600);
        assert_eq!(core.default_filters.sources, vec![MentionSource::Chat]);
        assert_eq!(core.default_filters.sort_by, SortBy::Priority);
        assert!(core.default_filters.hide_disabled_sources);
        // Unspecified filter fields keep their defaults
        assert_eq!(core.default_filters.kinds.len(), 3);
    }

    #[test]
    fn test_oversized_snooze_is_an_error() {
        let config: CliConfig = serde_json::from_str(r#"{"archiveSnoozeHours": 3000000000}"#).unwrap();
        let err = config.core_config().unwrap_err();
        assert!(err.to_string().contains("archiveSnoozeHours out of range"));

        let config = CliConfig {
            archive_snooze_hours: Some(i64::MAX),
            ..Default::default()
        };
        assert!(config.core_config().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"archiveSnoozeHours": 2}"#).unwrap();

        let config = CliConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.archive_snooze_hours, Some(2));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::resolve(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ nope").unwrap();
        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
