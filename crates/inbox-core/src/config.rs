use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ARCHIVE_SNOOZE_SECS, HIGH_PRIORITY_CONNECTOR_THRESHOLD};
use crate::models::FilterState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Filters the inbox starts with
    pub default_filters: FilterState,
    /// How long "archive" hides an item when no date is given
    pub archive_snooze_secs: i64,
    /// Connector priority at which unread items are highlighted
    pub high_priority_threshold: u8,
}

impl CoreConfig {
    /// Out-of-range values fall back to the default snooze.
    pub fn archive_snooze(&self) -> Duration {
        Duration::try_seconds(self.archive_snooze_secs).unwrap_or_else(|| {
            tracing::warn!(secs = self.archive_snooze_secs, "Archive snooze out of range, using default");
            Duration::seconds(DEFAULT_ARCHIVE_SNOOZE_SECS)
        })
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_filters: FilterState::default(),
            archive_snooze_secs: DEFAULT_ARCHIVE_SNOOZE_SECS,
            high_priority_threshold: HIGH_PRIORITY_CONNECTOR_THRESHOLD,
        }
    }
}
