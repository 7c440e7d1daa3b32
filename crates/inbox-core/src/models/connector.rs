use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MentionSource;

/// Configuration of one upstream source integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source: MentionSource,
    pub is_enabled: bool,
    /// 1-5, higher = more important. Not validated here.
    pub priority: u8,
    pub is_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl ConnectorRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: MentionSource, priority: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            is_enabled: true,
            priority,
            is_connected: true,
            last_sync: None,
        }
    }

    pub fn is_high_priority(&self, threshold: u8) -> bool {
        self.priority >= threshold
    }

    pub fn priority_description(&self) -> &'static str {
        match self.priority {
            5 => "Critical: Highest priority, always shown first",
            4 => "High: Important mentions, shown prominently",
            3 => "Medium: Standard priority, normal display",
            2 => "Medium-Low: Lower priority, less prominent",
            1 => "Low: Lowest priority, shown last",
            _ => "Out of range",
        }
    }

    /// Merge the fields set in `update`; everything else stays as is.
    pub fn merged(&self, update: &ConnectorUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            source: self.source,
            is_enabled: update.is_enabled.unwrap_or(self.is_enabled),
            priority: update.priority.unwrap_or(self.priority),
            is_connected: update.is_connected.unwrap_or(self.is_connected),
            last_sync: update.last_sync.or(self.last_sync),
        }
    }
}

/// Partial connector settings update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorUpdate {
    pub name: Option<String>,
    pub is_enabled: Option<bool>,
    pub priority: Option<u8>,
    pub is_connected: Option<bool>,
    pub last_sync: Option<DateTime<Utc>>,
}

impl ConnectorUpdate {
    pub fn priority(priority: u8) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn enabled(is_enabled: bool) -> Self {
        Self {
            is_enabled: Some(is_enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_given_fields() {
        let connector = ConnectorRecord::new("slack-1", "Slack", MentionSource::Chat, 5);

        let merged = connector.merged(&ConnectorUpdate::priority(2));
        assert_eq!(merged.priority, 2);
        assert_eq!(merged.name, "Slack");
        assert!(merged.is_enabled);

        let merged = merged.merged(&ConnectorUpdate::enabled(false));
        assert_eq!(merged.priority, 2);
        assert!(!merged.is_enabled);

        assert_eq!(connector.merged(&ConnectorUpdate::default()), connector);
    }

    #[test]
    fn test_priority_description() {
        let mut connector = ConnectorRecord::new("jira-1", "Jira", MentionSource::IssueTracker, 3);
        assert!(connector.priority_description().starts_with("Medium:"));
        assert!(!connector.is_high_priority(4));

        connector.priority = 4;
        assert!(connector.priority_description().starts_with("High:"));
        assert!(connector.is_high_priority(4));
    }

    #[test]
    fn test_parse_update_json() {
        let update: ConnectorUpdate = serde_json::from_str(r#"{"isEnabled": false}"#).unwrap();
        assert_eq!(update, ConnectorUpdate::enabled(false));
        assert!(!update.is_empty());
        assert!(ConnectorUpdate::default().is_empty());
    }
}
