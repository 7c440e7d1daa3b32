use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::DEFAULT_CONNECTOR_PRIORITY;
use crate::models::{ConnectorRecord, ConnectorUpdate, MentionRecord, MentionSource};

/// Source type -> connector lookup, rebuilt whenever connectors change.
#[derive(Debug, Clone, Default)]
pub struct ConnectorIndex {
    by_source: HashMap<MentionSource, ConnectorRecord>,
}

impl ConnectorIndex {
    /// The first connector of each source type wins.
    pub fn build(connectors: &[ConnectorRecord]) -> Self {
        let mut by_source: HashMap<MentionSource, ConnectorRecord> = HashMap::new();
        for connector in connectors {
            if by_source.contains_key(&connector.source) {
                tracing::warn!(
                    id = %connector.id,
                    source = %connector.source,
                    "Second connector for the same source is ignored for lookups"
                );
                continue;
            }
            by_source.insert(connector.source, connector.clone());
        }
        Self { by_source }
    }

    pub fn get(&self, source: MentionSource) -> Option<&ConnectorRecord> {
        self.by_source.get(&source)
    }

    /// Connector priority for a source, or the default when none is configured.
    pub fn priority_for(&self, source: MentionSource) -> u8 {
        self.get(source)
            .map(|c| c.priority)
            .unwrap_or(DEFAULT_CONNECTOR_PRIORITY)
    }

    /// Sources without a connector count as enabled.
    pub fn is_enabled(&self, source: MentionSource) -> bool {
        self.get(source).map(|c| c.is_enabled).unwrap_or(true)
    }

    /// Unread items from a high-priority connector get highlighted in the feed.
    pub fn highlights(&self, record: &MentionRecord, threshold: u8) -> bool {
        record.is_unread() && self.priority_for(record.source) >= threshold
    }
}

/// Sub-store for connector settings.
#[derive(Debug)]
pub struct ConnectorStore {
    connectors: Arc<Vec<ConnectorRecord>>,
    index: ConnectorIndex,
}

impl Default for ConnectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorStore {
    pub fn new() -> Self {
        Self {
            connectors: Arc::new(Vec::new()),
            index: ConnectorIndex::default(),
        }
    }

    // ===== Getters =====

    pub fn get_connectors(&self) -> &[ConnectorRecord] {
        &self.connectors
    }

    pub fn snapshot(&self) -> Arc<Vec<ConnectorRecord>> {
        Arc::clone(&self.connectors)
    }

    pub fn get(&self, id: &str) -> Option<&ConnectorRecord> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn index(&self) -> &ConnectorIndex {
        &self.index
    }

    // ===== Mutations =====

    pub fn set_connectors(&mut self, connectors: Vec<ConnectorRecord>) {
        self.index = ConnectorIndex::build(&connectors);
        self.connectors = Arc::new(connectors);
    }

    /// Merge `update` into the connector with this id. Unknown ids are
    /// ignored. Values are taken as given (priority range is the caller's
    /// concern).
    pub fn update_connector(&mut self, id: &str, update: &ConnectorUpdate) -> bool {
        let Some(pos) = self.connectors.iter().position(|c| c.id == id) else {
            tracing::debug!(id, "Connector not found, ignoring update");
            return false;
        };

        let merged = self.connectors[pos].merged(update);
        if merged == self.connectors[pos] {
            return true;
        }

        tracing::info!(id, priority = merged.priority, enabled = merged.is_enabled, "Updated connector");
        let mut next: Vec<ConnectorRecord> = self.connectors.as_ref().clone();
        next[pos] = merged;
        self.set_connectors(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MentionDraft, MentionKind, MentionStatus, Priority, Sender};
    use chrono::{TimeZone, Utc};

    fn make_test_store() -> ConnectorStore {
        let mut store = ConnectorStore::new();
        store.set_connectors(vec![
            ConnectorRecord::new("slack-1", "Slack", MentionSource::Chat, 5),
            ConnectorRecord::new("email-1", "Gmail", MentionSource::Email, 4),
        ]);
        store
    }

    #[test]
    fn test_priority_lookup_defaults_to_one() {
        let store = make_test_store();
        assert_eq!(store.index().priority_for(MentionSource::Chat), 5);
        assert_eq!(store.index().priority_for(MentionSource::Email), 4);
        assert_eq!(store.index().priority_for(MentionSource::IssueTracker), 1);
        assert!(store.index().is_enabled(MentionSource::IssueTracker));
    }

    #[test]
    fn test_update_rebuilds_index() {
        let mut store = make_test_store();
        let before = store.snapshot();

        assert!(store.update_connector("email-1", &ConnectorUpdate::priority(2)));
        assert_eq!(store.index().priority_for(MentionSource::Email), 2);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));

        assert!(store.update_connector("slack-1", &ConnectorUpdate::enabled(false)));
        assert!(!store.index().is_enabled(MentionSource::Chat));
        assert_eq!(store.get("slack-1").unwrap().priority, 5);
    }

    #[test]
    fn test_unknown_connector_is_a_no_op() {
        let mut store = make_test_store();
        let before = store.snapshot();
        assert!(!store.update_connector("teams-1", &ConnectorUpdate::priority(3)));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_first_connector_per_source_wins() {
        let index = ConnectorIndex::build(&[
            ConnectorRecord::new("slack-1", "Slack", MentionSource::Chat, 2),
            ConnectorRecord::new("slack-2", "Other Slack", MentionSource::Chat, 5),
        ]);
        assert_eq!(index.priority_for(MentionSource::Chat), 2);
    }

    #[test]
    fn test_highlights_unread_from_important_connector() {
        let store = make_test_store();
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let draft = |source, status| {
            MentionDraft::new(
                MentionKind::Mention,
                source,
                Sender::named("Sarah Chen"),
                timestamp,
                "title",
                "content",
                Priority::Low,
            )
            .with_status(status)
        };

        let unread_chat = MentionRecord::ingest(draft(MentionSource::Chat, MentionStatus::Unread));
        let read_chat = MentionRecord::ingest(draft(MentionSource::Chat, MentionStatus::Read));
        let unread_jira = MentionRecord::ingest(draft(MentionSource::IssueTracker, MentionStatus::Unread));

        assert!(store.index().highlights(&unread_chat, 4));
        assert!(!store.index().highlights(&read_chat, 4));
        assert!(!store.index().highlights(&unread_jira, 4));
    }
}
