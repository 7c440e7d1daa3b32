use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::config::CoreConfig;
use crate::feed::{assemble_feed, Feed, Selection};
use crate::models::{
    ConnectorRecord, ConnectorUpdate, FilterState, FilterUpdate, MentionKind, MentionRecord, MentionSource,
    MentionStatus,
};
use crate::store::{ConnectorStore, MentionList, MentionStore};

/// Single owner of the inbox: both collections, the active filters, the
/// assembled feed and the selection.
///
/// Every mutation recomputes the feed and repairs the selection before it
/// returns, so readers never see a feed that lags the stores.
#[derive(Debug)]
pub struct InboxState {
    config: CoreConfig,
    mentions: MentionStore,
    connectors: ConnectorStore,
    filters: FilterState,
    feed: Feed,
    selection: Selection,
}

impl InboxState {
    pub fn new(config: CoreConfig) -> Self {
        let mentions = MentionStore::new().with_archive_snooze(config.archive_snooze());
        let filters = config.default_filters.clone();
        Self {
            config,
            mentions,
            connectors: ConnectorStore::new(),
            filters,
            feed: Feed::default(),
            selection: Selection::new(),
        }
    }

    pub fn with_data(config: CoreConfig, connectors: Vec<ConnectorRecord>, mentions: Vec<MentionRecord>) -> Self {
        let mut state = Self::new(config);
        state.connectors.set_connectors(connectors);
        state.set_mentions(mentions);
        state
    }

    // ===== Getters =====

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn mentions(&self) -> &[Arc<MentionRecord>] {
        self.mentions.get_mentions()
    }

    pub fn mention_snapshot(&self) -> MentionList {
        self.mentions.snapshot()
    }

    pub fn get_mention(&self, id: &str) -> Option<&Arc<MentionRecord>> {
        self.mentions.get(id)
    }

    pub fn connectors(&self) -> &[ConnectorRecord] {
        self.connectors.get_connectors()
    }

    pub fn connector_store(&self) -> &ConnectorStore {
        &self.connectors
    }

    pub fn unique_senders(&self) -> Vec<String> {
        self.mentions.unique_senders()
    }

    /// Current version of the selected record.
    ///
    /// Resolved by id against the store, so a record triaged after it was
    /// selected is returned with its new status.
    pub fn selected_mention(&self) -> Option<&Arc<MentionRecord>> {
        self.selection.resolve(self.mentions.get_mentions())
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn is_highlighted(&self, record: &MentionRecord) -> bool {
        self.connectors
            .index()
            .highlights(record, self.config.high_priority_threshold)
    }

    // ===== Feed =====

    /// Recompute the feed against the local wall clock.
    pub fn refresh(&mut self) {
        self.refresh_at(&Local::now());
    }

    /// Recompute the feed as of `now` and repair the selection.
    pub fn refresh_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.feed = assemble_feed(
            self.mentions.get_mentions(),
            &self.filters,
            self.connectors.index(),
            now,
        );
        self.selection.reconcile(&self.feed.items);
    }

    // ===== Mentions =====

    pub fn set_mentions(&mut self, mentions: Vec<MentionRecord>) {
        self.mentions.set_mentions(mentions);
        self.refresh();
    }

    /// Returns whether the id was found. Unknown ids are a no-op.
    pub fn update_mention_status(&mut self, id: &str, status: MentionStatus) -> bool {
        let found = self.mentions.update_mention_status(id, status);
        self.refresh_if(found);
        found
    }

    pub fn archive_mention(&mut self, id: &str, until: DateTime<Utc>) -> bool {
        let found = self.mentions.archive_mention(id, until);
        self.refresh_if(found);
        found
    }

    /// Archive for the configured snooze duration.
    pub fn archive_for(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let found = self.mentions.archive_for(id, now);
        self.refresh_if(found);
        found
    }

    // ===== Connectors =====

    pub fn set_connectors(&mut self, connectors: Vec<ConnectorRecord>) {
        self.connectors.set_connectors(connectors);
        self.refresh();
    }

    pub fn update_connector(&mut self, id: &str, update: &ConnectorUpdate) -> bool {
        let found = self.connectors.update_connector(id, update);
        self.refresh_if(found);
        found
    }

    // ===== Filters =====

    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        tracing::debug!(filters = ?self.filters, "Filters updated");
        self.refresh();
    }

    pub fn toggle_source(&mut self, source: MentionSource) {
        self.filters.toggle_source(source);
        self.refresh();
    }

    pub fn toggle_kind(&mut self, kind: MentionKind) {
        self.filters.toggle_kind(kind);
        self.refresh();
    }

    pub fn toggle_user(&mut self, user: &str) {
        self.filters.toggle_user(user);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refresh();
    }

    // ===== Selection =====

    /// Explicit selection. Clearing it, or picking a record that is not in
    /// the current feed, falls back to the first feed item straight away.
    pub fn set_selected_mention(&mut self, mention: Option<Arc<MentionRecord>>) {
        self.selection.select(mention);
        self.selection.reconcile(&self.feed.items);
    }

    /// Select a record by id. Returns false (selection unchanged) when the id
    /// is unknown.
    pub fn select_id(&mut self, id: &str) -> bool {
        let Some(mention) = self.mentions.get(id).cloned() else {
            tracing::debug!(id, "Cannot select unknown mention");
            return false;
        };
        self.set_selected_mention(Some(mention));
        true
    }

    fn refresh_if(&mut self, changed: bool) {
        if changed {
            self.refresh();
        }
    }
}

impl Default for InboxState {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}
