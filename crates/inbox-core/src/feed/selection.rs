use std::sync::Arc;

use crate::models::MentionRecord;

/// The item currently open in the detail panel.
///
/// Holds the record as it was when selected. After a triage action that copy
/// is stale; read through [`Selection::resolve`] to get the current version.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<Arc<MentionRecord>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Arc<MentionRecord>> {
        self.current.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.current.as_deref().map(|m| m.id.as_str())
    }

    /// Explicit user choice; always wins.
    pub fn select(&mut self, mention: Option<Arc<MentionRecord>>) {
        self.current = mention;
    }

    /// Keep the selection pointing into `feed` after it was recomputed.
    ///
    /// With nothing selected the first item is picked. A selection that is no
    /// longer in the feed moves to the first item, or to nothing when the
    /// feed is empty. Returns whether the selected id changed.
    pub fn reconcile(&mut self, feed: &[Arc<MentionRecord>]) -> bool {
        let still_visible = match self.selected_id() {
            Some(id) => feed.iter().any(|m| m.id == id),
            None => false,
        };
        if still_visible {
            return false;
        }

        let before = self.selected_id().map(str::to_string);
        self.current = feed.first().cloned();
        let changed = before.as_deref() != self.selected_id();
        if changed {
            tracing::debug!(from = ?before, to = ?self.selected_id(), "Selection moved");
        }
        changed
    }

    /// The current version of the selected record from `mentions`.
    pub fn resolve<'a>(&self, mentions: &'a [Arc<MentionRecord>]) -> Option<&'a Arc<MentionRecord>> {
        let id = self.selected_id()?;
        mentions.iter().find(|m| m.id == id)
    }
}
