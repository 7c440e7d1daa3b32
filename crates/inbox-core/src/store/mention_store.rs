use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::constants::DEFAULT_ARCHIVE_SNOOZE_SECS;
use crate::models::{MentionRecord, MentionStatus};

/// Immutable snapshot of the mention collection.
///
/// Every mutation swaps in a new outer `Arc`, so `Arc::ptr_eq` on two
/// snapshots tells whether anything changed in between.
pub type MentionList = Arc<Vec<Arc<MentionRecord>>>;

/// Sub-store owning every ingested mention. Records are never deleted, only
/// re-flagged through the triage operations.
#[derive(Debug)]
pub struct MentionStore {
    mentions: MentionList,
    archive_snooze: Duration,
}

impl Default for MentionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MentionStore {
    pub fn new() -> Self {
        Self {
            mentions: Arc::new(Vec::new()),
            archive_snooze: Duration::seconds(DEFAULT_ARCHIVE_SNOOZE_SECS),
        }
    }

    pub fn with_archive_snooze(mut self, snooze: Duration) -> Self {
        self.archive_snooze = snooze;
        self
    }

    // ===== Getters =====

    pub fn snapshot(&self) -> MentionList {
        Arc::clone(&self.mentions)
    }

    pub fn get_mentions(&self) -> &[Arc<MentionRecord>] {
        &self.mentions
    }

    pub fn get(&self, id: &str) -> Option<&Arc<MentionRecord>> {
        self.mentions.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Sorted, de-duplicated sender names (choices for the user filter).
    pub fn unique_senders(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .mentions
            .iter()
            .map(|m| m.sender.name.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    // ===== Mutations =====

    /// Replace the whole collection (initial load / reset).
    /// Later duplicates of an id are dropped.
    pub fn set_mentions(&mut self, records: Vec<MentionRecord>) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut mentions = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.id.clone()) {
                tracing::warn!(id = %record.id, "Dropping duplicate mention id");
                continue;
            }
            mentions.push(Arc::new(record));
        }

        tracing::info!(count = mentions.len(), "Loaded mentions");
        self.mentions = Arc::new(mentions);
    }

    /// Set a record's status. Unknown ids are ignored; returns whether the id
    /// was found.
    ///
    /// Moving out of `Archived` clears the archive date. Asking for
    /// `Archived` here archives with the default snooze from now, so an
    /// archived record always carries a date.
    pub fn update_mention_status(&mut self, id: &str, status: MentionStatus) -> bool {
        self.update_mention_status_at(id, status, Utc::now())
    }

    pub fn update_mention_status_at(&mut self, id: &str, status: MentionStatus, now: DateTime<Utc>) -> bool {
        if status == MentionStatus::Archived {
            return self.archive_for(id, now);
        }

        self.replace_with(id, |record| {
            if record.status() == status {
                None
            } else {
                Some(record.with_status(status))
            }
        })
    }

    /// Archive a record until `until`. Status and date change together.
    pub fn archive_mention(&mut self, id: &str, until: DateTime<Utc>) -> bool {
        self.replace_with(id, |record| {
            if record.status() == MentionStatus::Archived && record.archive_until() == Some(until) {
                None
            } else {
                Some(record.archived_until(until))
            }
        })
    }

    /// Archive a record for the configured snooze duration. A snooze that
    /// runs past the representable range is clamped to the latest date.
    pub fn archive_for(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let until = now.checked_add_signed(self.archive_snooze).unwrap_or_else(|| {
            tracing::warn!(id, snooze_secs = self.archive_snooze.num_seconds(), "Archive snooze out of range, clamping");
            DateTime::<Utc>::MAX_UTC
        });
        self.archive_mention(id, until)
    }

    /// Copy-on-write replacement of a single record. `update` returns `None`
    /// when the record would not change, in which case the current snapshot
    /// is kept.
    fn replace_with<F>(&mut self, id: &str, update: F) -> bool
    where
        F: FnOnce(&MentionRecord) -> Option<MentionRecord>,
    {
        let Some(pos) = self.mentions.iter().position(|m| m.id == id) else {
            tracing::debug!(id, "Mention not found, ignoring update");
            return false;
        };

        let Some(updated) = update(&self.mentions[pos]) else {
            return true;
        };

        tracing::debug!(id, status = %updated.status(), "Updated mention");
        let mut next: Vec<Arc<MentionRecord>> = self.mentions.iter().cloned().collect();
        next[pos] = Arc::new(updated);
        self.mentions = Arc::new(next);
        true
    }
}
