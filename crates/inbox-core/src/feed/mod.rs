//! Read side of the inbox: filter, sort, thread grouping and selection.
//!
//! Nothing in here mutates a record. The feed is recomputed from a store
//! snapshot whenever the view needs it.

pub mod filter;
pub mod ordering;
pub mod selection;

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::models::{FilterState, MentionRecord};
use crate::store::ConnectorIndex;

pub use filter::{matches, matches_with_connectors};
pub use ordering::{group_by_thread, sort_mentions};
pub use selection::Selection;

/// The assembled, display-ordered feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feed {
    pub items: Vec<Arc<MentionRecord>>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|m| m.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|m| m.id == id)
    }

    /// Header line for the feed, e.g. "2 items · chat, email".
    pub fn summary(&self, filters: &FilterState) -> String {
        let noun = if self.items.len() == 1 { "item" } else { "items" };
        match filters.narrowed_sources_label() {
            Some(sources) => format!("{} {} · {}", self.items.len(), noun, sources),
            None => format!("{} {}", self.items.len(), noun),
        }
    }
}

/// Filter, sort and group `mentions` for display.
pub fn assemble_feed<Tz: TimeZone>(
    mentions: &[Arc<MentionRecord>],
    filters: &FilterState,
    connectors: &ConnectorIndex,
    now: &DateTime<Tz>,
) -> Feed {
    let mut filtered: Vec<Arc<MentionRecord>> = mentions
        .iter()
        .filter(|m| matches_with_connectors(m, filters, connectors, now))
        .cloned()
        .collect();

    sort_mentions(&mut filtered, filters.sort_by, connectors);
    let items = group_by_thread(filtered);

    tracing::debug!(
        total = mentions.len(),
        shown = items.len(),
        sort_by = ?filters.sort_by,
        "Assembled feed"
    );
    Feed { items }
}
