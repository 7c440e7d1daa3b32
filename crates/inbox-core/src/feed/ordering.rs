use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{MentionRecord, SortBy};
use crate::store::ConnectorIndex;

/// Newest first.
fn by_recency(a: &MentionRecord, b: &MentionRecord) -> Ordering {
    b.timestamp.cmp(&a.timestamp)
}

/// Connector priority descending, then item priority descending.
fn by_priority(connectors: &ConnectorIndex, a: &MentionRecord, b: &MentionRecord) -> Ordering {
    connectors
        .priority_for(b.source)
        .cmp(&connectors.priority_for(a.source))
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
}

/// Stable sort of the filtered items. Items that compare equal keep their
/// incoming order.
pub fn sort_mentions(mentions: &mut [Arc<MentionRecord>], sort_by: SortBy, connectors: &ConnectorIndex) {
    match sort_by {
        SortBy::Priority => mentions.sort_by(|a, b| by_priority(connectors, a, b)),
        SortBy::Recency | SortBy::Manual => mentions.sort_by(|a, b| by_recency(a, b)),
    }
}

/// One conversation's worth of items, in sorted order.
struct ThreadGroup {
    items: Vec<Arc<MentionRecord>>,
    earliest: DateTime<Utc>,
}

/// Cluster thread items after sorting.
///
/// Items without a thread id come first, in their sorted order. Thread groups
/// follow, each emitted contiguously with its members in sorted order. Groups
/// are ordered by their earliest timestamp, newest first; groups with the same
/// earliest timestamp keep the order in which they first appeared.
pub fn group_by_thread(sorted: Vec<Arc<MentionRecord>>) -> Vec<Arc<MentionRecord>> {
    let mut standalone: Vec<Arc<MentionRecord>> = Vec::new();
    let mut groups: Vec<ThreadGroup> = Vec::new();
    let mut group_pos: HashMap<String, usize> = HashMap::new();

    for mention in sorted {
        let Some(thread_id) = mention.thread_id.clone() else {
            standalone.push(mention);
            continue;
        };

        match group_pos.get(&thread_id) {
            Some(&pos) => {
                let group = &mut groups[pos];
                group.earliest = group.earliest.min(mention.timestamp);
                group.items.push(mention);
            }
            None => {
                group_pos.insert(thread_id, groups.len());
                groups.push(ThreadGroup {
                    earliest: mention.timestamp,
                    items: vec![mention],
                });
            }
        }
    }

    groups.sort_by(|a, b| b.earliest.cmp(&a.earliest));

    standalone
        .into_iter()
        .chain(groups.into_iter().flat_map(|g| g.items))
        .collect()
}
