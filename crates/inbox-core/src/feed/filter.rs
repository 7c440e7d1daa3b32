use chrono::{DateTime, TimeZone};

use crate::models::{FilterState, MentionRecord};
use crate::store::ConnectorIndex;

/// Whether a record passes the filter constraints at time `now`.
///
/// All checks must pass: source, kind, sender (only when a user list is
/// given), then the time window.
pub fn matches<Tz: TimeZone>(record: &MentionRecord, filters: &FilterState, now: &DateTime<Tz>) -> bool {
    if !filters.sources.contains(&record.source) {
        return false;
    }
    if !filters.kinds.contains(&record.kind) {
        return false;
    }
    if !filters.users.is_empty() && !filters.users.iter().any(|u| *u == record.sender.name) {
        return false;
    }
    filters.time_range.contains(record.timestamp, now)
}

/// [`matches`] plus the connector-enablement check, when that is switched on.
pub fn matches_with_connectors<Tz: TimeZone>(
    record: &MentionRecord,
    filters: &FilterState,
    connectors: &ConnectorIndex,
    now: &DateTime<Tz>,
) -> bool {
    if filters.hide_disabled_sources && !connectors.is_enabled(record.source) {
        return false;
    }
    matches(record, filters, now)
}
