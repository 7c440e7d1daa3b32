use chrono::{DateTime, Utc};
use inbox_core::models::{ConnectorRecord, MentionRecord};

const TITLE_WIDTH: usize = 48;

/// Truncate string to a max length, adding an ellipsis when truncated.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }

    let mut truncated: String = s.chars().take(max_len - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Relative age of `timestamp` as seen from `now` (e.g., "2m ago", "1h ago").
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else if diff < 604800 {
        format!("{}d ago", diff / 86400)
    } else {
        format!("{}w ago", diff / 604800)
    }
}

/// One feed row.
///
/// `>` marks the selection, `!` a highlighted (unread, high-priority source)
/// item, and thread replies are indented under their group.
pub fn format_feed_line(record: &MentionRecord, selected: bool, highlighted: bool, now: DateTime<Utc>) -> String {
    let cursor = if selected { '>' } else { ' ' };
    let flag = if highlighted { '!' } else { ' ' };
    let indent = if record.thread_id.is_some() { "  ↳ " } else { "" };

    format!(
        "{cursor}{flag} {indent}[{}] {:<14} {:<8} {:<13} {} · {} · {}",
        record.source,
        record.tag_type().label(),
        record.status().as_str(),
        record.id,
        truncate_with_ellipsis(record.title(), TITLE_WIDTH),
        record.sender.name,
        format_relative_time(record.timestamp, now),
    )
}

/// Detail view for a single record.
pub fn format_detail(record: &MentionRecord, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        record.title().to_string(),
        format!(
            "{} · {} · {}",
            record.source,
            record.kind.label(),
            format_relative_time(record.timestamp, now)
        ),
    ];

    let mut from = format!("From: {}", record.sender.name);
    if let Some(role) = &record.sender.role {
        from.push_str(&format!(" ({})", role));
    }
    lines.push(from);

    lines.push(format!(
        "Tag: {} · Priority: {} · Status: {}",
        record.tag_type().label(),
        record.priority,
        record.status()
    ));
    if let Some(until) = record.archive_until() {
        lines.push(format!("Archived until {}", until.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(label) = &record.group_label {
        lines.push(format!("Group: {}", label));
    }
    if let Some(thread_id) = &record.thread_id {
        lines.push(format!("In thread: {}", thread_id));
    }

    lines.push(String::new());
    lines.push(record.content().to_string());
    if !record.context.is_empty() {
        lines.push(String::new());
        lines.push(format!("Context: {}", record.context));
    }

    lines.push(String::new());
    lines.push("Why this is prioritized:".to_string());
    for reason in record.priority_explanations() {
        lines.push(format!("  - {}", reason));
    }

    if !record.actions.source_url.is_empty() {
        lines.push(String::new());
        lines.push(format!("Open: {}", record.actions.source_url));
    }
    lines
}

pub fn format_connector_line(connector: &ConnectorRecord) -> String {
    let state = match (connector.is_enabled, connector.is_connected) {
        (false, _) => "disabled",
        (true, false) => "disconnected",
        (true, true) => "enabled",
    };
    format!(
        "{:<10} {:<8} [{}] priority {} ({}) · {}",
        connector.id,
        connector.name,
        connector.source,
        connector.priority,
        connector.priority_description(),
        state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use inbox_core::models::{MentionDraft, MentionKind, MentionSource, Priority, Sender};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn make_test_mention() -> MentionRecord {
        MentionRecord::ingest(
            MentionDraft::new(
                MentionKind::Assignment,
                MentionSource::Email,
                Sender::named("Lisa Wang").with_role("CEO"),
                now() - Duration::minutes(15),
                "Action Required: Q4 Budget Review",
                "Please approve the budget by Friday.",
                Priority::High,
            )
            .with_id("email-1"),
        )
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(format_relative_time(now(), now()), "just now");
        assert_eq!(format_relative_time(now() - Duration::minutes(5), now()), "5m ago");
        assert_eq!(format_relative_time(now() - Duration::hours(3), now()), "3h ago");
        assert_eq!(format_relative_time(now() - Duration::days(2), now()), "2d ago");
        assert_eq!(format_relative_time(now() - Duration::days(21), now()), "3w ago");
        // Future timestamps are clamped
        assert_eq!(format_relative_time(now() + Duration::hours(1), now()), "just now");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("exactly ten", 8), "exact...");
        assert_eq!(truncate_with_ellipsis("abcdef", 2), "..");
    }

    #[test]
    fn test_feed_line_markers() {
        let record = make_test_mention();
        let line = format_feed_line(&record, true, true, now());
        assert!(line.starts_with(">!"));
        assert!(line.contains("[email]"));
        assert!(line.contains("Action Needed"));
        assert!(line.contains("15m ago"));

        let plain = format_feed_line(&record, false, false, now());
        assert!(plain.starts_with("  "));
    }

    #[test]
    fn test_detail_includes_explanations() {
        let lines = format_detail(&make_test_mention(), now());
        assert_eq!(lines[0], "Action Required: Q4 Budget Review");
        assert!(lines.contains(&"From: Lisa Wang (CEO)".to_string()));
        assert!(lines.contains(&"  - Urgency signals: action required".to_string()));
    }

    #[test]
    fn test_connector_line() {
        let connector = ConnectorRecord::new("slack-1", "Slack", MentionSource::Chat, 5);
        let line = format_connector_line(&connector);
        assert!(line.contains("priority 5"));
        assert!(line.contains("[chat]"));
    }
}
