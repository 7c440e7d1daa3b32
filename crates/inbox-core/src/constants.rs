//! Application-wide constants
//!
//! Phrase lists used by signal extraction, plus defaults shared by the
//! stores, the feed and the CLI.

/// Phrases that mark an item as already taken care of.
/// Checked before any other list.
pub const RESOLVED_SIGNALS: &[&str] = &[
    "resolved",
    "completed",
    "done",
    "fixed",
    "closed",
    "finished",
    "merged",
];

/// Phrases that ask the reader to do something.
pub const ACTION_SIGNALS: &[&str] = &[
    "please check",
    "can you",
    "need you to",
    "review",
    "approve",
    "urgent",
    "action required",
    "needs your",
    "asap",
    "by eod",
    "assigned to",
    "can you confirm",
];

/// Phrases that announce something without asking for action.
pub const INFO_SIGNALS: &[&str] = &[
    "fyi",
    "for your information",
    "just wanted to let you know",
    "heads up",
    "update:",
    "reminder:",
    "note:",
];

/// Phrases surfaced as urgency signals, in display order.
pub const URGENCY_PHRASES: &[&str] = &[
    "urgent",
    "asap",
    "critical",
    "immediate",
    "by eod",
    "please check",
    "action required",
];

// Connector defaults
/// Priority assumed for a source that has no connector configured
pub const DEFAULT_CONNECTOR_PRIORITY: u8 = 1;
pub const MIN_CONNECTOR_PRIORITY: u8 = 1;
pub const MAX_CONNECTOR_PRIORITY: u8 = 5;
/// Connectors at or above this priority get their unread items highlighted
pub const HIGH_PRIORITY_CONNECTOR_THRESHOLD: u8 = 4;

// Time windows (sliding, relative to "now")
pub const WEEK_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;
pub const MONTH_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

/// Default archive duration ("archive until tomorrow")
pub const DEFAULT_ARCHIVE_SNOOZE_SECS: i64 = 24 * 60 * 60;

/// Max urgency signals shown in a priority explanation
pub const MAX_EXPLAINED_SIGNALS: usize = 2;

/// Environment variable that enables file logging
pub const LOG_FILE_ENV: &str = "INBOX_LOG_FILE";
