//! Line-oriented triage session over an in-memory inbox.
//!
//! Every command runs to completion against [`InboxState`], which recomputes
//! the feed and repairs the selection before the next prompt. Nothing is
//! written back to disk.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use inbox_core::constants::{MAX_CONNECTOR_PRIORITY, MIN_CONNECTOR_PRIORITY};
use inbox_core::models::{
    parse_lenient, ConnectorUpdate, FilterUpdate, MentionKind, MentionSource, MentionStatus, SortBy, TimeRange,
};
use inbox_core::InboxState;

use super::commands::feed_lines;
use super::format::format_detail;

const PROMPT: &str = "inbox> ";

const HELP_LINES: &[&str] = &[
    "Commands:",
    "  feed                              show the current feed",
    "  select <id>                       open an item",
    "  show                              details of the selected item",
    "  done|read|unread <id>             change an item's status",
    "  archive <id> [hours]              archive (default snooze if no hours)",
    "  filter <key>=<v1,v2>              key: source, kind, user, hide-disabled",
    "  sort <recency|priority|manual>    change the sort order",
    "  range <today|week|month|all>      change the time window",
    "  clear                             reset filters (keeps sort)",
    "  connector <id> priority=N         set connector priority (1-5)",
    "  connector <id> enabled=true|false enable or disable a connector",
    "  help                              this text",
    "  quit                              leave",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Feed,
    Select(String),
    Show,
    SetStatus(String, MentionStatus),
    Archive { id: String, hours: Option<i64> },
    Filter(FilterUpdate),
    Sort(SortBy),
    Range(TimeRange),
    Clear,
    Connector { id: String, update: ConnectorUpdate },
    Help,
    Quit,
}

/// Parse one input line. Errors are user-facing messages.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let require_id = |usage: &str| -> Result<String, String> {
        let id = rest.split_whitespace().next().unwrap_or("");
        if id.is_empty() {
            Err(format!("usage: {}", usage))
        } else {
            Ok(id.to_string())
        }
    };

    match cmd.to_ascii_lowercase().as_str() {
        "feed" | "ls" => Ok(ReplCommand::Feed),
        "select" => Ok(ReplCommand::Select(require_id("select <id>")?)),
        "show" => Ok(ReplCommand::Show),
        "done" => Ok(ReplCommand::SetStatus(require_id("done <id>")?, MentionStatus::Done)),
        "read" => Ok(ReplCommand::SetStatus(require_id("read <id>")?, MentionStatus::Read)),
        "unread" => Ok(ReplCommand::SetStatus(require_id("unread <id>")?, MentionStatus::Unread)),
        "archive" => {
            let id = require_id("archive <id> [hours]")?;
            let hours = match rest.split_whitespace().nth(1) {
                Some(raw) => match raw.parse::<i64>() {
                    Ok(hours) if hours > 0 => Some(hours),
                    _ => return Err(format!("invalid number of hours: {}", raw)),
                },
                None => None,
            };
            Ok(ReplCommand::Archive { id, hours })
        }
        "filter" => parse_filter(rest).map(ReplCommand::Filter),
        "sort" => rest.parse::<SortBy>().map(ReplCommand::Sort).map_err(|e| e.to_string()),
        "range" => rest.parse::<TimeRange>().map(ReplCommand::Range).map_err(|e| e.to_string()),
        "clear" => Ok(ReplCommand::Clear),
        "connector" => parse_connector(rest),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command: {} (try 'help')", other)),
    }
}

/// `source=chat,email`, `kind=mention`, `user=Sarah Chen,Lisa Wang`,
/// `hide-disabled=true`. An empty value list resets that dimension.
fn parse_filter(arg: &str) -> Result<FilterUpdate, String> {
    let Some((key, value)) = arg.split_once('=') else {
        return Err("usage: filter <key>=<v1,v2>".to_string());
    };
    let values: Vec<&str> = value.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();

    let mut update = FilterUpdate::default();
    match key.trim().to_ascii_lowercase().as_str() {
        "source" | "sources" => {
            update.sources = Some(if values.is_empty() {
                MentionSource::ALL.to_vec()
            } else {
                parse_lenient(&values)
            });
        }
        "kind" | "kinds" | "type" | "types" => {
            update.kinds = Some(if values.is_empty() {
                MentionKind::ALL.to_vec()
            } else {
                parse_lenient(&values)
            });
        }
        "user" | "users" => {
            update.users = Some(values.iter().map(|v| v.to_string()).collect());
        }
        "hide-disabled" | "hide_disabled" => {
            update.hide_disabled_sources = Some(parse_bool(value.trim())?);
        }
        other => return Err(format!("unknown filter key: {}", other)),
    }
    Ok(update)
}

fn parse_connector(arg: &str) -> Result<ReplCommand, String> {
    const USAGE: &str = "usage: connector <id> priority=N|enabled=true|false";

    let mut parts = arg.split_whitespace();
    let (Some(id), Some(setting)) = (parts.next(), parts.next()) else {
        return Err(USAGE.to_string());
    };
    let Some((key, value)) = setting.split_once('=') else {
        return Err(USAGE.to_string());
    };

    let update = match key.to_ascii_lowercase().as_str() {
        "priority" => {
            let priority = value
                .parse::<u8>()
                .ok()
                .filter(|p| (MIN_CONNECTOR_PRIORITY..=MAX_CONNECTOR_PRIORITY).contains(p))
                .ok_or_else(|| {
                    format!(
                        "priority must be between {} and {}",
                        MIN_CONNECTOR_PRIORITY, MAX_CONNECTOR_PRIORITY
                    )
                })?;
            ConnectorUpdate::priority(priority)
        }
        "enabled" => ConnectorUpdate::enabled(parse_bool(value)?),
        _ => return Err(USAGE.to_string()),
    };
    Ok(ReplCommand::Connector {
        id: id.to_string(),
        update,
    })
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("expected true or false, got: {}", value)),
    }
}

pub struct ReplSession {
    state: InboxState,
    finished: bool,
}

impl ReplSession {
    pub fn new(state: InboxState) -> Self {
        Self { state, finished: false }
    }

    pub fn state(&self) -> &InboxState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one input line and return what to print.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        if line.trim().is_empty() {
            return Vec::new();
        }
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(message) => vec![format!("error: {}", message)],
        }
    }

    pub fn execute(&mut self, command: ReplCommand) -> Vec<String> {
        match command {
            ReplCommand::Feed => feed_lines(&self.state),
            ReplCommand::Select(id) => {
                if !self.state.select_id(&id) {
                    return vec![format!("error: no mention with id '{}'", id)];
                }
                self.selected_detail()
            }
            ReplCommand::Show => self.selected_detail(),
            ReplCommand::SetStatus(id, status) => {
                if !self.state.update_mention_status(&id, status) {
                    return vec![format!("error: no mention with id '{}'", id)];
                }
                vec![format!("{} marked {}", id, status)]
            }
            ReplCommand::Archive { id, hours } => {
                let now = Utc::now();
                let found = match hours {
                    Some(hours) => {
                        let Some(until) = TimeDelta::try_hours(hours).and_then(|span| now.checked_add_signed(span))
                        else {
                            return vec!["error: invalid number of hours".to_string()];
                        };
                        self.state.archive_mention(&id, until)
                    }
                    None => self.state.archive_for(&id, now),
                };
                if !found {
                    return vec![format!("error: no mention with id '{}'", id)];
                }
                let until = self
                    .state
                    .get_mention(&id)
                    .and_then(|m| m.archive_until())
                    .map(|until| until.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_default();
                vec![format!("{} archived until {}", id, until)]
            }
            ReplCommand::Filter(update) => {
                self.state.set_filters(update);
                feed_lines(&self.state)
            }
            ReplCommand::Sort(sort_by) => {
                self.state.set_filters(FilterUpdate {
                    sort_by: Some(sort_by),
                    ..Default::default()
                });
                feed_lines(&self.state)
            }
            ReplCommand::Range(time_range) => {
                self.state.set_filters(FilterUpdate {
                    time_range: Some(time_range),
                    ..Default::default()
                });
                feed_lines(&self.state)
            }
            ReplCommand::Clear => {
                self.state.clear_filters();
                feed_lines(&self.state)
            }
            ReplCommand::Connector { id, update } => {
                if !self.state.update_connector(&id, &update) {
                    return vec![format!("error: no connector with id '{}'", id)];
                }
                match self.state.connector_store().get(&id) {
                    Some(c) => vec![format!(
                        "{} priority {} ({}), {}",
                        c.name,
                        c.priority,
                        c.priority_description(),
                        if c.is_enabled { "enabled" } else { "disabled" }
                    )],
                    None => Vec::new(),
                }
            }
            ReplCommand::Help => HELP_LINES.iter().map(|l| l.to_string()).collect(),
            ReplCommand::Quit => {
                self.finished = true;
                Vec::new()
            }
        }
    }

    fn selected_detail(&self) -> Vec<String> {
        match self.state.selected_mention() {
            Some(record) => format_detail(record, Utc::now()),
            None => vec!["Nothing selected.".to_string()],
        }
    }

    /// Read commands from `input` until EOF or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in feed_lines(&self.state) {
            writeln!(output, "{}", line).context("Failed to write output")?;
        }
        write!(output, "{}", PROMPT).context("Failed to write output")?;
        output.flush().context("Failed to flush output")?;

        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            for out in self.handle_line(&line) {
                writeln!(output, "{}", out).context("Failed to write output")?;
            }
            if self.finished {
                break;
            }
            write!(output, "{}", PROMPT).context("Failed to write output")?;
            output.flush().context("Failed to flush output")?;
        }
        Ok(())
    }
}
