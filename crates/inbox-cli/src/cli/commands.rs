use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use inbox_core::models::{parse_lenient, FilterUpdate, MentionKind, MentionSource, SortBy, TimeRange};
use inbox_core::{load_fixtures, sample_inbox, InboxState};
use serde::Serialize;

use super::config::CliConfig;
use super::format::{format_connector_line, format_detail, format_feed_line};

/// Build the inbox from a fixture file, or the built-in sample when none is
/// configured. `fixtures` overrides the path from the config file.
pub fn load_state(config: &CliConfig, fixtures: Option<&Path>) -> Result<InboxState> {
    let core_config = config.core_config()?;
    let path = fixtures.or(config.fixtures_path.as_deref());

    let data = match path {
        Some(path) => {
            load_fixtures(path).with_context(|| format!("Failed to load fixtures: {}", path.display()))?
        }
        None => {
            tracing::debug!("No fixtures configured, using the sample inbox");
            sample_inbox(Utc::now())
        }
    };

    Ok(InboxState::with_data(core_config, data.connectors, data.mentions))
}

/// Raw filter flags as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub sources: Vec<String>,
    pub kinds: Vec<String>,
    pub users: Vec<String>,
    pub time_range: Option<String>,
    pub sort_by: Option<String>,
    pub hide_disabled: bool,
}

impl FilterArgs {
    /// Unknown source and kind names are dropped (logged) so they match
    /// nothing. A bad time range or sort order is an error since there is no
    /// sensible value to fall back to.
    pub fn to_update(&self) -> Result<FilterUpdate> {
        let mut update = FilterUpdate::default();

        if !self.sources.is_empty() {
            update.sources = Some(parse_lenient::<MentionSource, _>(&self.sources));
        }
        if !self.kinds.is_empty() {
            update.kinds = Some(parse_lenient::<MentionKind, _>(&self.kinds));
        }
        if !self.users.is_empty() {
            update.users = Some(self.users.clone());
        }
        if let Some(range) = &self.time_range {
            update.time_range = Some(range.parse::<TimeRange>().map_err(|e| anyhow!(e))?);
        }
        if let Some(sort_by) = &self.sort_by {
            update.sort_by = Some(sort_by.parse::<SortBy>().map_err(|e| anyhow!(e))?);
        }
        if self.hide_disabled {
            update.hide_disabled_sources = Some(true);
        }
        Ok(update)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

/// Feed as display lines: summary header, then one row per item.
pub fn feed_lines(state: &InboxState) -> Vec<String> {
    let now = Utc::now();
    let feed = state.feed();
    let mut lines = vec![feed.summary(state.filters())];

    if feed.is_empty() {
        lines.push("No mentions match the current filters.".to_string());
        return lines;
    }

    let selected = state.selected_id();
    for record in &feed.items {
        lines.push(format_feed_line(
            record,
            selected == Some(record.id.as_str()),
            state.is_highlighted(record),
            now,
        ));
    }
    lines
}

pub fn handle_feed(state: &mut InboxState, args: &FilterArgs, json: bool, pretty: bool) -> Result<Vec<String>> {
    state.set_filters(args.to_update()?);
    if json {
        return Ok(vec![to_json(&state.feed().items, pretty)?]);
    }
    Ok(feed_lines(state))
}

pub fn handle_show(state: &InboxState, id: &str, json: bool, pretty: bool) -> Result<Vec<String>> {
    let record = state
        .get_mention(id)
        .ok_or_else(|| anyhow!("No mention with id '{}'", id))?;
    if json {
        return Ok(vec![to_json(record, pretty)?]);
    }
    Ok(format_detail(record, Utc::now()))
}

pub fn handle_senders(state: &InboxState, json: bool, pretty: bool) -> Result<Vec<String>> {
    let senders = state.unique_senders();
    if json {
        return Ok(vec![to_json(&senders, pretty)?]);
    }
    Ok(senders)
}

pub fn handle_connectors(state: &InboxState, json: bool, pretty: bool) -> Result<Vec<String>> {
    if json {
        return Ok(vec![to_json(state.connectors(), pretty)?]);
    }
    Ok(state.connectors().iter().map(format_connector_line).collect())
}
