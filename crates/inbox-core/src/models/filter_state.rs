use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MentionKind, MentionSource, TimeRange, UnknownVariant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Recency,
    Priority,
    /// No stored manual order exists, so this orders like `Recency`
    Manual,
}

impl FromStr for SortBy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" | "recent" => Ok(Self::Recency),
            "priority" => Ok(Self::Priority),
            "manual" => Ok(Self::Manual),
            _ => Err(UnknownVariant::new("sort order", s)),
        }
    }
}

/// User-chosen view constraints for the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub sources: Vec<MentionSource>,
    #[serde(rename = "types")]
    pub kinds: Vec<MentionKind>,
    /// Sender names; empty means everyone
    pub users: Vec<String>,
    pub time_range: TimeRange,
    pub sort_by: SortBy,
    /// Also drop items whose connector is disabled
    pub hide_disabled_sources: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sources: MentionSource::ALL.to_vec(),
            kinds: MentionKind::ALL.to_vec(),
            users: Vec::new(),
            time_range: TimeRange::All,
            sort_by: SortBy::Recency,
            hide_disabled_sources: false,
        }
    }
}

impl FilterState {
    /// Merge a partial update; unspecified fields keep their values.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(sources) = update.sources {
            self.sources = sources;
        }
        if let Some(kinds) = update.kinds {
            self.kinds = kinds;
        }
        if let Some(users) = update.users {
            self.users = users;
        }
        if let Some(time_range) = update.time_range {
            self.time_range = time_range;
        }
        if let Some(sort_by) = update.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(hide) = update.hide_disabled_sources {
            self.hide_disabled_sources = hide;
        }
    }

    pub fn toggle_source(&mut self, source: MentionSource) {
        toggle(&mut self.sources, source);
    }

    pub fn toggle_kind(&mut self, kind: MentionKind) {
        toggle(&mut self.kinds, kind);
    }

    pub fn toggle_user(&mut self, user: &str) {
        toggle(&mut self.users, user.to_string());
    }

    /// Reset every constraint. The sort order is a view preference and stays.
    pub fn clear(&mut self) {
        *self = Self {
            sort_by: self.sort_by,
            ..Self::default()
        };
    }

    pub fn has_active_filters(&self) -> bool {
        self.sources.len() < MentionSource::ALL.len()
            || self.kinds.len() < MentionKind::ALL.len()
            || !self.users.is_empty()
            || self.time_range != TimeRange::All
    }

    /// Selected source names when the view is narrowed to some of them.
    pub fn narrowed_sources_label(&self) -> Option<String> {
        if self.sources.is_empty() || self.sources.len() >= MentionSource::ALL.len() {
            return None;
        }
        let names: Vec<&str> = self.sources.iter().map(MentionSource::as_str).collect();
        Some(names.join(", "))
    }
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

/// Partial [`FilterState`] update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterUpdate {
    pub sources: Option<Vec<MentionSource>>,
    #[serde(rename = "types")]
    pub kinds: Option<Vec<MentionKind>>,
    pub users: Option<Vec<String>>,
    pub time_range: Option<TimeRange>,
    pub sort_by: Option<SortBy>,
    pub hide_disabled_sources: Option<bool>,
}

/// Parse user-supplied values, dropping the ones that are not recognized.
///
/// A dropped value would never match anything, so excluding it up front
/// gives the same feed without failing the whole request.
pub fn parse_lenient<T, S>(values: &[S]) -> Vec<T>
where
    T: FromStr<Err = UnknownVariant> + PartialEq,
    S: AsRef<str>,
{
    let mut parsed: Vec<T> = Vec::new();
    for raw in values {
        match raw.as_ref().parse::<T>() {
            Ok(value) if !parsed.contains(&value) => parsed.push(value),
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring filter value: {}", e),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_everything() {
        let filters = FilterState::default();
        assert_eq!(filters.sources.len(), 3);
        assert_eq!(filters.kinds.len(), 3);
        assert!(!filters.has_active_filters());
        assert!(filters.narrowed_sources_label().is_none());
    }

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let mut filters = FilterState::default();
        filters.apply(FilterUpdate {
            sort_by: Some(SortBy::Priority),
            ..Default::default()
        });
        filters.apply(FilterUpdate {
            sources: Some(vec![MentionSource::Chat]),
            ..Default::default()
        });

        assert_eq!(filters.sort_by, SortBy::Priority);
        assert_eq!(filters.sources, vec![MentionSource::Chat]);
        assert_eq!(filters.kinds.len(), 3);
        assert!(filters.has_active_filters());
        assert_eq!(filters.narrowed_sources_label().as_deref(), Some("chat"));
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filters = FilterState {
            sort_by: SortBy::Manual,
            ..Default::default()
        };
        filters.toggle_source(MentionSource::Email);
        assert!(!filters.sources.contains(&MentionSource::Email));
        filters.toggle_source(MentionSource::Email);
        assert!(filters.sources.contains(&MentionSource::Email));

        filters.toggle_user("Sarah Chen");
        assert_eq!(filters.users, vec!["Sarah Chen".to_string()]);
        filters.toggle_kind(MentionKind::Assignment);
        filters.time_range = TimeRange::Today;
        assert!(filters.has_active_filters());

        filters.clear();
        assert!(!filters.has_active_filters());
        assert_eq!(filters.sort_by, SortBy::Manual);
    }

    #[test]
    fn test_parse_lenient_drops_unknown() {
        let sources: Vec<MentionSource> = parse_lenient(&["chat", "pager", "slack", "email"]);
        assert_eq!(sources, vec![MentionSource::Chat, MentionSource::Email]);

        let kinds: Vec<MentionKind> = parse_lenient::<MentionKind, &str>(&[]);
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_deserialize_update() {
        let update: FilterUpdate =
            serde_json::from_str(r#"{"types": ["assignment"], "timeRange": "this_week"}"#).unwrap();
        assert_eq!(update.kinds, Some(vec![MentionKind::Assignment]));
        assert_eq!(update.time_range, Some(TimeRange::ThisWeek));
        assert!(update.sources.is_none());
    }
}
