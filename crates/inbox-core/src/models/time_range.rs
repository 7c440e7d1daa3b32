use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::UnknownVariant;
use crate::constants::{MONTH_WINDOW_SECS, WEEK_WINDOW_SECS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Since local midnight
    Today,
    /// Sliding 7 x 24h window
    ThisWeek,
    /// Sliding 30 x 24h window
    ThisMonth,
    #[default]
    All,
}

impl TimeRange {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::All => "All time",
        }
    }

    pub fn cycle_next(self) -> Self {
        match self {
            Self::All => Self::Today,
            Self::Today => Self::ThisWeek,
            Self::ThisWeek => Self::ThisMonth,
            Self::ThisMonth => Self::All,
        }
    }

    /// Earliest timestamp that still falls inside the window, or `None` for
    /// `All`. "Today" is midnight in the time zone of `now`.
    pub fn cutoff<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let now_utc = now.with_timezone(&Utc);
        match self {
            Self::Today => Some(start_of_day(now)),
            Self::ThisWeek => Some(now_utc - Duration::seconds(WEEK_WINDOW_SECS)),
            Self::ThisMonth => Some(now_utc - Duration::seconds(MONTH_WINDOW_SECS)),
            Self::All => None,
        }
    }

    pub fn contains<Tz: TimeZone>(&self, timestamp: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => timestamp >= cutoff,
            None => true,
        }
    }
}

impl FromStr for TimeRange {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "today" => Ok(Self::Today),
            "this_week" | "week" => Ok(Self::ThisWeek),
            "this_month" | "month" => Ok(Self::ThisMonth),
            "all" => Ok(Self::All),
            _ => Err(UnknownVariant::new("time range", s)),
        }
    }
}

fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let zone = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::default());
    // A DST gap can skip midnight; the day then starts at the first local
    // time after the gap.
    [midnight, midnight + Duration::hours(1)]
        .iter()
        .find_map(|local| zone.from_local_datetime(local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
