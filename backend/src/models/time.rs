//! Timestamp and range utilities.
//!
//! All timestamps are epoch milliseconds (`i64`), the unit used by the feed.
//! Human readable strings are rendered in a [`DisplayZone`], which is either
//! the host's local zone or a fixed UTC offset from configuration.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, SecondsFormat, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Clock time shown in history lines and the `time` CSV column.
pub const TIME_FORMAT: &str = "%-I:%M:%S %p";
/// Date and time shown in the `when` column of the analytics export.
pub const WHEN_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const LABEL_FORMAT_DAY: &str = "%H:%M";
const LABEL_FORMAT_LONG: &str = "%m/%d %H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Named analytics window.
///
/// Unknown keys resolve to [`TimeRange::Day`]. Callers hand us whatever the
/// range selector produced, so the lenient parse is the one to use for user
/// input; [`TimeRange::parse`] exists for places that must reject typos
/// (configuration validation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "365d")]
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Year,
    ];

    /// Strict parse of a range key.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "24h" => Some(TimeRange::Day),
            "7d" => Some(TimeRange::Week),
            "30d" => Some(TimeRange::Month),
            "365d" => Some(TimeRange::Year),
            _ => None,
        }
    }

    /// Lenient parse: unrecognized keys fall back to the 24 hour window.
    pub fn from_key(key: &str) -> Self {
        Self::parse(key).unwrap_or_default()
    }

    /// Canonical key, also used in export filenames.
    pub fn key(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Year => "365d",
        }
    }

    pub fn duration_ms(&self) -> i64 {
        match self {
            TimeRange::Day => DAY_MS,
            TimeRange::Week => 7 * DAY_MS,
            TimeRange::Month => 30 * DAY_MS,
            TimeRange::Year => 365 * DAY_MS,
        }
    }

    /// Earliest timestamp still inside the window ending at `now_ms`.
    pub fn cutoff(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.duration_ms())
    }

    fn label_format(&self) -> &'static str {
        match self {
            TimeRange::Day => LABEL_FORMAT_DAY,
            _ => LABEL_FORMAT_LONG,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Window length in milliseconds for a range key (unknown keys → 24h).
pub fn window_duration_ms(key: &str) -> i64 {
    TimeRange::from_key(key).duration_ms()
}

/// Time zone used for human readable renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The host's local zone, including its DST rules.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn utc() -> Self {
        DisplayZone::Fixed(Utc.fix())
    }

    /// Fixed offset east of UTC. `None` if the offset is out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(DisplayZone::Fixed)
    }

    /// Render `ts_ms` with a strftime pattern. Timestamps outside the
    /// calendar range render as an empty string.
    pub fn format(&self, ts_ms: i64, pattern: &str) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(ts_ms) else {
            return String::new();
        };
        match self {
            DisplayZone::Local => utc.with_timezone(&Local).format(pattern).to_string(),
            DisplayZone::Fixed(offset) => utc.with_timezone(offset).format(pattern).to_string(),
        }
    }

    /// Clock time, e.g. `3:04:05 PM`.
    pub fn format_time(&self, ts_ms: i64) -> String {
        self.format(ts_ms, TIME_FORMAT)
    }

    /// Date and clock time, e.g. `1/2/2024, 3:04:05 PM`.
    pub fn format_when(&self, ts_ms: i64) -> String {
        self.format(ts_ms, WHEN_FORMAT)
    }

    /// Axis label for a chart point inside `range`.
    pub fn format_label(&self, ts_ms: i64, range: TimeRange) -> String {
        self.format(ts_ms, range.label_format())
    }
}

/// UTC ISO-8601 rendering with millisecond precision (`2024-01-02T03:04:05.000Z`).
pub fn format_iso(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Parse an ISO-8601 string into epoch milliseconds.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC) or a
/// bare date (UTC midnight).
pub fn parse_iso(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for pattern in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Whether `ts_ms` maps onto a calendar date chrono can render.
pub fn is_representable(ts_ms: i64) -> bool {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).is_some()
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
