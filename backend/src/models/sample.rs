use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::area::{Area, AreaCounts};
use super::time::{format_iso, is_representable, parse_iso, DisplayZone};

/// One timestamped occupancy observation for one area.
///
/// `iso` and `time` are the display strings the upstream writer attached, if
/// any. They are caches of `timestamp`, never independent state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub area: String,
    pub occupied: u64,
    pub available: u64,
    #[serde(rename = "ts")]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Sample {
    pub fn new(area: impl Into<String>, counts: AreaCounts, timestamp: i64) -> Self {
        Self {
            area: area.into(),
            occupied: counts.occupied,
            available: counts.available,
            timestamp,
            iso: None,
            time: None,
        }
    }

    /// Build a sample from one raw feed record.
    ///
    /// Returns `None` when the record is not an object or carries no
    /// resolvable timestamp.
    pub fn from_raw(record: &Value) -> Option<Self> {
        let object = record.as_object()?;

        let Some(timestamp) = resolve_timestamp(record) else {
            debug!("Dropping history record without a resolvable timestamp: {}", record);
            return None;
        };

        let area = match object.get("area") {
            Some(Value::String(tag)) => tag.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Some(Self {
            area,
            occupied: count_field(object.get("occupied")),
            available: count_field(object.get("available")),
            timestamp,
            iso: string_field(object.get("iso")),
            time: string_field(object.get("time")),
        })
    }

    /// The known area this sample belongs to, if any.
    pub fn known_area(&self) -> Option<Area> {
        Area::from_tag(&self.area)
    }

    pub fn counts(&self) -> AreaCounts {
        AreaCounts::new(self.occupied, self.available)
    }

    /// Upstream `iso` string, or the UTC rendering of `timestamp`.
    pub fn iso_or_derived(&self) -> String {
        self.iso
            .clone()
            .unwrap_or_else(|| format_iso(self.timestamp))
    }

    /// Upstream `time` string, or the clock time of `timestamp` in `zone`.
    pub fn time_or_derived(&self, zone: &DisplayZone) -> String {
        self.time
            .clone()
            .unwrap_or_else(|| zone.format_time(self.timestamp))
    }
}

/// Resolve a record's timestamp in epoch milliseconds.
///
/// A finite numeric `ts` wins; otherwise `iso` is parsed. Values that do not
/// land on a renderable calendar date are rejected.
pub fn resolve_timestamp(record: &Value) -> Option<i64> {
    let numeric = record.get("ts").and_then(numeric_millis);
    let resolved = numeric.or_else(|| record.get("iso").and_then(Value::as_str).and_then(parse_iso))?;
    is_representable(resolved).then_some(resolved)
}

fn numeric_millis(value: &Value) -> Option<i64> {
    if let Some(ms) = value.as_i64() {
        return Some(ms);
    }
    let ms = value.as_f64()?;
    if ms.is_finite() && ms >= i64::MIN as f64 && ms <= i64::MAX as f64 {
        Some(ms.trunc() as i64)
    } else {
        None
    }
}

fn count_field(value: Option<&Value>) -> u64 {
    let Some(value) = value else {
        return 0;
    };
    if let Some(count) = value.as_u64() {
        return count;
    }
    match value.as_f64() {
        Some(count) if count.is_finite() && count >= 0.0 => count.trunc() as u64,
        _ => 0,
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}
