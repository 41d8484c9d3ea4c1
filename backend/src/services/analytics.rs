//! Time-windowed analytics over the History Store.
//!
//! The window is `[now - duration(range), ∞)`: samples stamped in the future
//! relative to `now` stay visible. A zero timestamp means "never stamped" and
//! is always excluded.

use std::collections::BTreeMap;

use crate::models::{Area, DisplayZone, Sample, TimeRange};
use crate::routes::analytics::{AnalyticsData, AreaChart, ChartSeries};
use crate::services::history::HistoryStore;

/// Samples per known area, each sorted ascending by timestamp.
pub type AreaPartitions = BTreeMap<Area, Vec<Sample>>;

/// Whether a sample falls inside a window starting at `cutoff`.
pub fn in_window(sample: &Sample, cutoff: i64) -> bool {
    sample.timestamp != 0 && sample.timestamp >= cutoff
}

/// Filter the store to `range` and partition by area.
///
/// Every known area is present in the result, possibly empty. Samples with an
/// unknown area tag are left out.
pub fn windowed(store: &HistoryStore, range: TimeRange, now_ms: i64) -> AreaPartitions {
    let cutoff = range.cutoff(now_ms);
    let mut partitions: AreaPartitions = Area::ALL.iter().map(|a| (*a, Vec::new())).collect();

    for sample in store.samples() {
        if !in_window(sample, cutoff) {
            continue;
        }
        if let Some(bucket) = sample.known_area().and_then(|a| partitions.get_mut(&a)) {
            bucket.push(sample.clone());
        }
    }

    for bucket in partitions.values_mut() {
        // Stable: equal timestamps keep snapshot order
        bucket.sort_by_key(|s| s.timestamp);
    }

    partitions
}

/// [`windowed`] with a raw selector key. Unknown keys use the 24h window.
pub fn windowed_by_key(store: &HistoryStore, key: &str, now_ms: i64) -> AreaPartitions {
    windowed(store, TimeRange::from_key(key), now_ms)
}

/// Project ordered samples onto chart arrays.
pub fn chart_series(samples: &[Sample], range: TimeRange, zone: &DisplayZone) -> ChartSeries {
    let mut series = ChartSeries {
        labels: Vec::with_capacity(samples.len()),
        timestamps: Vec::with_capacity(samples.len()),
        occupied_series: Vec::with_capacity(samples.len()),
        available_series: Vec::with_capacity(samples.len()),
    };

    for sample in samples {
        series.labels.push(zone.format_label(sample.timestamp, range));
        series.timestamps.push(sample.timestamp);
        series.occupied_series.push(sample.occupied);
        series.available_series.push(sample.available);
    }

    series
}

/// Chart payload for every area in `range`.
pub fn analytics(
    store: &HistoryStore,
    range: TimeRange,
    now_ms: i64,
    zone: &DisplayZone,
) -> AnalyticsData {
    let areas = windowed(store, range, now_ms)
        .into_iter()
        .map(|(area, samples)| AreaChart {
            area,
            series: chart_series(&samples, range, zone),
        })
        .collect();

    AnalyticsData {
        range,
        now: now_ms,
        cutoff: range.cutoff(now_ms),
        areas,
    }
}
