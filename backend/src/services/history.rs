//! History Store: the dashboard's mirror of the feed's history list.
//!
//! The feed always delivers the complete list, so the store is rebuilt from
//! scratch on every emission instead of merged. Records without a resolvable
//! timestamp are skipped; the rest of the snapshot is kept.

use log::info;
use serde_json::Value;

use crate::models::Sample;

/// Owned, ordered collection of resolved samples.
///
/// Order is the order of the last snapshot. Consumers that need time order
/// use [`HistoryStore::sorted_by_timestamp`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    samples: Vec<Sample>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents with the records of a feed snapshot.
    ///
    /// Returns the number of records that were dropped.
    pub fn replace<'a, I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut seen = 0usize;
        let samples: Vec<Sample> = records
            .into_iter()
            .inspect(|_| seen += 1)
            .filter_map(Sample::from_raw)
            .collect();
        let dropped = seen - samples.len();

        info!(
            "History snapshot applied: {} samples kept, {} dropped",
            samples.len(),
            dropped
        );
        self.samples = samples;
        dropped
    }

    /// Replace the contents with a snapshot value as the feed delivers it:
    /// an object keyed by push id, an array, or null for "no history".
    pub fn replace_snapshot(&mut self, snapshot: &Value) -> usize {
        let records = snapshot_records(snapshot);
        self.replace(records)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples ordered by timestamp. Equal timestamps keep snapshot order.
    pub fn sorted_by_timestamp(&self) -> Vec<&Sample> {
        let mut sorted: Vec<&Sample> = self.samples.iter().collect();
        sorted.sort_by_key(|s| s.timestamp);
        sorted
    }

    /// The last `limit` samples in snapshot order, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Sample> {
        let start = self.samples.len().saturating_sub(limit);
        self.samples[start..].iter().rev()
    }
}

/// Flatten a snapshot value into its records.
///
/// Objects contribute their values in key order (push ids sort
/// chronologically), arrays their elements, anything else nothing.
pub fn snapshot_records(snapshot: &Value) -> Vec<&Value> {
    match snapshot {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    }
}
