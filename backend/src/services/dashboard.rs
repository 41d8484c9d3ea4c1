//! Live dashboard state for one session.
//!
//! [`Dashboard`] owns the History Store and the live counts of every area.
//! It is created once per session and handed to whoever needs it; the feed
//! sync task is its only writer.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::db::repository::AreaCountsMap;
use crate::models::{Area, AreaCounts, DisplayZone, Sample};
use crate::routes::dashboard::{AreaStatus, DashboardData, EMPTY_HISTORY_LINE};
use crate::services::history::HistoryStore;

/// Number of history lines shown on the live page unless configured.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Dashboard shared between the feed sync task and request handlers.
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Debug, Clone)]
pub struct Dashboard {
    store: HistoryStore,
    live: AreaCountsMap,
    recent_limit: usize,
    revision: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

impl Dashboard {
    pub fn new(recent_limit: usize) -> Self {
        Self {
            store: HistoryStore::new(),
            live: Area::ALL
                .iter()
                .map(|area| (*area, AreaCounts::default()))
                .collect(),
            recent_limit,
            revision: 0,
        }
    }

    /// Wrap into the shared handle used by the server.
    pub fn into_shared(self) -> SharedDashboard {
        Arc::new(RwLock::new(self))
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn live_counts(&self, area: Area) -> AreaCounts {
        self.live.get(&area).copied().unwrap_or_default()
    }

    /// Bumped after every applied change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rebuild the History Store from a complete feed snapshot.
    ///
    /// Returns the number of dropped records.
    pub fn apply_history_snapshot(&mut self, snapshot: &Value) -> usize {
        let dropped = self.store.replace_snapshot(snapshot);
        self.revision += 1;
        dropped
    }

    pub fn apply_area_update(&mut self, area: Area, counts: AreaCounts) {
        self.live.insert(area, counts);
        self.revision += 1;
    }

    /// Apply one complete feed emission (live counts plus history) as a
    /// single change.
    pub fn apply_feed(&mut self, counts: &AreaCountsMap, snapshot: &Value) -> u64 {
        for (area, area_counts) in counts {
            self.live.insert(*area, *area_counts);
        }
        self.store.replace_snapshot(snapshot);
        self.revision += 1;
        self.revision
    }

    /// Recent history lines, newest first.
    pub fn recent_lines(&self, zone: &DisplayZone) -> Vec<String> {
        if self.store.is_empty() {
            return vec![EMPTY_HISTORY_LINE.to_string()];
        }
        self.store
            .recent(self.recent_limit)
            .map(|sample| recent_line(sample, zone))
            .collect()
    }

    pub fn view(&self, zone: &DisplayZone) -> DashboardData {
        DashboardData {
            areas: Area::ALL
                .iter()
                .map(|area| AreaStatus::new(*area, self.live_counts(*area)))
                .collect(),
            recent: self.recent_lines(zone),
            sample_count: self.store.len(),
            revision: self.revision,
        }
    }
}

/// `[<time>] Area <area> — Occupied: <n>, Available: <n>`
pub fn recent_line(sample: &Sample, zone: &DisplayZone) -> String {
    format!(
        "[{}] Area {} — Occupied: {}, Available: {}",
        sample.time_or_derived(zone),
        sample.area,
        sample.occupied,
        sample.available
    )
}
