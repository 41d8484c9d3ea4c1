use crate::models::{Area, AreaCounts};
use serde::{Deserialize, Serialize};

/// Line shown in the recent-history list when nothing has been recorded.
pub const EMPTY_HISTORY_LINE: &str = "No recent data yet";

/// Live counts for one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaStatus {
    pub area: Area,
    pub occupied: u64,
    pub available: u64,
}

impl AreaStatus {
    pub fn new(area: Area, counts: AreaCounts) -> Self {
        Self {
            area,
            occupied: counts.occupied,
            available: counts.available,
        }
    }
}

/// Everything the live dashboard page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub areas: Vec<AreaStatus>,
    /// Recent history lines, newest first.
    pub recent: Vec<String>,
    pub sample_count: usize,
    pub revision: u64,
}

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const DASHBOARD_STREAM_PATH: &str = "/dashboard/stream";
