use crate::models::{Area, TimeRange};
use serde::{Deserialize, Serialize};

// =========================================================
// Analytics types + route
// =========================================================

/// Plot-ready series for one area: one label and two values per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    /// Raw timestamps behind `labels`, used as x positions when drawing.
    pub timestamps: Vec<i64>,
    pub occupied_series: Vec<u64>,
    pub available_series: Vec<u64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Chart data for a single area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaChart {
    pub area: Area,
    pub series: ChartSeries,
}

/// Complete analytics payload for one selected range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub range: TimeRange,
    pub now: i64,
    pub cutoff: i64,
    pub areas: Vec<AreaChart>,
}

impl AnalyticsData {
    pub fn chart(&self, area: Area) -> Option<&ChartSeries> {
        self.areas
            .iter()
            .find(|chart| chart.area == area)
            .map(|chart| &chart.series)
    }
}

pub const ANALYTICS_PATH: &str = "/analytics";
