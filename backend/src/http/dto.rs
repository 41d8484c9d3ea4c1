//! Data Transfer Objects for the HTTP API.
//!
//! Response payloads are re-exported from the routes module since they
//! already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::models::AreaCounts;
pub use crate::routes::analytics::{AnalyticsData, AreaChart, ChartSeries};
pub use crate::routes::dashboard::{AreaStatus, DashboardData};
pub use crate::routes::feed::{ImportResponse, PublishResponse};

use crate::models::TimeRange;

/// Query parameters for range based endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RangeQuery {
    /// Range key (`24h`, `7d`, `30d`, `365d`)
    #[serde(default)]
    pub range: Option<String>,
}

impl RangeQuery {
    /// A missing key selects `default`; an unrecognized one selects 24h.
    pub fn resolve(&self, default: TimeRange) -> TimeRange {
        match self.range.as_deref() {
            Some(key) => TimeRange::from_key(key),
            None => default,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Feed connection status
    pub feed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_query_resolution() {
        let missing = RangeQuery::default();
        assert_eq!(missing.resolve(TimeRange::Month), TimeRange::Month);

        let known = RangeQuery {
            range: Some("365d".to_string()),
        };
        assert_eq!(known.resolve(TimeRange::Week), TimeRange::Year);

        let unknown = RangeQuery {
            range: Some("fortnight".to_string()),
        };
        assert_eq!(unknown.resolve(TimeRange::Week), TimeRange::Day);
    }
}
