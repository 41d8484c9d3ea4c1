//! Public API surface for the dashboard backend.
//!
//! This file consolidates the types API clients see on the wire.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::Area;
pub use crate::models::AreaCounts;
pub use crate::models::Sample;
pub use crate::models::TimeRange;
pub use crate::routes::analytics::AnalyticsData;
pub use crate::routes::analytics::AreaChart;
pub use crate::routes::analytics::ChartSeries;
pub use crate::routes::dashboard::AreaStatus;
pub use crate::routes::dashboard::DashboardData;
pub use crate::routes::feed::ImportResponse;
pub use crate::routes::feed::PublishResponse;

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
