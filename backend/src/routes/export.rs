use crate::models::{Area, TimeRange};

// Column layouts and filenames are consumed by spreadsheet tooling; keep
// them byte-for-byte stable.

pub const HISTORY_FILENAME: &str = "parking-history.csv";
pub const HISTORY_HEADER: [&str; 6] = ["ts", "iso", "time", "area", "occupied", "available"];
pub const ANALYTICS_HEADER: [&str; 5] = ["ts", "when", "area", "occupied", "available"];

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// `analytics-<range>.csv`
pub fn analytics_filename(range: TimeRange) -> String {
    format!("analytics-{}.csv", range.key())
}

/// `chart-area-<a|b|c>.png`
pub fn chart_filename(area: Area) -> String {
    format!("chart-area-{}.png", area.slug())
}

pub const EXPORT_HISTORY_PATH: &str = "/export/history.csv";
pub const EXPORT_ANALYTICS_PATH: &str = "/export/analytics.csv";
pub const EXPORT_CHART_PATH: &str = "/export/charts/{area}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames() {
        assert_eq!(analytics_filename(TimeRange::Day), "analytics-24h.csv");
        assert_eq!(analytics_filename(TimeRange::Year), "analytics-365d.csv");
        assert_eq!(chart_filename(Area::A), "chart-area-a.png");
        assert_eq!(chart_filename(Area::C), "chart-area-c.png");
    }

    #[test]
    fn test_headers() {
        assert_eq!(HISTORY_HEADER.join(","), "ts,iso,time,area,occupied,available");
        assert_eq!(ANALYTICS_HEADER.join(","), "ts,when,area,occupied,available");
    }
}
