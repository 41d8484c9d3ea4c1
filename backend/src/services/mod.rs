//! Service layer for dashboard logic.
//!
//! Everything here is synchronous and pure apart from `feed`, which drives
//! the dashboard from the feed repository, and the filesystem download sink
//! in `export`.

pub mod analytics;
pub mod charts;
pub mod csv;
pub mod dashboard;
pub mod export;
pub mod feed;
pub mod history;

pub use analytics::{analytics, chart_series, windowed, windowed_by_key, AreaPartitions};
pub use charts::{chart_exports, ChartRenderer, LineChartRenderer};
pub use dashboard::{Dashboard, SharedDashboard};
pub use export::{
    analytics_csv, download_blob, history_csv, DownloadSink, ExportError, ExportFile,
    FsDownloadSink,
};
pub use feed::{spawn_feed_sync, sync_once};
pub use history::HistoryStore;
