//! Application state for the HTTP server.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::DashboardConfig;
use crate::db::repository::FeedRepository;
use crate::models::{DisplayZone, TimeRange};
use crate::services::charts::{ChartRenderer, LineChartRenderer};
use crate::services::dashboard::SharedDashboard;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Feed repository for writes
    pub repository: Arc<dyn FeedRepository>,
    /// Session dashboard, written only by the feed sync task
    pub dashboard: SharedDashboard,
    /// Dashboard revision published after every sync
    pub updates: watch::Receiver<u64>,
    pub renderer: Arc<dyn ChartRenderer>,
    pub zone: DisplayZone,
    pub default_range: TimeRange,
}

impl AppState {
    /// Create application state with default rendering settings.
    pub fn new(
        repository: Arc<dyn FeedRepository>,
        dashboard: SharedDashboard,
        updates: watch::Receiver<u64>,
    ) -> Self {
        Self {
            repository,
            dashboard,
            updates,
            renderer: Arc::new(LineChartRenderer::default()),
            zone: DisplayZone::Local,
            default_range: TimeRange::Day,
        }
    }

    /// Apply display and chart settings from `config`.
    pub fn with_config(mut self, config: &DashboardConfig) -> Self {
        self.renderer = Arc::new(LineChartRenderer::new(
            config.charts.width,
            config.charts.height,
        ));
        self.zone = config.display_zone();
        self.default_range = config.default_range();
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }
}
