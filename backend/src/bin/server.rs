//! Parking Dashboard HTTP Server Binary
//!
//! Main entry point for the dashboard REST API. It creates the feed
//! repository and the session dashboard, starts the feed sync task, sets up
//! the HTTP router and serves requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin parking-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `DASHBOARD_RANGE`: Default analytics range (default: 24h)
//! - `DASHBOARD_UTC_OFFSET_MINUTES`: Fixed display offset (default: system zone)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use parking_dashboard::config::DashboardConfig;
use parking_dashboard::db::{FeedRepository, LocalRepository};
use parking_dashboard::http::{create_router, AppState};
use parking_dashboard::services::dashboard::Dashboard;
use parking_dashboard::services::feed::spawn_feed_sync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting parking dashboard server");

    let config = DashboardConfig::load()?;

    let repository: Arc<dyn FeedRepository> = Arc::new(LocalRepository::new());
    info!("Feed repository initialized");

    // One dashboard per server session, written only by the sync task
    let dashboard = Dashboard::new(config.dashboard.recent_limit).into_shared();
    let (_sync_task, updates) = spawn_feed_sync(Arc::clone(&repository), Arc::clone(&dashboard));

    let state = AppState::new(repository, dashboard, updates).with_config(&config);

    // Create router with all endpoints
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
