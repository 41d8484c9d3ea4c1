//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{analytics, dashboard, export, feed};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The dashboard page is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Live view
        .route(dashboard::DASHBOARD_PATH, get(handlers::get_dashboard))
        .route(dashboard::DASHBOARD_STREAM_PATH, get(handlers::stream_dashboard))
        // Feed writes
        .route(feed::AREA_COUNTS_PATH, put(handlers::publish_area_counts))
        .route(feed::HISTORY_PATH, put(handlers::import_history))
        // Analytics + exports
        .route(analytics::ANALYTICS_PATH, get(handlers::get_analytics))
        .route(export::EXPORT_HISTORY_PATH, get(handlers::export_history_csv))
        .route(export::EXPORT_ANALYTICS_PATH, get(handlers::export_analytics_csv))
        .route(export::EXPORT_CHART_PATH, get(handlers::export_chart));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .fallback(handlers::not_found)
        // Full history imports can be large.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
