//! # Parking Dashboard Backend
//!
//! Occupancy monitoring for parking areas A, B and C.
//!
//! The crate mirrors a real-time feed (live per-area counts plus an
//! append-only history list) into an owned in-memory History Store, computes
//! time-windowed per-area analytics for charting, and exports the collected
//! data as CSV files and chart images. A REST API built on Axum serves the
//! dashboard page.
//!
//! ## Features
//!
//! - **History**: resolve raw feed records into timestamped samples
//! - **Analytics**: 24h / 7d / 30d / 365d windows partitioned per area
//! - **Exports**: raw history CSV, windowed analytics CSV, per-area PNG charts
//! - **Live view**: current counts and recent history, streamed over SSE
//! - **HTTP API**: RESTful endpoints for the dashboard frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Public types consumed by API clients
//! - [`config`]: `dashboard.toml` and environment settings
//! - [`db`]: Feed repository pattern and service functions
//! - [`models`]: Areas, samples, ranges and time formatting
//! - [`services`]: History Store, aggregation, exports and feed sync
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific data types, paths and file layouts

// RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
