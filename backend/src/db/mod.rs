//! Feed storage for the parking dashboard.
//!
//! The upstream real-time feed is reached through the Repository pattern so
//! the dashboard does not depend on a particular backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, feed sync, exporter)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Area updates + matching history records               │
//! │  - History snapshot import                               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - FeedRepository         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! There is no process-wide repository: callers create one and pass it
//! explicitly (see `bin/server.rs`).

pub mod repositories;
pub mod repository;
pub mod services;

pub use repositories::LocalRepository;
pub use repository::{
    AreaCountsMap, ErrorContext, FeedRepository, RepositoryError, RepositoryResult,
};
pub use services::{
    health_check, history_snapshot, import_history, publish_area_update, publish_area_update_at,
};
