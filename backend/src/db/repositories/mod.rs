//! Repository implementations module.
//!
//! - `local`: In-memory implementation for the server, unit tests and local development
pub mod local;

pub use local::LocalRepository;
