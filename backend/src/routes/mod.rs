pub mod analytics;
pub mod dashboard;
pub mod export;
pub mod feed;
