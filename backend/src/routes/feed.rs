use crate::models::Area;
use serde::{Deserialize, Serialize};

/// Response for a live count update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub area: Area,
    /// Push key of the history record created for the update.
    pub history_key: String,
    pub revision: u64,
}

/// Response for a full history import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Number of records in the imported snapshot (before timestamp checks).
    pub records: usize,
    pub revision: u64,
}

pub const AREA_COUNTS_PATH: &str = "/parking/{area}";
pub const HISTORY_PATH: &str = "/history";
