use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monitored parking area.
///
/// Area tags coming from the feed are matched exactly; anything outside this
/// set is kept in history but never shows up in analytics.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Area {
    A,
    B,
    C,
}

impl Area {
    /// Every known area, in display order.
    pub const ALL: [Area; 3] = [Area::A, Area::B, Area::C];

    /// Resolve a feed tag (`"A"`, `"B"`, `"C"`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "A" => Some(Area::A),
            "B" => Some(Area::B),
            "C" => Some(Area::C),
            _ => None,
        }
    }

    /// Tag as written in feed records and CSV rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::A => "A",
            Area::B => "B",
            Area::C => "C",
        }
    }

    /// Lowercase form used in download filenames and URL paths.
    pub fn slug(&self) -> &'static str {
        match self {
            Area::A => "a",
            Area::B => "b",
            Area::C => "c",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = String;

    /// Parse an area from a path segment. Accepts the tag or its slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Area::A),
            "B" | "b" => Ok(Area::B),
            "C" | "c" => Ok(Area::C),
            _ => Err(format!("Unknown parking area: {}", s)),
        }
    }
}

/// Live occupancy counts for one area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCounts {
    #[serde(default)]
    pub occupied: u64,
    #[serde(default)]
    pub available: u64,
}

impl AreaCounts {
    pub fn new(occupied: u64, available: u64) -> Self {
        Self {
            occupied,
            available,
        }
    }
}
