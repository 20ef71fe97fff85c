use crate::color::{ColorParseError, HitboxColor};
use serde::{Deserialize, Serialize};

pub type RegionId = String;

/// A board region as described by the per-player-count map data file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Region {
    pub name: String,
    /// Region category (`type` in the data file).
    #[serde(rename = "type")]
    pub kind: String,
    /// Neighbouring region ids, in the order the data file lists them.
    /// May name regions absent from the catalog.
    #[serde(default)]
    pub adjacent: Vec<RegionId>,
    #[serde(default)]
    pub obelisk: bool,
    /// Color as stored: `#RRGGBB` or `RRGGBB`, any case.
    #[serde(rename = "hitboxColor")]
    pub hitbox_color: String,
}

impl Region {
    pub fn color(&self) -> Result<HitboxColor, ColorParseError> {
        self.hitbox_color.parse()
    }
}
