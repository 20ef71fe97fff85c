use kemetdata::{HitboxColor, Region, RegionId};
use serde::Serialize;
use std::fmt;

/// Fields shown for a selected region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    pub id: RegionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// As listed in the data file, including ids that do not resolve.
    pub adjacent: Vec<RegionId>,
    pub obelisk: bool,
}

impl RegionInfo {
    pub fn new(id: &str, region: &Region) -> Self {
        Self {
            id: id.to_string(),
            name: region.name.clone(),
            kind: region.kind.clone(),
            adjacent: region.adjacent.clone(),
            obelisk: region.obelisk,
        }
    }
}

/// Contents of the info area.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InfoPanel {
    #[default]
    Prompt,
    LoadFailed,
    Empty,
    Unknown(HitboxColor),
    Region(RegionInfo),
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoPanel::Prompt => write!(f, "Click on the map to select a region"),
            InfoPanel::LoadFailed => write!(f, "Failed to load map data"),
            InfoPanel::Empty => write!(f, "Empty area"),
            InfoPanel::Unknown(color) => write!(f, "Unknown region (color: {})", color),
            InfoPanel::Region(info) => {
                writeln!(f, "ID: {}", info.id)?;
                writeln!(f, "Name: {}", info.name)?;
                writeln!(f, "Type: {}", info.kind)?;
                writeln!(f, "Adjacent: {}", info.adjacent.join(", "))?;
                write!(f, "Obelisk: {}", if info.obelisk { "Yes" } else { "No" })
            }
        }
    }
}
