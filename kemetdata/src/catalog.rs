//! Region metadata for one player-count configuration.
//!
//! The data file is a JSON object keyed by region id:
//!
//! ```json
//! { "A": { "name": "Thebes", "type": "city", "adjacent": ["B"],
//!          "obelisk": false, "hitboxColor": "#FF0000" } }
//! ```
//!
//! Document order is kept so that color lookups resolve to the first listed
//! region when a data file carries duplicates.

use crate::color::{ColorParseError, HitboxColor};
use crate::error::DataLoadError;
use crate::layout::{AssetLayout, PlayerCount};
use crate::region::{Region, RegionId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Mapping from region id to region, replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    regions: IndexMap<RegionId, Region>,
}

/// Data problems found by [`RegionCatalog::validate`]. None of these stop a load.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    InvalidColor {
        region: RegionId,
        error: ColorParseError,
    },
    /// The region is tagged with the reserved background color.
    BackgroundColor { region: RegionId },
    /// `second` can never be picked because `first` shares its color and is listed earlier.
    DuplicateColor {
        color: HitboxColor,
        first: RegionId,
        second: RegionId,
    },
    DanglingAdjacency { region: RegionId, missing: RegionId },
}

impl CatalogIssue {
    /// Issues that break the one-color-one-region mapping.
    pub fn breaks_color_mapping(&self) -> bool {
        !matches!(self, CatalogIssue::DanglingAdjacency { .. })
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::InvalidColor { region, error } => {
                write!(f, "region {}: invalid hitbox color ({})", region, error)
            }
            CatalogIssue::BackgroundColor { region } => {
                write!(f, "region {}: uses the background color {}", region, HitboxColor::BLACK)
            }
            CatalogIssue::DuplicateColor {
                color,
                first,
                second,
            } => write!(f, "regions {} and {} share color {}", first, second, color),
            CatalogIssue::DanglingAdjacency { region, missing } => {
                write!(f, "region {}: adjacent region {} is not defined", region, missing)
            }
        }
    }
}

impl RegionCatalog {
    /// Parses a data file's contents. `origin` is only used for error reporting.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, DataLoadError> {
        let regions = serde_json::from_str(text).map_err(|source| DataLoadError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(Self { regions })
    }

    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&text, path)?;
        log::debug!("Loaded {} regions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Loads the catalog for a player count from the standard asset layout.
    pub fn load_for(layout: &AssetLayout, players: PlayerCount) -> Result<Self, DataLoadError> {
        Self::load(&layout.catalog(players))
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in data-file order.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &Region)> {
        self.regions.iter()
    }

    /// Finds the region tagged with `hex` (`#RRGGBB` or `RRGGBB`, any case).
    ///
    /// Linear scan; the first region in data-file order wins. Regions whose
    /// stored color does not parse never match.
    pub fn find_by_color(&self, hex: &str) -> Option<(&RegionId, &Region)> {
        let wanted = hex.parse::<HitboxColor>().ok()?;
        self.regions
            .iter()
            .find(|(_, region)| region.color().is_ok_and(|c| c == wanted))
    }

    /// Adjacent ids of `id` that exist in this catalog, in listed order.
    pub fn resolvable_neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a RegionId> + 'a {
        self.get(id)
            .map(|region| region.adjacent.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(move |adj| self.regions.contains_key(adj.as_str()))
    }

    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen: HashMap<HitboxColor, &RegionId> = HashMap::new();

        for (id, region) in &self.regions {
            match region.color() {
                Ok(color) if color.is_background() => {
                    issues.push(CatalogIssue::BackgroundColor { region: id.clone() });
                }
                Ok(color) => {
                    if let Some(first) = seen.get(&color) {
                        issues.push(CatalogIssue::DuplicateColor {
                            color,
                            first: (*first).clone(),
                            second: id.clone(),
                        });
                    } else {
                        seen.insert(color, id);
                    }
                }
                Err(error) => issues.push(CatalogIssue::InvalidColor {
                    region: id.clone(),
                    error,
                }),
            }

            for adj in &region.adjacent {
                if !self.regions.contains_key(adj) {
                    issues.push(CatalogIssue::DanglingAdjacency {
                        region: id.clone(),
                        missing: adj.clone(),
                    });
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"{
        "A": { "name": "Thebes", "type": "city", "adjacent": ["B", "Z"], "obelisk": true, "hitboxColor": "#ff0000" },
        "B": { "name": "Nile", "type": "water", "adjacent": ["A"], "obelisk": false, "hitboxColor": "00FF00" },
        "C": { "name": "Desert", "type": "land", "adjacent": [], "obelisk": false, "hitboxColor": "#FF0000" }
    }"##;

    fn sample() -> RegionCatalog {
        RegionCatalog::parse(SAMPLE, Path::new("sample.json")).unwrap()
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        let a = catalog.get("A").unwrap();
        assert_eq!(a.kind, "city");
        assert!(a.obelisk);
    }

    #[test]
    fn test_find_by_color_is_case_insensitive() {
        let catalog = sample();
        let (id, _) = catalog.find_by_color("#FF0000").unwrap();
        assert_eq!(id, "A");
        let (id, _) = catalog.find_by_color("#00ff00").unwrap();
        assert_eq!(id, "B");
    }

    #[test]
    fn test_find_by_color_first_match_wins() {
        // C shares A's color; A comes first in the file
        let catalog = sample();
        assert_eq!(catalog.find_by_color("FF0000").unwrap().0, "A");
    }

    #[test]
    fn test_find_by_color_unknown() {
        let catalog = sample();
        assert!(catalog.find_by_color("#123456").is_none());
        assert!(catalog.find_by_color("not a color").is_none());
    }

    #[test]
    fn test_get_missing() {
        assert!(sample().get("Z").is_none());
    }

    #[test]
    fn test_resolvable_neighbors_skips_dangling() {
        let catalog = sample();
        let neighbors: Vec<&RegionId> = catalog.resolvable_neighbors("A").collect();
        assert_eq!(neighbors, vec!["B"]);
        assert_eq!(catalog.resolvable_neighbors("missing").count(), 0);
    }

    #[test]
    fn test_validate_reports_duplicates_and_dangling() {
        let issues = sample().validate();
        assert!(issues.contains(&CatalogIssue::DuplicateColor {
            color: HitboxColor::new(255, 0, 0),
            first: "A".to_string(),
            second: "C".to_string(),
        }));
        assert!(issues.contains(&CatalogIssue::DanglingAdjacency {
            region: "A".to_string(),
            missing: "Z".to_string(),
        }));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_validate_background_and_invalid() {
        let text = r##"{
            "X": { "name": "x", "type": "t", "adjacent": [], "obelisk": false, "hitboxColor": "#000000" },
            "Y": { "name": "y", "type": "t", "adjacent": [], "obelisk": false, "hitboxColor": "#12" }
        }"##;
        let catalog = RegionCatalog::parse(text, Path::new("bad.json")).unwrap();
        let issues = catalog.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(CatalogIssue::breaks_color_mapping));
        assert!(matches!(issues[0], CatalogIssue::BackgroundColor { .. }));
        assert!(matches!(issues[1], CatalogIssue::InvalidColor { .. }));
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp");
        write!(file, "{{ not json").expect("write temp");
        let err = RegionCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RegionCatalog::load(&dir.path().join("map3p.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn test_load_for_uses_layout() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AssetLayout::new(dir.path());
        let players: PlayerCount = "4".parse().unwrap();
        let path = layout.catalog(players);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = RegionCatalog::load_for(&layout, players).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
