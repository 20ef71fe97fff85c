use crate::highlight::HighlightPlan;
use crate::info::{InfoPanel, RegionInfo};
use kemetdata::{
    AssetLayout, DataLoadError, DisplayPoint, DisplaySize, HitboxColor, HitboxImage,
    HitboxLoadError, HitboxResolver, PlayerCount, RegionCatalog, RegionId, Resolution,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies one player-count selection. Only completions carrying the
/// latest token are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Assets to fetch for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: RequestToken,
    pub players: PlayerCount,
}

/// Completion of one background load.
#[derive(Debug)]
pub enum LoadEvent {
    Catalog {
        token: RequestToken,
        players: PlayerCount,
        result: Result<RegionCatalog, DataLoadError>,
    },
    Hitbox {
        token: RequestToken,
        players: PlayerCount,
        result: Result<HitboxImage, HitboxLoadError>,
    },
}

impl LoadEvent {
    pub fn token(&self) -> RequestToken {
        match self {
            LoadEvent::Catalog { token, .. } | LoadEvent::Hitbox { token, .. } => *token,
        }
    }

    pub fn players(&self) -> PlayerCount {
        match self {
            LoadEvent::Catalog { players, .. } | LoadEvent::Hitbox { players, .. } => *players,
        }
    }

    /// The failure message, if this load failed.
    pub fn error(&self) -> Option<String> {
        match self {
            LoadEvent::Catalog { result: Err(e), .. } => Some(e.to_string()),
            LoadEvent::Hitbox { result: Err(e), .. } => Some(e.to_string()),
            _ => None,
        }
    }
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Data not loaded yet, or the click missed the map.
    Ignored,
    Empty,
    Unknown(HitboxColor),
    Selected(RegionId),
}

/// State of the picker: current selection, loaded data, and what is shown.
///
/// Catalog and hitbox are immutable snapshots swapped in by [`apply`](Self::apply).
pub struct PickerSession {
    layout: AssetLayout,
    players: PlayerCount,
    latest: RequestToken,
    catalog: Option<Arc<RegionCatalog>>,
    resolver: HitboxResolver,
    /// One of the latest selection's loads failed.
    failed: bool,
    background: PathBuf,
    panel: InfoPanel,
    highlights: HighlightPlan,
}

impl PickerSession {
    pub fn new(layout: AssetLayout, players: PlayerCount) -> Self {
        let background = layout.background(players);
        Self {
            layout,
            players,
            latest: RequestToken::default(),
            catalog: None,
            resolver: HitboxResolver::new(),
            failed: false,
            background,
            panel: InfoPanel::Prompt,
            highlights: HighlightPlan::default(),
        }
    }

    /// Switches to `players`. Data for the previous selection is dropped, so
    /// clicks are ignored until the returned request completes.
    pub fn select(&mut self, players: PlayerCount) -> LoadRequest {
        self.latest = self.latest.next();
        self.players = players;
        self.catalog = None;
        self.resolver.clear();
        self.failed = false;
        self.background = self.layout.background(players);
        self.panel = InfoPanel::Prompt;
        self.highlights = HighlightPlan::default();

        log::info!(
            "Player count changed to {}. Map path: {}",
            players,
            self.background.display()
        );
        LoadRequest {
            token: self.latest,
            players,
        }
    }

    /// Applies a load completion. Returns `false` for stale completions,
    /// which are dropped.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        if event.token() != self.latest {
            log::debug!(
                "Discarding stale load for {} players ({:?}, latest {:?})",
                event.players(),
                event.token(),
                self.latest
            );
            return false;
        }

        match event {
            LoadEvent::Catalog {
                result: Ok(catalog),
                players,
                ..
            } => {
                log::debug!("Map data loaded for {} players", players);
                self.catalog = Some(Arc::new(catalog));
            }
            LoadEvent::Catalog {
                result: Err(e), ..
            } => {
                log::error!("Failed to load map data: {}", e);
                self.failed = true;
                self.panel = InfoPanel::LoadFailed;
            }
            LoadEvent::Hitbox {
                result: Ok(image),
                players,
                ..
            } => {
                self.resolver.replace(Arc::new(image));
                log::info!("Hitbox loaded for {} players", players);
            }
            LoadEvent::Hitbox {
                result: Err(e), ..
            } => {
                log::error!("Failed to load hitbox: {}", e);
                self.failed = true;
                self.panel = InfoPanel::LoadFailed;
            }
        }
        true
    }

    /// Resolves a click on the displayed map and updates panel and highlights.
    pub fn click(&mut self, point: DisplayPoint, displayed: DisplaySize) -> ClickOutcome {
        let Some(catalog) = self.catalog.clone() else {
            log::debug!("Click ignored, map data not loaded");
            return ClickOutcome::Ignored;
        };

        match self.resolver.resolve(point, displayed) {
            Resolution::NotReady | Resolution::OutOfBounds => ClickOutcome::Ignored,
            Resolution::Empty => {
                self.panel = InfoPanel::Empty;
                self.highlights = HighlightPlan::default();
                ClickOutcome::Empty
            }
            Resolution::Color(color) => match catalog.find_by_color(&color.to_hex()) {
                Some((id, region)) => {
                    self.panel = InfoPanel::Region(RegionInfo::new(id, region));
                    self.highlights =
                        HighlightPlan::for_region(&catalog, &self.layout, self.players, id);
                    ClickOutcome::Selected(id.clone())
                }
                None => {
                    self.panel = InfoPanel::Unknown(color);
                    self.highlights = HighlightPlan::default();
                    ClickOutcome::Unknown(color)
                }
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.catalog.is_some() && self.resolver.is_ready()
    }

    pub fn players(&self) -> PlayerCount {
        self.players
    }

    /// The current selection cannot become ready without re-selecting.
    pub fn load_failed(&self) -> bool {
        self.failed
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    pub fn catalog(&self) -> Option<&RegionCatalog> {
        self.catalog.as_deref()
    }

    pub fn hitbox(&self) -> Option<&HitboxImage> {
        self.resolver.image().map(|img| &**img)
    }

    /// Native size of the loaded hitbox raster.
    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.hitbox().map(HitboxImage::dimensions)
    }

    pub fn background(&self) -> &Path {
        &self.background
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    pub fn highlights(&self) -> &HighlightPlan {
        &self.highlights
    }
}
