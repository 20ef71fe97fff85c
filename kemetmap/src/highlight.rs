//! Highlight overlays for the selected region and its neighbours.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use kemetdata::{AssetLayout, PlayerCount, RegionCatalog, RegionId};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightRole {
    Selected,
    Adjacent,
}

/// One overlay layer: the region's area image, drawn over the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub region: RegionId,
    pub role: HighlightRole,
    pub image: PathBuf,
}

/// Overlay layers in draw order; the last layer is topmost.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct HighlightPlan {
    layers: Vec<Highlight>,
}

impl HighlightPlan {
    /// Neighbours first, in listed order, then the selected region on top.
    /// Neighbour ids missing from the catalog are skipped.
    pub fn for_region(
        catalog: &RegionCatalog,
        layout: &AssetLayout,
        players: PlayerCount,
        id: &str,
    ) -> Self {
        let mut layers: Vec<Highlight> = catalog
            .resolvable_neighbors(id)
            .map(|adj| Highlight {
                region: adj.clone(),
                role: HighlightRole::Adjacent,
                image: layout.highlight(players, adj),
            })
            .collect();
        layers.push(Highlight {
            region: id.to_string(),
            role: HighlightRole::Selected,
            image: layout.highlight(players, id),
        });
        Self { layers }
    }

    pub fn layers(&self) -> &[Highlight] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Draws the plan's overlays onto a copy of `background`, in plan order.
///
/// Overlays are stretched to the background size. Missing or undecodable
/// overlay files are skipped.
pub fn compose(background: &RgbaImage, plan: &HighlightPlan) -> RgbaImage {
    let mut out = background.clone();
    let (width, height) = out.dimensions();

    for layer in plan.layers() {
        let overlay = match image::open(&layer.image) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                log::warn!(
                    "Skipping highlight for {} ({}): {}",
                    layer.region,
                    layer.image.display(),
                    e
                );
                continue;
            }
        };
        let overlay = if overlay.dimensions() == (width, height) {
            overlay
        } else {
            imageops::resize(&overlay, width, height, FilterType::Nearest)
        };
        imageops::overlay(&mut out, &overlay, 0, 0);
    }
    out
}
