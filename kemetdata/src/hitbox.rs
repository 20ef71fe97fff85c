//! Click-to-region resolution against the hitbox raster.
//!
//! Every region is painted in the hitbox image as a single flat color; black
//! is background. A click arrives in displayed (scaled) image coordinates, is
//! mapped into the raster's native pixel grid, and the pixel there is sampled.

use crate::color::HitboxColor;
use crate::error::HitboxLoadError;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A point in displayed-image space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// The size the map is currently displayed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Outcome of a click resolution. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No hitbox raster is loaded yet.
    NotReady,
    /// The click fell outside the displayed map.
    OutOfBounds,
    /// The pixel is background.
    Empty,
    /// A region color, still to be looked up in the catalog.
    Color(HitboxColor),
}

/// Maps a displayed point into native pixel coordinates.
///
/// `native = floor(display * native_size / displayed_size)` per axis, so a
/// click on a pixel boundary goes to the lower pixel. Points outside the
/// displayed box are rejected; a point on its far edge clamps to the last
/// native row/column.
pub fn to_native(
    point: DisplayPoint,
    displayed: DisplaySize,
    native_width: u32,
    native_height: u32,
) -> Option<(u32, u32)> {
    let x = scale_axis(point.x, displayed.width, native_width)?;
    let y = scale_axis(point.y, displayed.height, native_height)?;
    Some((x, y))
}

fn scale_axis(pos: f64, displayed: f64, native: u32) -> Option<u32> {
    if native == 0 || !displayed.is_finite() || displayed <= 0.0 {
        return None;
    }
    if !pos.is_finite() || pos < 0.0 || pos > displayed {
        return None;
    }
    let scale = native as f64 / displayed;
    let scaled = (pos * scale).floor() as u32;
    Some(scaled.min(native - 1))
}

/// Reads the RGB value at a native coordinate. Alpha is ignored.
pub fn sample(buffer: &RgbaImage, x: u32, y: u32) -> Option<HitboxColor> {
    buffer
        .get_pixel_checked(x, y)
        .map(|pixel| HitboxColor::from_channels(pixel.0))
}

/// A decoded hitbox raster at native resolution. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct HitboxImage {
    pixels: RgbaImage,
}

impl HitboxImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn load(path: &Path) -> Result<Self, HitboxLoadError> {
        let pixels = image::open(path)
            .map_err(|source| HitboxLoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(HitboxLoadError::Empty(path.to_path_buf()));
        }
        Ok(Self { pixels })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn sample(&self, x: u32, y: u32) -> Option<HitboxColor> {
        sample(&self.pixels, x, y)
    }

    /// Distinct non-background colors and how many pixels carry each.
    pub fn color_census(&self) -> HashMap<HitboxColor, u64> {
        let mut counts = HashMap::new();
        for pixel in self.pixels.pixels() {
            let color = HitboxColor::from_channels(pixel.0);
            if !color.is_background() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Resolves clicks against the currently loaded hitbox raster, if any.
#[derive(Debug, Clone, Default)]
pub struct HitboxResolver {
    image: Option<Arc<HitboxImage>>,
}

impl HitboxResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly loaded raster.
    pub fn replace(&mut self, image: Arc<HitboxImage>) {
        self.image = Some(image);
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&Arc<HitboxImage>> {
        self.image.as_ref()
    }

    pub fn resolve(&self, point: DisplayPoint, displayed: DisplaySize) -> Resolution {
        let Some(image) = &self.image else {
            return Resolution::NotReady;
        };
        let (width, height) = image.dimensions();
        let Some((x, y)) = to_native(point, displayed, width, height) else {
            return Resolution::OutOfBounds;
        };
        let Some(color) = image.sample(x, y) else {
            return Resolution::OutOfBounds;
        };
        log::debug!("Clicked color: {} at {}, {}", color, x, y);

        if color.is_background() {
            Resolution::Empty
        } else {
            Resolution::Color(color)
        }
    }
}
