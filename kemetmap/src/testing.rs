//! Tiny on-disk asset tree shared by the unit tests.
//!
//! 3-player layout, hitbox 4x2:
//!
//! ```text
//! (0,0) A #FF0000 | (1,0) B #00FF00 | (2,0) background | (3,0) #123456 (no region)
//! (0,1) C #0000FF | rest background
//! ```
//!
//! A lists B and an undefined Z as neighbours. Overlays exist for A and B
//! only; both paint (0,0) so draw order is observable.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use kemetdata::{AssetLayout, PlayerCount};
use std::path::Path;

pub const BLUE_REGION: &str = "C";

pub const MAP3P: &str = r##"{
    "A": { "name": "Thebes", "type": "city", "adjacent": ["B", "Z"], "obelisk": true, "hitboxColor": "#ff0000" },
    "B": { "name": "Nile Delta", "type": "water", "adjacent": ["A"], "obelisk": false, "hitboxColor": "#00FF00" },
    "C": { "name": "Desert", "type": "land", "adjacent": [], "obelisk": false, "hitboxColor": "0000FF" }
}"##;

pub const MAP4P: &str = r##"{
    "D": { "name": "Memphis", "type": "city", "adjacent": [], "obelisk": false, "hitboxColor": "#FF0000" }
}"##;

pub fn three_players() -> PlayerCount {
    PlayerCount::new(3).unwrap()
}

pub fn four_players() -> PlayerCount {
    PlayerCount::new(4).unwrap()
}

/// Writes the mock tree under `dir`. The 4-player layout has data but no images.
pub fn create_mock_assets(dir: &Path) -> AssetLayout {
    let layout = AssetLayout::new(dir);
    let three = three_players();

    let catalog = layout.catalog(three);
    std::fs::create_dir_all(catalog.parent().unwrap()).unwrap();
    std::fs::write(&catalog, MAP3P).unwrap();
    std::fs::write(layout.catalog(four_players()), MAP4P).unwrap();

    let areas = layout.highlight(three, "A");
    std::fs::create_dir_all(areas.parent().unwrap()).unwrap();

    let mut hitbox = RgbImage::new(4, 2);
    hitbox.put_pixel(0, 0, Rgb([255, 0, 0]));
    hitbox.put_pixel(1, 0, Rgb([0, 255, 0]));
    hitbox.put_pixel(3, 0, Rgb([0x12, 0x34, 0x56]));
    hitbox.put_pixel(0, 1, Rgb([0, 0, 255]));
    hitbox.save(layout.hitbox(three)).unwrap();

    RgbImage::from_pixel(4, 2, Rgb([128, 128, 128]))
        .save(layout.background(three))
        .unwrap();

    let mut a = RgbaImage::new(4, 2);
    a.put_pixel(0, 0, Rgba([255, 255, 0, 255]));
    a.save(layout.highlight(three, "A")).unwrap();

    let mut b = RgbaImage::new(4, 2);
    b.put_pixel(0, 0, Rgba([0, 255, 255, 255]));
    b.put_pixel(1, 0, Rgba([255, 0, 255, 255]));
    b.save(layout.highlight(three, "B")).unwrap();

    layout
}
