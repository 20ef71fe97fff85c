pub mod catalog;
pub mod color;
pub mod error;
pub mod hitbox;
pub mod layout;
pub mod region;

pub use catalog::{CatalogIssue, RegionCatalog};
pub use color::HitboxColor;
pub use error::{DataLoadError, HitboxLoadError};
pub use hitbox::{DisplayPoint, DisplaySize, HitboxImage, HitboxResolver, Resolution};
pub use layout::{AssetLayout, PlayerCount};
pub use region::{Region, RegionId};
