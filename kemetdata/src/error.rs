use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch or parse a region data file.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed region data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to open or decode a hitbox raster.
#[derive(Error, Debug)]
pub enum HitboxLoadError {
    #[error("cannot decode hitbox image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("hitbox image {0} has zero size")]
    Empty(PathBuf),
}
