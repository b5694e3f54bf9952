use std::path::PathBuf;

use thiserror::Error;

/// Texture or environment map that could not be resolved. Always fatal:
/// the island is not generated without its materials.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("missing asset {0}")]
    MissingFile(PathBuf),

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} is empty ({width}x{height})")]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}
