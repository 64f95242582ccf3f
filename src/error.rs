//! Error type shared by the logo operations.
//!
//! Every failure a run can hit is one of these variants. The CLI layer wraps
//! them with `anyhow` context and turns them into a non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

use crate::crop::CropBox;

pub type Result<T> = std::result::Result<T, LogoError>;

#[derive(Debug, Error)]
pub enum LogoError {
    /// The source image path does not resolve.
    #[error("Image file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The source exists but could not be decoded as an image.
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid crop box {0}: right/bottom lies before left/top")]
    InvalidCropBox(CropBox),

    #[error("Crop box {0} is too large to allocate")]
    CropTooLarge(CropBox),

    /// Resizing needs at least one source pixel in each direction.
    #[error("Cannot resize an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid icon size list '{0}'")]
    InvalidSizes(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Failed to write icon manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl LogoError {
    /// True when the run failed because the source image was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LogoError::FileNotFound(_))
    }
}
