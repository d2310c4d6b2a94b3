//! Error types for the mosaic pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file or byte buffer into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unable to read image: {0}")]
    Io(#[from] io::Error),

    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("couldn't find image at {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read source image {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list tile directory {}: {source}", path.display())]
    TileDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raised before any classification work when no tile survived the scan.
    #[error("no usable tile images found")]
    EmptyPalette,

    #[error("source image: {0}")]
    Decode(#[from] DecodeError),

    /// A tile that was catalogued in the palette could not be loaded while
    /// compositing.
    #[error("tile {} became unavailable: {source}", path.display())]
    TileDecode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("degenerate image dimensions {width}x{height}")]
    Dimension { width: u64, height: u64 },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

pub type Result<T, E = MosaicError> = std::result::Result<T, E>;
