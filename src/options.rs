//! Run configuration for palette building and mosaic assembly.

use image::imageops::FilterType;

use crate::error::{MosaicError, Result};

/// Largest working width; wider sources are scaled down to it.
pub const DEFAULT_MAX_WIDTH: u32 = 200;
/// Edge length in pixels of one stamped tile in the output.
pub const DEFAULT_CELL_SIZE: u32 = 10;
pub const DEFAULT_TILE_DIR: &str = "letters";
pub const DEFAULT_OUTPUT: &str = "output.png";

/// Resampling filter used for both the source downsample and the tile resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Order in which tile files are scanned.
///
/// The scan order decides which tile survives a mean-colour collision and
/// which palette entry wins an equal-distance tie.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileOrder {
    /// Whatever order the operating system lists the directory in.
    #[default]
    Filesystem,
    /// Sorted by file name, stable across platforms.
    Name,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicOptions {
    pub max_width: u32,
    pub cell_size: u32,
    pub filter: ResizeFilter,
    pub tile_order: TileOrder,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            cell_size: DEFAULT_CELL_SIZE,
            filter: ResizeFilter::default(),
            tile_order: TileOrder::default(),
        }
    }
}

impl MosaicOptions {
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_tile_order(mut self, tile_order: TileOrder) -> Self {
        self.tile_order = tile_order;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(MosaicError::InvalidOptions(
                "max width must be at least 1".into(),
            ));
        }
        if self.cell_size == 0 {
            return Err(MosaicError::InvalidOptions(
                "cell size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
