//! Letter mosaics: rebuild an image out of small tile images.
//!
//! Every tile in a directory is reduced to its mean colour to form a
//! [`Palette`]. A source image is downsampled to a bounded working width,
//! each working pixel is matched to the tile with the nearest colour, and the
//! tiles are stamped into an output canvas `cell_size` times larger.
//!
//! ```no_run
//! use std::path::Path;
//! use letter_mosaic::{MosaicOptions, build_palette, render_mosaic};
//!
//! let options = MosaicOptions::default();
//! let palette = build_palette(Path::new("letters"), options.tile_order)?;
//! let source = std::fs::read("photo.png")?;
//! let png = render_mosaic(&source, &palette, &options)?;
//! std::fs::write("output.png", png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod colour;
pub mod error;
pub mod matcher;
pub mod mosaic;
pub mod options;
pub mod palette;

use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::info;

pub use colour::Colour;
pub use error::{DecodeError, MosaicError, Result};
pub use matcher::nearest;
pub use mosaic::{AssignmentGrid, MosaicAssembler, TileCache};
pub use options::{MosaicOptions, ResizeFilter, TileOrder};
pub use palette::{Palette, PaletteEntry, TileId, build_palette};

/// Decode an in-memory image of any supported format to RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(img)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage, DecodeError> {
    let bytes = fs::read(path)?;
    decode_image(&bytes)
}

/// Read the raw bytes of the source image.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => MosaicError::InputNotFound(path.to_path_buf()),
        _ => MosaicError::SourceRead {
            path: path.to_path_buf(),
            source,
        },
    })
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(MosaicError::Encode)?;
    Ok(buf)
}

/// Decode `input`, build its mosaic against `palette`, and return PNG bytes.
pub fn render_mosaic(input: &[u8], palette: &Palette, options: &MosaicOptions) -> Result<Vec<u8>> {
    let source = decode_image(input)?;
    info!(
        width = source.width(),
        height = source.height(),
        "decoded source image"
    );

    let canvas = MosaicAssembler::new(palette, options.clone()).assemble(&source)?;
    encode_png(&canvas)
}
