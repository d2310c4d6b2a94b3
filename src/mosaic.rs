//! Mosaic assembly: downsample, classify every pixel, stamp tiles.
//!
//! Pipeline for one run:
//! 1. Resize the source so its width is at most `max_width`.
//! 2. Map every working pixel to its nearest palette tile ([`classify`]).
//! 3. Stamp each chosen tile, resized to `cell_size` square, into a canvas
//!    `cell_size` times larger than the working image ([`composite`]).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use image::{RgbaImage, imageops};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::colour::Colour;
use crate::error::{MosaicError, Result};
use crate::load_image;
use crate::options::{MosaicOptions, ResizeFilter};
use crate::palette::{Palette, TileId};

/// Working size for a `width x height` source bounded to `max_width`.
///
/// The width becomes `min(max_width, width)` and the height keeps the aspect
/// ratio, rounded down but never below one pixel.
pub fn working_dimensions(width: u32, height: u32, max_width: u32) -> Result<(u32, u32)> {
    let new_width = max_width.min(width);
    if new_width == 0 || height == 0 {
        return Err(MosaicError::Dimension {
            width: width as u64,
            height: height as u64,
        });
    }

    // new_height <= height, so it fits back into u32.
    let new_height = (height as u64 * new_width as u64 / width as u64).max(1);
    Ok((new_width, new_height as u32))
}

/// Output canvas size for a working image of `width x height`.
pub fn canvas_dimensions(width: u32, height: u32, cell_size: u32) -> Result<(u32, u32)> {
    match (width.checked_mul(cell_size), height.checked_mul(cell_size)) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(MosaicError::Dimension {
            width: width as u64 * cell_size as u64,
            height: height as u64 * cell_size as u64,
        }),
    }
}

fn resize_exact(img: &RgbaImage, width: u32, height: u32, filter: ResizeFilter) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, filter.into())
}

/// Resize `img` to its bounded working resolution.
pub fn downsample(img: &RgbaImage, max_width: u32, filter: ResizeFilter) -> Result<RgbaImage> {
    let (width, height) = working_dimensions(img.width(), img.height(), max_width)?;
    debug!(
        from = ?img.dimensions(),
        to = ?(width, height),
        "downsampling source"
    );
    Ok(resize_exact(img, width, height, filter))
}

/// The tile chosen for every working pixel, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentGrid {
    width: u32,
    height: u32,
    cells: Vec<TileId>,
}

impl AssignmentGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> TileId {
        self.cells[(y as usize) * (self.width as usize) + x as usize]
    }

    /// `(x, y, tile)` for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, TileId)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &id)| ((i % width) as u32, (i / width) as u32, id))
    }
}

/// Pick the nearest palette tile for every pixel of `working`.
///
/// Each cell depends only on its own pixel, so rows are matched in parallel.
pub fn classify(working: &RgbaImage, palette: &Palette) -> AssignmentGrid {
    let cells: Vec<TileId> = working
        .as_raw()
        .par_chunks_exact(4)
        .map(|px| palette.nearest(Colour::new(px[0], px[1], px[2])).0)
        .collect();

    AssignmentGrid {
        width: working.width(),
        height: working.height(),
        cells,
    }
}

/// Run-scoped store of tiles decoded and resized to the cell size.
///
/// Each tile is decoded at most once, on first use.
pub struct TileCache<'a> {
    palette: &'a Palette,
    cell_size: u32,
    filter: ResizeFilter,
    tiles: HashMap<TileId, RgbaImage>,
}

impl<'a> TileCache<'a> {
    pub fn new(palette: &'a Palette, cell_size: u32, filter: ResizeFilter) -> Self {
        Self {
            palette,
            cell_size,
            filter,
            tiles: HashMap::new(),
        }
    }

    /// The cell-sized pixels of tile `id`.
    ///
    /// # Errors
    ///
    /// [`MosaicError::TileDecode`] if the tile file can no longer be loaded.
    pub fn get(&mut self, id: TileId) -> Result<&RgbaImage> {
        let (palette, cell_size, filter) = (self.palette, self.cell_size, self.filter);
        match self.tiles.entry(id) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let path = palette.tile_path(id);
                let img = load_image(path).map_err(|source| MosaicError::TileDecode {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!(tile = %path.display(), "decoded tile");
                Ok(slot.insert(resize_exact(&img, cell_size, cell_size, filter)))
            }
        }
    }

    /// Number of distinct tiles decoded so far.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Stamp every assigned tile into a fresh canvas.
///
/// Fails on the first tile that cannot be decoded; no partial canvas is
/// returned.
pub fn composite(grid: &AssignmentGrid, cache: &mut TileCache<'_>) -> Result<RgbaImage> {
    let cell = cache.cell_size;
    let (width, height) = canvas_dimensions(grid.width(), grid.height(), cell)?;
    let mut canvas = RgbaImage::new(width, height);

    for (x, y, id) in grid.iter() {
        let tile = cache.get(id)?;
        imageops::replace(&mut canvas, tile, (x * cell) as i64, (y * cell) as i64);
    }

    Ok(canvas)
}

/// Turns source images into mosaics against one palette.
pub struct MosaicAssembler<'a> {
    palette: &'a Palette,
    options: MosaicOptions,
}

impl<'a> MosaicAssembler<'a> {
    pub fn new(palette: &'a Palette, options: MosaicOptions) -> Self {
        Self { palette, options }
    }

    pub fn options(&self) -> &MosaicOptions {
        &self.options
    }

    /// Build the mosaic for `source`.
    pub fn assemble(&self, source: &RgbaImage) -> Result<RgbaImage> {
        self.options.validate()?;
        let MosaicOptions {
            max_width,
            cell_size,
            filter,
            ..
        } = self.options;

        let working = downsample(source, max_width, filter)?;
        // Reject oversized canvases before doing any matching.
        canvas_dimensions(working.width(), working.height(), cell_size)?;

        let grid = classify(&working, self.palette);
        info!(
            width = grid.width(),
            height = grid.height(),
            "matched pixels to tiles"
        );

        let mut cache = TileCache::new(self.palette, cell_size, filter);
        let canvas = composite(&grid, &mut cache)?;
        info!(
            width = canvas.width(),
            height = canvas.height(),
            distinct_tiles = cache.len(),
            "composited mosaic"
        );
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::Rgba;

    use super::*;

    fn palette(colours: &[Colour]) -> Palette {
        Palette::from_colours(
            colours
                .iter()
                .enumerate()
                .map(|(i, &c)| (c, PathBuf::from(format!("missing-{i}.png")))),
        )
        .unwrap()
    }

    #[test]
    fn working_width_is_capped_and_height_follows() {
        assert_eq!(working_dimensions(500, 300, 200).unwrap(), (200, 120));
        assert_eq!(working_dimensions(100, 300, 200).unwrap(), (100, 300));
        assert_eq!(working_dimensions(333, 100, 200).unwrap(), (200, 60));
    }

    #[test]
    fn working_height_never_collapses_to_zero() {
        assert_eq!(working_dimensions(10_000, 3, 200).unwrap(), (200, 1));
    }

    #[test]
    fn zero_sized_source_is_a_dimension_error() {
        assert!(matches!(
            working_dimensions(0, 10, 200),
            Err(MosaicError::Dimension { .. })
        ));
        assert!(matches!(
            working_dimensions(10, 0, 200),
            Err(MosaicError::Dimension { .. })
        ));
    }

    #[test]
    fn canvas_overflow_is_a_dimension_error() {
        assert_eq!(canvas_dimensions(200, 120, 10).unwrap(), (2000, 1200));
        assert!(matches!(
            canvas_dimensions(u32::MAX, 1, 2),
            Err(MosaicError::Dimension { .. })
        ));
    }

    #[test]
    fn downsample_keeps_matching_sizes_untouched() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        img.put_pixel(1, 0, Rgba([200, 200, 200, 255]));
        let out = downsample(&img, 2, ResizeFilter::CatmullRom).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn classify_fills_grid_row_major() {
        let black = Colour::new(0, 0, 0);
        let white = Colour::new(255, 255, 255);
        let p = palette(&[black, white]);

        let mut img = RgbaImage::new(3, 2);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let v = if (x + y) % 2 == 0 { 20 } else { 230 };
            *px = Rgba([v, v, v, 255]);
        }

        let grid = classify(&img, &p);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        for (x, y, id) in grid.iter() {
            let expected = if (x + y) % 2 == 0 { 0 } else { 1 };
            assert_eq!(id.index(), expected, "cell ({x}, {y})");
            assert_eq!(grid.get(x, y), id);
        }
    }

    #[test]
    fn missing_tile_fails_composite() {
        let p = palette(&[Colour::new(0, 0, 0)]);
        let grid = classify(&RgbaImage::new(1, 1), &p);
        let mut cache = TileCache::new(&p, 4, ResizeFilter::Nearest);

        let err = composite(&grid, &mut cache).unwrap_err();
        match err {
            MosaicError::TileDecode { path, .. } => {
                assert_eq!(path, PathBuf::from("missing-0.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
