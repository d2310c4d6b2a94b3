//! Palette of tile images keyed by their mean colour.
//!
//! A [`Palette`] is built once from a directory of tiles and is read-only
//! afterwards. Entries keep the order in which tiles were scanned: a tile
//! whose mean colour is already present is dropped, so the first tile
//! scanned owns that colour.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::colour::{Colour, mean_colour};
use crate::error::{MosaicError, Result};
use crate::load_image;
use crate::options::TileOrder;

/// Stable reference to a tile: its position in the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(usize);

impl TileId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub colour: Colour,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette from `(mean colour, tile path)` pairs in scan order.
    ///
    /// # Errors
    ///
    /// [`MosaicError::EmptyPalette`] if `tiles` yields nothing.
    pub fn from_colours<I>(tiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Colour, PathBuf)>,
    {
        let mut entries: Vec<PaletteEntry> = Vec::new();
        for (colour, path) in tiles {
            if let Some(owner) = entries.iter().find(|e| e.colour == colour) {
                debug!(
                    tile = %path.display(),
                    kept = %owner.path.display(),
                    %colour,
                    "duplicate tile colour, keeping first"
                );
                continue;
            }
            entries.push(PaletteEntry { colour, path });
        }

        if entries.is_empty() {
            return Err(MosaicError::EmptyPalette);
        }
        Ok(Self { entries })
    }

    /// Decode every tile, average it, and build the palette.
    ///
    /// Tiles are averaged in parallel but inserted in the order of `paths`.
    /// Unreadable or undecodable tiles are skipped with a warning.
    pub fn from_tile_paths(paths: &[PathBuf]) -> Result<Self> {
        let means: Vec<Option<Colour>> = paths
            .par_iter()
            .map(|path| match load_image(path) {
                Ok(img) => mean_colour(&img),
                Err(err) => {
                    warn!(tile = %path.display(), error = %err, "skipping tile");
                    None
                }
            })
            .collect();

        Self::from_colours(
            paths
                .iter()
                .zip(means)
                .filter_map(|(path, mean)| mean.map(|colour| (colour, path.clone()))),
        )
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: TileId) -> &PaletteEntry {
        &self.entries[id.0]
    }

    pub fn tile_path(&self, id: TileId) -> &Path {
        &self.entries[id.0].path
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = (TileId, &PaletteEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (TileId(i), e))
    }
}

/// List the regular files directly inside `dir`.
pub fn list_tiles(dir: &Path, order: TileOrder) -> Result<Vec<PathBuf>> {
    let dir_err = |source| MosaicError::TileDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let path = entry.map_err(dir_err)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    if order == TileOrder::Name {
        paths.sort();
    }
    Ok(paths)
}

/// Scan `dir` and build its palette.
pub fn build_palette(dir: &Path, order: TileOrder) -> Result<Palette> {
    let paths = list_tiles(dir, order)?;
    debug!(dir = %dir.display(), candidates = paths.len(), "scanning tiles");

    let palette = Palette::from_tile_paths(&paths)?;
    info!(
        dir = %dir.display(),
        colours = palette.len(),
        scanned = paths.len(),
        "palette built"
    );
    Ok(palette)
}
