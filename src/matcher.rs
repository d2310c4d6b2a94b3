//! Nearest palette colour lookup.
//!
//! Linear scan over the palette in insertion order. Equal distances resolve
//! to the entry seen first, and a distance below [`EXACT_MATCH_EPSILON`]
//! stops the scan immediately. For palettes of a few dozen tiles the scan is
//! cheap; a k-d tree over RGB would be the next step for much larger ones.

use crate::colour::Colour;
use crate::palette::{Palette, PaletteEntry, TileId};

/// Larger than any RGB distance (`sqrt(3 * 255^2) ~= 441.7`).
pub const DISTANCE_SENTINEL: f64 = 500.0;

pub const EXACT_MATCH_EPSILON: f64 = 0.001;

impl Palette {
    /// The entry whose colour is closest to `query`.
    pub fn nearest(&self, query: Colour) -> (TileId, &PaletteEntry) {
        let mut best_distance = DISTANCE_SENTINEL;
        let mut best = None;

        for (id, entry) in self.ids() {
            let distance = query.distance(entry.colour);
            if distance < EXACT_MATCH_EPSILON {
                return (id, entry);
            }
            if distance >= best_distance {
                continue;
            }
            best_distance = distance;
            best = Some((id, entry));
        }

        // A constructed palette is never empty and every distance is below
        // the sentinel, so the first entry is always recorded.
        best.unwrap_or_else(|| unreachable!("palette has at least one entry"))
    }
}

/// Closest palette colour to `(r, g, b)`.
pub fn nearest(palette: &Palette, r: u8, g: u8, b: u8) -> Colour {
    palette.nearest(Colour::new(r, g, b)).1.colour
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn palette(colours: &[(u8, u8, u8)]) -> Palette {
        Palette::from_colours(
            colours
                .iter()
                .enumerate()
                .map(|(i, &(r, g, b))| (Colour::new(r, g, b), PathBuf::from(format!("{i}.png")))),
        )
        .unwrap()
    }

    #[test]
    fn exact_colour_matches_itself() {
        let colours = [(0, 0, 0), (128, 128, 128), (255, 255, 255), (12, 200, 7)];
        let p = palette(&colours);
        for &(r, g, b) in &colours {
            assert_eq!(nearest(&p, r, g, b), Colour::new(r, g, b));
        }
    }

    #[test]
    fn closer_colour_always_wins() {
        let p = palette(&[(0, 0, 0), (128, 128, 128), (255, 255, 255)]);
        assert_eq!(nearest(&p, 10, 10, 10), Colour::new(0, 0, 0));
        assert_eq!(nearest(&p, 200, 200, 200), Colour::new(255, 255, 255));
        assert_eq!(nearest(&p, 100, 140, 120), Colour::new(128, 128, 128));
    }

    #[test]
    fn nearest_never_returns_a_farther_entry() {
        let p = palette(&[(255, 0, 0), (0, 255, 0), (0, 0, 255), (90, 90, 90)]);
        for r in (0..=255).step_by(51) {
            for g in (0..=255).step_by(51) {
                for b in (0..=255).step_by(51) {
                    let q = Colour::new(r, g, b);
                    let got = nearest(&p, r, g, b);
                    for e in p.entries() {
                        assert!(q.distance(got) <= q.distance(e.colour));
                    }
                }
            }
        }
    }

    #[test]
    fn equal_distance_resolves_to_first_inserted() {
        let q = (100, 100, 100);
        let p = palette(&[(110, 100, 100), (90, 100, 100)]);
        assert_eq!(nearest(&p, q.0, q.1, q.2), Colour::new(110, 100, 100));

        let p = palette(&[(90, 100, 100), (110, 100, 100)]);
        assert_eq!(nearest(&p, q.0, q.1, q.2), Colour::new(90, 100, 100));
    }

    #[test]
    fn nearest_reports_tile_id() {
        let p = palette(&[(0, 0, 0), (255, 255, 255)]);
        let (id, entry) = p.nearest(Colour::new(250, 250, 250));
        assert_eq!(id.index(), 1);
        assert_eq!(entry.path, PathBuf::from("1.png"));
    }
}
