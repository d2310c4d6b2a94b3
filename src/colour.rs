//! RGB colour type shared by the palette builder and the matcher.
//!
//! Alpha is never part of a `Colour`: it is dropped when converting from
//! `Rgba` pixels and ignored when averaging tiles.

use std::fmt;

use image::{Rgba, RgbaImage};

/// An opaque 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in raw RGB space, `0.0..=441.68`.
    #[inline]
    pub fn distance(self, other: Colour) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<Rgba<u8>> for Colour {
    fn from(px: Rgba<u8>) -> Self {
        let [r, g, b, _] = px.0;
        Colour { r, g, b }
    }
}

impl From<[u8; 3]> for Colour {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Colour { r, g, b }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Per-channel arithmetic mean of every pixel, truncated toward zero.
///
/// Returns `None` for an image without pixels.
pub fn mean_colour(img: &RgbaImage) -> Option<Colour> {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return None;
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in img.pixels() {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
    }

    // Each mean is <= 255 because every summand is.
    Some(Colour::new(
        (r / total) as u8,
        (g / total) as u8,
        (b / total) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_mean_is_its_colour() {
        for (w, h) in [(1, 1), (7, 5), (64, 64)] {
            let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
            assert_eq!(mean_colour(&img), Some(Colour::new(10, 20, 30)));
        }
    }

    #[test]
    fn mean_truncates_and_ignores_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([1, 3, 255, 255]));
        assert_eq!(mean_colour(&img), Some(Colour::new(0, 1, 127)));
    }

    #[test]
    fn large_white_image_does_not_overflow() {
        let img = RgbaImage::from_pixel(512, 512, Rgba([255, 255, 255, 255]));
        assert_eq!(mean_colour(&img), Some(Colour::new(255, 255, 255)));
    }

    #[test]
    fn empty_image_has_no_mean() {
        assert_eq!(mean_colour(&RgbaImage::new(0, 0)), None);
    }

    #[test]
    fn distance_extremes() {
        let black = Colour::new(0, 0, 0);
        let white = Colour::new(255, 255, 255);
        assert_eq!(black.distance(black), 0.0);
        assert!((black.distance(white) - 441.672_955_9).abs() < 1e-6);
        assert_eq!(black.distance(white), white.distance(black));
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Colour::new(255, 8, 171).to_string(), "#FF08AB");
    }
}
