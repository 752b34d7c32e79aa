//! Frame composition
//!
//! Turns a palette-indexed image into the RGB surface a backend shows:
//! orientation first, then palette lookup.

use std::path::Path;

use image::RgbImage;
use inky_platform::{IndexedImage, Orientation};

use crate::palette::{rgb_of, Palette};

/// An RGB frame ready for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width after rotation
    pub width: u32,
    /// Height after rotation
    pub height: u32,
    /// Row-major ARGB pixels
    pub pixels: Vec<u32>,
    /// ARGB colour of the border margin
    pub border: u32,
}

impl Frame {
    /// A frame of one colour
    pub fn solid(width: u32, height: u32, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; (width as usize) * (height as usize)],
            border: argb,
        }
    }

    /// ARGB at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.width as usize) + (x as usize))
            .copied()
    }

    /// True when every pixel has the given colour
    pub fn is_solid(&self, argb: u32) -> bool {
        self.pixels.iter().all(|&p| p == argb)
    }

    /// Convert to an `image` buffer
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(rgb_of(self.pixel(x, y).unwrap_or(self.border)))
        })
    }

    /// Save as PNG (or any format `image` infers from the extension)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_rgb_image().save(path)
    }
}

/// Orient and colour an indexed image
pub fn compose(
    image: &IndexedImage,
    orientation: &Orientation,
    palette: &Palette,
    border: u8,
) -> Frame {
    let (indices, width, height) = orientation.apply(image.pixels(), image.width(), image.height());
    Frame {
        width,
        height,
        pixels: indices.iter().map(|&i| palette.argb(i)).collect(),
        border: palette.argb(border),
    }
}
