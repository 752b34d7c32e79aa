//! Palette-indexed frame buffer
//!
//! Every Inky panel is driven with a grid of palette indices rather than RGB
//! values. [`IndexedImage`] is that grid; it is also an embedded-graphics
//! [`DrawTarget`] so frames can be composed with the usual primitives.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU4;
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use inky_specs::{MultiInk, Resolution, TriInk};

/// Palette indices occupy the low three bits; higher bits are discarded.
pub const PALETTE_MASK: u8 = 0x07;

/// A palette index in `0..=7`
///
/// Which colour an index shows depends on the panel's ink set: index 1 is
/// white on a seven-colour panel but black on a black/white/red one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    /// Wrap a raw value, masking it into range
    pub const fn new(value: u8) -> Self {
        Self(value & PALETTE_MASK)
    }

    /// Raw index
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl PixelColor for PaletteIndex {
    type Raw = RawU4;
}

impl From<u8> for PaletteIndex {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<MultiInk> for PaletteIndex {
    fn from(ink: MultiInk) -> Self {
        Self::new(ink as u8)
    }
}

impl From<TriInk> for PaletteIndex {
    fn from(ink: TriInk) -> Self {
        Self::new(ink as u8)
    }
}

/// Fixed-size grid of palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IndexedImage {
    /// Create an image filled with index 0
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create an image sized to a resolution, filled with index 0
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self::new(resolution.width, resolution.height)
    }

    /// Create an image filled with one index
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![value & PALETTE_MASK; len],
        }
    }

    /// Wrap row-major indices; returns `None` if the length does not match
    ///
    /// Out-of-range values are masked, not rejected.
    pub fn from_indices(width: u32, height: u32, mut indices: Vec<u8>) -> Option<Self> {
        if indices.len() != (width as usize) * (height as usize) {
            return None;
        }
        for value in &mut indices {
            *value &= PALETTE_MASK;
        }
        Some(Self {
            width,
            height,
            pixels: indices,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width × height
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Row-major palette indices
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Index at (x, y), or `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.offset(x, y).and_then(|i| self.pixels.get(i).copied())
    }

    /// Write a masked index at (x, y)
    ///
    /// Returns `false` (and changes nothing) when the coordinate is outside
    /// the grid.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.offset(x, y).and_then(|i| self.pixels.get_mut(i)) {
            Some(pixel) => {
                *pixel = value & PALETTE_MASK;
                true
            }
            None => false,
        }
    }

    /// Overwrite every pixel
    pub fn fill(&mut self, value: u8) {
        self.pixels.fill(value & PALETTE_MASK);
    }

    /// Nearest-neighbour copy at a different size
    pub fn resized(&self, width: u32, height: u32) -> IndexedImage {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = IndexedImage::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        let src_w = u64::from(self.width);
        let src_h = u64::from(self.height);
        for y in 0..height {
            let sy = (u64::from(y) * src_h / u64::from(height)) as usize;
            for x in 0..width {
                let sx = (u64::from(x) * src_w / u64::from(width)) as usize;
                let src = sy * (self.width as usize) + sx;
                let dst = (y as usize) * (width as usize) + (x as usize);
                if let (Some(&value), Some(pixel)) = (self.pixels.get(src), out.pixels.get_mut(dst))
                {
                    *pixel = value;
                }
            }
        }
        out
    }

    /// Replace the contents with `other`, rescaling if the sizes differ
    ///
    /// The size of `self` never changes.
    pub fn copy_from(&mut self, other: &IndexedImage) {
        if other.width == self.width && other.height == self.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            tracing::debug!(
                from_width = other.width,
                from_height = other.height,
                to_width = self.width,
                to_height = self.height,
                "resizing image to fit display"
            );
            self.pixels = other.resized(self.width, self.height).pixels;
        }
    }
}

impl OriginDimensions for IndexedImage {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for IndexedImage {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.value());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.value());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_set_masks_value() {
        let mut img = IndexedImage::new(4, 4);
        assert!(img.set(1, 1, 0x0C));
        assert_eq!(img.get(1, 1), Some(4));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut img = IndexedImage::new(4, 4);
        let before = img.clone();
        assert!(!img.set(-1, 0, 3));
        assert!(!img.set(0, -1, 3));
        assert!(!img.set(4, 0, 3));
        assert!(!img.set(0, 4, 3));
        assert_eq!(img, before);
        assert_eq!(img.get(4, 4), None);
    }

    #[test]
    fn test_from_indices_checks_length() {
        assert!(IndexedImage::from_indices(2, 2, vec![0, 1, 2]).is_none());
        let img = IndexedImage::from_indices(2, 1, vec![9, 1]).unwrap();
        assert_eq!(img.pixels(), &[1, 1]);
    }

    #[test]
    fn test_resize_nearest_neighbour() {
        let src = IndexedImage::from_indices(2, 1, vec![1, 2]).unwrap();
        let big = src.resized(4, 2);
        assert_eq!(big.pixels(), &[1, 1, 2, 2, 1, 1, 2, 2]);
    }

    #[test]
    fn test_copy_from_keeps_size() {
        let mut dst = IndexedImage::new(4, 4);
        let src = IndexedImage::filled(2, 2, 5);
        dst.copy_from(&src);
        assert_eq!(dst.resolution(), Resolution::new(4, 4));
        assert!(dst.pixels().iter().all(|&p| p == 5));
    }

    #[test]
    fn test_draw_target() {
        let mut img = IndexedImage::new(10, 10);
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex::new(3)))
            .draw(&mut img)
            .unwrap();
        assert_eq!(img.get(2, 2), Some(3));
        assert_eq!(img.get(4, 4), Some(3));
        assert_eq!(img.get(5, 5), Some(0));
    }

    #[test]
    fn test_draw_clips_offscreen_pixels() {
        let mut img = IndexedImage::new(4, 4);
        Rectangle::new(Point::new(-2, -2), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex::from(TriInk::Accent)))
            .draw(&mut img)
            .unwrap();
        assert!(img.pixels().iter().all(|&p| p == 2));
    }
}
