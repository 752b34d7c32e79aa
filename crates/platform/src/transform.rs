//! Panel orientation
//!
//! Boards are often mounted upside down or in portrait. Orientation is
//! applied when a frame leaves the driver, never to caller coordinates:
//! `set_pixel(0, 0, ..)` always addresses the logical top-left corner.

use inky_specs::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Display rotation, counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// No rotation (landscape: width × height)
    #[default]
    Degrees0,
    /// Rotate 90° counter-clockwise (portrait: height × width)
    Degrees90,
    /// Rotate 180° (upside-down landscape: width × height)
    Degrees180,
    /// Rotate 270° counter-clockwise / 90° clockwise (portrait: height × width)
    Degrees270,
}

impl Rotation {
    /// Angle in degrees
    pub const fn degrees(&self) -> u16 {
        match self {
            Rotation::Degrees0 => 0,
            Rotation::Degrees90 => 90,
            Rotation::Degrees180 => 180,
            Rotation::Degrees270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Degrees90 | Rotation::Degrees270)
    }

    /// Calculate output dimensions after rotation
    pub fn apply_to_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = ConfigurationError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Degrees0),
            90 => Ok(Rotation::Degrees90),
            180 => Ok(Rotation::Degrees180),
            270 => Ok(Rotation::Degrees270),
            _ => Err(ConfigurationError::InvalidRotation { degrees }),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Flips and rotation applied to every outgoing frame
///
/// Flips are applied first, then rotation. The flip names follow the Inky
/// Python library: `h_flip` mirrors the rows top-to-bottom and `v_flip`
/// mirrors each row left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    /// Mirror top-to-bottom
    pub h_flip: bool,
    /// Mirror left-to-right
    pub v_flip: bool,
    /// Counter-clockwise rotation
    pub rotation: Rotation,
}

impl Orientation {
    /// No flips, no rotation
    pub const IDENTITY: Self = Self {
        h_flip: false,
        v_flip: false,
        rotation: Rotation::Degrees0,
    };

    /// True when applying this orientation is a no-op
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Output dimensions for a `width` × `height` source
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        self.rotation.apply_to_dimensions(width, height)
    }

    /// Transform a row-major buffer
    ///
    /// Returns the new buffer and its (width, height). Buffers whose length
    /// does not match `width * height` are returned unchanged.
    pub fn apply<T: Copy>(&self, src: &[T], width: u32, height: u32) -> (Vec<T>, u32, u32) {
        if src.len() != (width as usize) * (height as usize) {
            return (src.to_vec(), width, height);
        }
        let mut buf = src.to_vec();
        if self.v_flip {
            for row in buf.chunks_exact_mut(width as usize) {
                row.reverse();
            }
        }
        if self.h_flip {
            buf = flip_vertical(&buf, width as usize);
        }
        match self.rotation {
            Rotation::Degrees0 => (buf, width, height),
            Rotation::Degrees90 => (rotate_90_ccw(&buf, width, height), height, width),
            Rotation::Degrees180 => {
                buf.reverse();
                (buf, width, height)
            }
            Rotation::Degrees270 => (rotate_90_cw(&buf, width, height), height, width),
        }
    }
}

fn flip_vertical<T: Copy>(src: &[T], width: usize) -> Vec<T> {
    src.chunks_exact(width).rev().flatten().copied().collect()
}

/// Rotate 90 degrees clockwise
///
/// Transforms (x, y) → (height - 1 - y, x)
/// Output dimensions: height × width
fn rotate_90_cw<T: Copy>(src: &[T], width: u32, height: u32) -> Vec<T> {
    let (w, h) = (width as usize, height as usize);
    let mut dst = Vec::with_capacity(src.len());
    // Output row `dy` is source column `dy`, read bottom to top.
    for dy in 0..w {
        for dx in 0..h {
            let sy = h - 1 - dx;
            if let Some(&p) = src.get(sy * w + dy) {
                dst.push(p);
            }
        }
    }
    dst
}

/// Rotate 90 degrees counter-clockwise
///
/// Transforms (x, y) → (y, width - 1 - x)
/// Output dimensions: height × width
fn rotate_90_ccw<T: Copy>(src: &[T], width: u32, height: u32) -> Vec<T> {
    let (w, h) = (width as usize, height as usize);
    let mut dst = Vec::with_capacity(src.len());
    for dy in 0..w {
        let sx = w - 1 - dy;
        for dx in 0..h {
            if let Some(&p) = src.get(dx * w + sx) {
                dst.push(p);
            }
        }
    }
    dst
}
