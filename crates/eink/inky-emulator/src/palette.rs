//! Ink palettes
//!
//! Seven-colour panels show noticeably muted colours. The simulator mixes a
//! measured ("saturated") table with an idealised ("desaturated") one; the
//! saturation argument of `set_image` picks the mix.
//!
//! Colours are packed as ARGB `0xAARRGGBB` with alpha always `0xFF`.

use image::RgbImage;
use inky_platform::{clamp_saturation, IndexedImage, PALETTE_MASK};
use inky_specs::ColorMode;

/// 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Idealised seven-colour inks, index 0–7
pub const DESATURATED: [Rgb; 8] = [
    [0, 0, 0],
    [255, 255, 255],
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 0],
    [255, 255, 0],
    [255, 140, 0],
    [255, 255, 255],
];

/// Measured seven-colour inks, index 0–7
pub const SATURATED: [Rgb; 8] = [
    [57, 48, 57],
    [255, 255, 255],
    [58, 91, 70],
    [61, 59, 94],
    [156, 72, 75],
    [208, 190, 71],
    [177, 106, 73],
    [255, 255, 255],
];

/// Index 7 ("clean") always shows as pure white
pub const CLEAN: Rgb = [255, 255, 255];

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const RED: Rgb = [255, 0, 0];
const YELLOW: Rgb = [255, 255, 0];

/// Pack an RGB triple as opaque ARGB
pub const fn argb(rgb: Rgb) -> u32 {
    0xFF00_0000 | ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | (rgb[2] as u32)
}

/// Unpack the RGB channels of an ARGB value
#[allow(clippy::cast_possible_truncation)] // each channel is masked to 8 bits
pub const fn rgb_of(argb: u32) -> Rgb {
    [
        ((argb >> 16) & 0xFF) as u8,
        ((argb >> 8) & 0xFF) as u8,
        (argb & 0xFF) as u8,
    ]
}

/// Opaque white
pub const WHITE_ARGB: u32 = argb(WHITE);
/// Opaque black
pub const BLACK_ARGB: u32 = argb(BLACK);

/// Eight RGB entries for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb; 8],
    inks: usize,
}

impl Palette {
    /// Seven-colour palette at the given saturation
    ///
    /// Each channel is `trunc(s × saturated + (1 − s) × desaturated)`; entry 7
    /// is always white.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // blend stays in 0.0..=255.0
    pub fn blended(saturation: f32) -> Self {
        let s = f64::from(clamp_saturation(saturation));
        let mut entries = [CLEAN; 8];
        for (entry, (sat, des)) in entries.iter_mut().zip(SATURATED.iter().zip(DESATURATED.iter())).take(7)
        {
            for ((out, &sc), &dc) in entry.iter_mut().zip(sat).zip(des) {
                *out = (f64::from(sc) * s + f64::from(dc) * (1.0 - s)) as u8;
            }
        }
        Self { entries, inks: 8 }
    }

    /// Palette for a panel's ink set
    ///
    /// Saturation only affects seven-colour panels. On black/white/accent
    /// panels any index past the accent shows black.
    pub fn for_mode(mode: ColorMode, saturation: f32) -> Self {
        match mode {
            ColorMode::Multi => Self::blended(saturation),
            ColorMode::Mono => Self::fixed(&[WHITE, BLACK]),
            ColorMode::Red => Self::fixed(&[WHITE, BLACK, RED]),
            ColorMode::Yellow => Self::fixed(&[WHITE, BLACK, YELLOW]),
        }
    }

    fn fixed(inks: &[Rgb]) -> Self {
        let mut entries = [BLACK; 8];
        for (entry, ink) in entries.iter_mut().zip(inks) {
            *entry = *ink;
        }
        Self {
            entries,
            inks: inks.len(),
        }
    }

    /// RGB for a palette index (masked to `0..=7`)
    pub fn rgb(&self, index: u8) -> Rgb {
        self.entries
            .get(usize::from(index & PALETTE_MASK))
            .copied()
            .unwrap_or(BLACK)
    }

    /// ARGB for a palette index
    pub fn argb(&self, index: u8) -> u32 {
        argb(self.rgb(index))
    }

    /// Number of distinct inks the panel can show
    pub fn ink_count(&self) -> usize {
        self.inks
    }

    /// Closest ink to an RGB colour (squared Euclidean distance)
    #[allow(clippy::cast_possible_truncation)] // index < 8
    pub fn nearest_index(&self, rgb: Rgb) -> u8 {
        let distance = |entry: &Rgb| -> u32 {
            entry
                .iter()
                .zip(rgb.iter())
                .map(|(&a, &b)| {
                    let d = u32::from(a.abs_diff(b));
                    d * d
                })
                .sum()
        };
        self.entries
            .iter()
            .take(self.inks)
            .enumerate()
            .min_by_key(|(_, entry)| distance(entry))
            .map_or(0, |(i, _)| i as u8)
    }

    /// Map an RGB image onto this palette (nearest ink, no dithering)
    pub fn quantize(&self, image: &RgbImage) -> IndexedImage {
        let mut out = IndexedImage::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                out.set(x, y, self.nearest_index(pixel.0));
            }
        }
        out
    }
}
