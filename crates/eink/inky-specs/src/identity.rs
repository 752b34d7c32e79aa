//! Identity-chip decoding
//!
//! Every Inky board carries a small identity EEPROM. Reading the chip is the
//! job of the hardware layer; this module only maps the decoded record to a
//! [`DisplayDescriptor`].
//!
//! | Variant codes | Family          | Resolution                    |
//! |---------------|-----------------|-------------------------------|
//! | 1, 4, 5       | `Phat`          | 212×104, colour from record   |
//! | 10, 11, 12    | `PhatSsd1608`   | 250×122, colour from record   |
//! | 2, 3, 6, 7, 8 | `What`          | 400×300, colour from record   |
//! | 14            | `Impressions`   | 600×448                       |
//! | 15, 16        | `Impressions`   | 640×400                       |
//! | 17, 18, 19    | `WhatSsd1683`   | 400×300, colour from record   |
//! | 20            | `Impressions73` | 800×480                       |

use crate::descriptor::DisplayDescriptor;
use crate::family::{ColorMode, DisplayFamily, Resolution};

/// Record read from a board's identity chip
///
/// Opaque beyond its two accessors. The library never caches one; every
/// auto-detect reads the chip again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct IdentityRecord {
    variant_code: u8,
    color: Option<ColorMode>,
}

impl IdentityRecord {
    /// Wrap the values decoded by the chip reader
    pub const fn new(variant_code: u8, color: Option<ColorMode>) -> Self {
        Self {
            variant_code,
            color,
        }
    }

    /// Board variant code
    pub const fn variant_code(&self) -> u8 {
        self.variant_code
    }

    /// Ink colour stored on the chip, if any
    pub const fn color(&self) -> Option<ColorMode> {
        self.color
    }
}

/// How a variant code maps to a panel
enum VariantShape {
    /// Family default resolution, colour taken from the record
    ColorFromRecord(DisplayFamily),
    /// Fixed seven-colour panel at the given resolution
    Fixed(DisplayFamily, Resolution),
}

fn shape_of(variant_code: u8) -> Option<VariantShape> {
    use VariantShape::{ColorFromRecord, Fixed};

    let shape = match variant_code {
        1 | 4 | 5 => ColorFromRecord(DisplayFamily::Phat),
        10..=12 => ColorFromRecord(DisplayFamily::PhatSsd1608),
        2 | 3 | 6..=8 => ColorFromRecord(DisplayFamily::What),
        14 => Fixed(DisplayFamily::Impressions, Resolution::new(600, 448)),
        15 | 16 => Fixed(DisplayFamily::Impressions, Resolution::new(640, 400)),
        17..=19 => ColorFromRecord(DisplayFamily::WhatSsd1683),
        20 => Fixed(DisplayFamily::Impressions73, Resolution::new(800, 480)),
        _ => return None,
    };
    Some(shape)
}

/// Map an identity record to a hardware descriptor
///
/// Returns `None` ("undetected") for a missing record, an unknown variant
/// code, or a colour-derived variant whose record holds no usable colour.
pub fn decode(record: Option<&IdentityRecord>) -> Option<DisplayDescriptor> {
    let record = record?;
    let descriptor = match shape_of(record.variant_code())? {
        VariantShape::ColorFromRecord(family) => {
            let color_mode = match record.color()? {
                ColorMode::Multi => return None,
                color => color,
            };
            DisplayDescriptor {
                family,
                resolution: family.default_resolution(),
                color_mode,
                is_hardware: true,
            }
        }
        VariantShape::Fixed(family, resolution) => DisplayDescriptor {
            family,
            resolution,
            color_mode: ColorMode::Multi,
            is_hardware: true,
        },
    };
    Some(descriptor)
}

/// Human-readable board name for a variant code
pub const fn variant_name(variant_code: u8) -> Option<&'static str> {
    let name = match variant_code {
        1 => "Red pHAT (High-Temp)",
        2 => "Yellow wHAT",
        3 => "Black wHAT",
        4 => "Black pHAT",
        5 => "Yellow pHAT",
        6 => "Red wHAT",
        7 => "Red wHAT (High-Temp)",
        8 => "Red wHAT",
        10 => "Black pHAT (SSD1608)",
        11 => "Red pHAT (SSD1608)",
        12 => "Yellow pHAT (SSD1608)",
        14 => "7-Colour (UC8159)",
        15 | 16 => "7-Colour 640x400 (UC8159)",
        17 => "Black wHAT (SSD1683)",
        18 => "Red wHAT (SSD1683)",
        19 => "Yellow wHAT (SSD1683)",
        20 => "7-Colour 800x480 (AC073TC1A)",
        _ => return None,
    };
    Some(name)
}
