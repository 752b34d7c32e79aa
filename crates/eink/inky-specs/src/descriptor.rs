//! Display descriptors and construction-time validation

use core::fmt;

use crate::family::{ColorMode, ColorRequirement, DisplayFamily, Resolution};

/// Immutable description of a constructed display
///
/// Produced by the factory or the identity decoder. The resolution never
/// changes for the lifetime of the driver that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisplayDescriptor {
    /// Panel family
    pub family: DisplayFamily,
    /// Pixel grid size
    pub resolution: Resolution,
    /// Ink set
    pub color_mode: ColorMode,
    /// True for a physical panel, false for a simulator
    pub is_hardware: bool,
}

impl DisplayDescriptor {
    /// Build a descriptor after checking the colour and resolution against
    /// the family's rules.
    ///
    /// A missing resolution falls back to the family default. A missing
    /// colour is rejected only for physical pHAT/wHAT panels.
    pub fn validated(
        family: DisplayFamily,
        color: Option<ColorMode>,
        resolution: Option<Resolution>,
        is_hardware: bool,
    ) -> Result<Self, ConfigurationError> {
        let color_mode = validate_color(family, color, is_hardware)?;
        let resolution = resolution.unwrap_or_else(|| family.default_resolution());
        if resolution.is_empty() {
            return Err(ConfigurationError::EmptyResolution { resolution });
        }
        Ok(Self {
            family,
            resolution,
            color_mode,
            is_hardware,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.resolution.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.resolution.height
    }

    /// Same descriptor, marked as hardware or simulated
    #[must_use]
    pub const fn with_hardware(mut self, is_hardware: bool) -> Self {
        self.is_hardware = is_hardware;
        self
    }
}

impl fmt::Display for DisplayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.family,
            self.resolution,
            self.color_mode,
            if self.is_hardware { "hardware" } else { "simulated" }
        )
    }
}

/// Check a caller-supplied colour against the family's [`ColorRequirement`]
///
/// Families that forbid a colour tolerate `Multi`, which is their intrinsic
/// ink set.
pub fn validate_color(
    family: DisplayFamily,
    color: Option<ColorMode>,
    is_hardware: bool,
) -> Result<ColorMode, ConfigurationError> {
    match (family.color_requirement(is_hardware), color) {
        (ColorRequirement::Required, None) => Err(ConfigurationError::ColorRequired { family }),
        (ColorRequirement::Optional, None) => Ok(family.default_color()),
        (ColorRequirement::Required | ColorRequirement::Optional, Some(ColorMode::Multi)) => {
            Err(ConfigurationError::UnsupportedColor {
                family,
                color: ColorMode::Multi,
            })
        }
        (ColorRequirement::Required | ColorRequirement::Optional, Some(color)) => Ok(color),
        (ColorRequirement::Forbidden, None | Some(ColorMode::Multi)) => Ok(ColorMode::Multi),
        (ColorRequirement::Forbidden, Some(color)) => {
            Err(ConfigurationError::ColorForbidden { family, color })
        }
    }
}

/// Invalid construction arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The family needs a colour and none was given
    ColorRequired {
        /// Requested family
        family: DisplayFamily,
    },
    /// The family has a fixed ink set and a colour was given
    ColorForbidden {
        /// Requested family
        family: DisplayFamily,
        /// Rejected colour
        color: ColorMode,
    },
    /// The colour is not one the family can show
    UnsupportedColor {
        /// Requested family
        family: DisplayFamily,
        /// Rejected colour
        color: ColorMode,
    },
    /// Resolution override with a zero dimension
    EmptyResolution {
        /// Rejected resolution
        resolution: Resolution,
    },
    /// Rotation other than 0, 90, 180 or 270 degrees
    InvalidRotation {
        /// Rejected angle
        degrees: u16,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColorRequired { family } => {
                write!(f, "colour required for display type '{family}' (black, red or yellow)")
            }
            Self::ColorForbidden { family, color } => write!(
                f,
                "display type '{family}' has a fixed ink set and does not take colour '{color}'"
            ),
            Self::UnsupportedColor { family, color } => {
                write!(f, "display type '{family}' cannot show colour '{color}'")
            }
            Self::EmptyResolution { resolution } => {
                write!(f, "resolution {resolution} has a zero dimension")
            }
            Self::InvalidRotation { degrees } => {
                write!(f, "rotation must be 0, 90, 180 or 270 degrees, got {degrees}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_color_missing() {
        assert_eq!(
            validate_color(DisplayFamily::Phat, None, true),
            Err(ConfigurationError::ColorRequired {
                family: DisplayFamily::Phat
            })
        );
    }

    #[test]
    fn test_required_color_rejects_multi() {
        assert!(matches!(
            validate_color(DisplayFamily::What, Some(ColorMode::Multi), true),
            Err(ConfigurationError::UnsupportedColor { .. })
        ));
    }

    #[test]
    fn test_simulated_color_is_optional() {
        assert_eq!(validate_color(DisplayFamily::Phat, None, false), Ok(ColorMode::Mono));
        assert_eq!(
            validate_color(DisplayFamily::WhatSsd1683, Some(ColorMode::Yellow), false),
            Ok(ColorMode::Yellow)
        );
        assert!(matches!(
            validate_color(DisplayFamily::PhatSsd1608, Some(ColorMode::Multi), false),
            Err(ConfigurationError::UnsupportedColor { .. })
        ));
        let sim = DisplayDescriptor::validated(DisplayFamily::What, None, None, false).unwrap();
        assert_eq!(sim.color_mode, ColorMode::Mono);
        assert_eq!(
            DisplayDescriptor::validated(DisplayFamily::What, None, None, true),
            Err(ConfigurationError::ColorRequired {
                family: DisplayFamily::What
            })
        );
    }

    #[test]
    fn test_forbidden_color() {
        assert_eq!(validate_color(DisplayFamily::Impressions, None, true), Ok(ColorMode::Multi));
        assert_eq!(
            validate_color(DisplayFamily::Impressions73, Some(ColorMode::Multi), false),
            Ok(ColorMode::Multi)
        );
        assert_eq!(
            validate_color(DisplayFamily::Impressions, Some(ColorMode::Red), false),
            Err(ConfigurationError::ColorForbidden {
                family: DisplayFamily::Impressions,
                color: ColorMode::Red
            })
        );
    }

    #[test]
    fn test_validated_uses_default_resolution() {
        let desc =
            DisplayDescriptor::validated(DisplayFamily::Phat, Some(ColorMode::Red), None, true)
                .unwrap();
        assert_eq!(desc.resolution, Resolution::new(212, 104));
        assert_eq!(desc.color_mode, ColorMode::Red);
        assert!(desc.is_hardware);
    }

    #[test]
    fn test_validated_rejects_empty_resolution() {
        let err = DisplayDescriptor::validated(
            DisplayFamily::Impressions,
            None,
            Some(Resolution::new(0, 448)),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyResolution { .. }));
    }

    #[test]
    fn test_with_hardware_keeps_everything_else() {
        let hw = DisplayDescriptor::validated(
            DisplayFamily::WhatSsd1683,
            Some(ColorMode::Yellow),
            None,
            true,
        )
        .unwrap();
        let sim = hw.with_hardware(false);
        assert_eq!(sim.family, hw.family);
        assert_eq!(sim.resolution, hw.resolution);
        assert_eq!(sim.color_mode, hw.color_mode);
        assert!(!sim.is_hardware);
    }
}
