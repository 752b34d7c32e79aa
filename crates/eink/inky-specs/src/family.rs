//! Panel families, colour modes and controllers
//!
//! Every Inky board belongs to exactly one [`DisplayFamily`]. The family fixes
//! the controller chip, the default resolution, and whether a colour argument
//! is required when the board is constructed.

use core::fmt;
use core::str::FromStr;

/// Width × height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when either dimension is zero
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Supported panel families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DisplayFamily {
    /// Inky pHAT, 212×104, IL91874 controller
    Phat,
    /// Inky pHAT with SSD1608 controller, 250×122
    PhatSsd1608,
    /// Inky wHAT, 400×300, IL91874 controller
    What,
    /// Inky wHAT with SSD1683 controller, 400×300
    WhatSsd1683,
    /// Inky Impression 5.7" / 4" seven-colour panels (UC8159)
    Impressions,
    /// Inky Impression 7.3" seven-colour panel (AC073TC1A)
    Impressions73,
}

impl DisplayFamily {
    /// All families, in registry order
    pub const ALL: [DisplayFamily; 6] = [
        DisplayFamily::Phat,
        DisplayFamily::PhatSsd1608,
        DisplayFamily::What,
        DisplayFamily::WhatSsd1683,
        DisplayFamily::Impressions,
        DisplayFamily::Impressions73,
    ];

    /// Name used on the command line and in configuration files
    pub const fn name(&self) -> &'static str {
        match self {
            DisplayFamily::Phat => "phat",
            DisplayFamily::PhatSsd1608 => "phatssd1608",
            DisplayFamily::What => "what",
            DisplayFamily::WhatSsd1683 => "whatssd1683",
            DisplayFamily::Impressions => "impressions",
            DisplayFamily::Impressions73 => "impressions73",
        }
    }

    /// Resolution used when no override is supplied
    pub const fn default_resolution(&self) -> Resolution {
        match self {
            DisplayFamily::Phat => Resolution::new(212, 104),
            DisplayFamily::PhatSsd1608 => Resolution::new(250, 122),
            DisplayFamily::What | DisplayFamily::WhatSsd1683 => Resolution::new(400, 300),
            DisplayFamily::Impressions => Resolution::new(600, 448),
            DisplayFamily::Impressions73 => Resolution::new(800, 480),
        }
    }

    /// Controller chip driving this family
    pub const fn controller(&self) -> Controller {
        match self {
            DisplayFamily::Phat | DisplayFamily::What => Controller::IL91874,
            DisplayFamily::PhatSsd1608 => Controller::SSD1608,
            DisplayFamily::WhatSsd1683 => Controller::SSD1683,
            DisplayFamily::Impressions => Controller::UC8159,
            DisplayFamily::Impressions73 => Controller::AC073TC1A,
        }
    }

    /// Whether construction takes a colour argument
    ///
    /// Physical two/three-colour panels need their ink set named; a simulator
    /// of the same family falls back to [`default_color`](Self::default_color).
    pub const fn color_requirement(&self, is_hardware: bool) -> ColorRequirement {
        if self.is_multicolor() {
            ColorRequirement::Forbidden
        } else if is_hardware {
            ColorRequirement::Required
        } else {
            ColorRequirement::Optional
        }
    }

    /// True for the seven-colour Impression panels
    pub const fn is_multicolor(&self) -> bool {
        matches!(self, DisplayFamily::Impressions | DisplayFamily::Impressions73)
    }

    /// Colour mode a simulator uses when the caller supplied none
    pub const fn default_color(&self) -> ColorMode {
        if self.is_multicolor() {
            ColorMode::Multi
        } else {
            ColorMode::Mono
        }
    }
}

impl fmt::Display for DisplayFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayFamily::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s))
            .ok_or(ParseError::UnknownFamily)
    }
}

/// A family as requested by a caller: either concrete or auto-detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RequestedFamily {
    /// Resolve from the identity chip (hardware) or use the default simulator
    #[default]
    Auto,
    /// A specific family
    Family(DisplayFamily),
}

impl From<DisplayFamily> for RequestedFamily {
    fn from(family: DisplayFamily) -> Self {
        RequestedFamily::Family(family)
    }
}

impl FromStr for RequestedFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(RequestedFamily::Auto)
        } else {
            s.parse().map(RequestedFamily::Family)
        }
    }
}

impl fmt::Display for RequestedFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedFamily::Auto => f.write_str("auto"),
            RequestedFamily::Family(family) => family.fmt(f),
        }
    }
}

/// Ink set of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorMode {
    /// Black and white
    Mono,
    /// Black, white and red
    Red,
    /// Black, white and yellow
    Yellow,
    /// Seven-colour ACeP
    Multi,
}

impl ColorMode {
    /// Name used on the command line
    pub const fn name(&self) -> &'static str {
        match self {
            ColorMode::Mono => "black",
            ColorMode::Red => "red",
            ColorMode::Yellow => "yellow",
            ColorMode::Multi => "multi",
        }
    }

    /// Palette index of the darkest ink
    pub const fn black_index(&self) -> u8 {
        match self {
            ColorMode::Multi => MultiInk::Black as u8,
            _ => TriInk::Black as u8,
        }
    }

    /// Palette index of the lightest ink
    pub const fn white_index(&self) -> u8 {
        match self {
            ColorMode::Multi => MultiInk::White as u8,
            _ => TriInk::White as u8,
        }
    }

    /// Inks this mode can show, as `(palette index, name)` pairs
    pub const fn inks(&self) -> &'static [(u8, &'static str)] {
        match self {
            ColorMode::Mono => &[(0, "white"), (1, "black")],
            ColorMode::Red => &[(0, "white"), (1, "black"), (2, "red")],
            ColorMode::Yellow => &[(0, "white"), (1, "black"), (2, "yellow")],
            ColorMode::Multi => &[
                (0, "black"),
                (1, "white"),
                (2, "green"),
                (3, "blue"),
                (4, "red"),
                (5, "yellow"),
                (6, "orange"),
                (7, "clean"),
            ],
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const NAMES: [(&str, ColorMode); 5] = [
            ("black", ColorMode::Mono),
            ("mono", ColorMode::Mono),
            ("red", ColorMode::Red),
            ("yellow", ColorMode::Yellow),
            ("multi", ColorMode::Multi),
        ];
        NAMES
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, mode)| mode)
            .ok_or(ParseError::UnknownColor)
    }
}

/// Whether a family's constructor takes a colour argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRequirement {
    /// A colour from {mono, red, yellow} must be supplied
    Required,
    /// A colour from {mono, red, yellow} may be supplied; mono otherwise
    Optional,
    /// No colour may be supplied (the panel's ink set is fixed)
    Forbidden,
}

/// Palette indices on seven-colour panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MultiInk {
    /// Black
    Black = 0,
    /// White
    White = 1,
    /// Green
    Green = 2,
    /// Blue
    Blue = 3,
    /// Red
    Red = 4,
    /// Yellow
    Yellow = 5,
    /// Orange
    Orange = 6,
    /// Clean (drives the panel to its neutral state, shown as white)
    Clean = 7,
}

/// Palette indices on black/white/accent panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TriInk {
    /// White
    White = 0,
    /// Black
    Black = 1,
    /// Red or yellow, depending on the panel
    Accent = 2,
}

/// Panel controller chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum Controller {
    /// Original pHAT / wHAT controller
    IL91874,
    /// Solomon Systech SSD1608 (pHAT revision)
    SSD1608,
    /// Solomon Systech SSD1683 (wHAT revision)
    SSD1683,
    /// UltraChip UC8159 (Impression 5.7" and 4")
    UC8159,
    /// AC073TC1A (Impression 7.3")
    AC073TC1A,
}

impl Controller {
    /// Chip name
    pub const fn name(&self) -> &'static str {
        match self {
            Controller::IL91874 => "IL91874",
            Controller::SSD1608 => "SSD1608",
            Controller::SSD1683 => "SSD1683",
            Controller::UC8159 => "UC8159",
            Controller::AC073TC1A => "AC073TC1A",
        }
    }
}

/// Failure to parse a family or colour name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Not one of the family names
    UnknownFamily,
    /// Not one of the colour names
    UnknownColor,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownFamily => write!(
                f,
                "unknown display type (expected auto, phat, phatssd1608, what, whatssd1683, impressions or impressions73)"
            ),
            ParseError::UnknownColor => {
                write!(f, "unknown colour (expected black, red, yellow or multi)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolutions() {
        assert_eq!(DisplayFamily::Phat.default_resolution(), Resolution::new(212, 104));
        assert_eq!(DisplayFamily::PhatSsd1608.default_resolution(), Resolution::new(250, 122));
        assert_eq!(DisplayFamily::What.default_resolution(), Resolution::new(400, 300));
        assert_eq!(DisplayFamily::WhatSsd1683.default_resolution(), Resolution::new(400, 300));
        assert_eq!(DisplayFamily::Impressions.default_resolution(), Resolution::new(600, 448));
        assert_eq!(DisplayFamily::Impressions73.default_resolution(), Resolution::new(800, 480));
    }

    #[test]
    fn test_family_names_round_trip() {
        for family in DisplayFamily::ALL {
            assert_eq!(family.name().parse::<DisplayFamily>(), Ok(family));
        }
        assert_eq!("PHAT".parse::<DisplayFamily>(), Ok(DisplayFamily::Phat));
        assert_eq!("7colour".parse::<DisplayFamily>(), Err(ParseError::UnknownFamily));
    }

    #[test]
    fn test_requested_family_parses_auto() {
        assert_eq!("auto".parse::<RequestedFamily>(), Ok(RequestedFamily::Auto));
        assert_eq!(
            "what".parse::<RequestedFamily>(),
            Ok(RequestedFamily::Family(DisplayFamily::What))
        );
    }

    #[test]
    fn test_color_requirements() {
        assert_eq!(DisplayFamily::Phat.color_requirement(true), ColorRequirement::Required);
        assert_eq!(DisplayFamily::WhatSsd1683.color_requirement(true), ColorRequirement::Required);
        assert_eq!(DisplayFamily::Phat.color_requirement(false), ColorRequirement::Optional);
        assert_eq!(DisplayFamily::What.color_requirement(false), ColorRequirement::Optional);
        assert_eq!(DisplayFamily::Impressions.color_requirement(true), ColorRequirement::Forbidden);
        assert_eq!(DisplayFamily::Impressions73.color_requirement(false), ColorRequirement::Forbidden);
    }

    #[test]
    fn test_color_aliases() {
        assert_eq!("black".parse::<ColorMode>(), Ok(ColorMode::Mono));
        assert_eq!("mono".parse::<ColorMode>(), Ok(ColorMode::Mono));
        assert_eq!("Red".parse::<ColorMode>(), Ok(ColorMode::Red));
        assert_eq!("green".parse::<ColorMode>(), Err(ParseError::UnknownColor));
    }

    #[test]
    fn test_ink_indices_match_mode() {
        assert_eq!(ColorMode::Multi.black_index(), 0);
        assert_eq!(ColorMode::Multi.white_index(), 1);
        assert_eq!(ColorMode::Red.black_index(), 1);
        assert_eq!(ColorMode::Red.white_index(), 0);
        assert_eq!(ColorMode::Multi.inks().len(), 8);
        assert_eq!(ColorMode::Mono.inks().len(), 2);
    }
}
