//! Inky e-paper panel catalogue
//!
//! Static knowledge about the Inky board family: which panels exist, their
//! resolutions, controllers and ink sets, which construction arguments they
//! accept, and how an identity-chip record maps to a panel.
//!
//! # Features
//!
//! - **no_std compatible** - shared by hardware and simulator builds
//! - **Serde support** - optional serialization for JSON configs
//!
//! # Example
//!
//! ```
//! use inky_specs::{decode, ColorMode, DisplayFamily, IdentityRecord, Resolution};
//!
//! let record = IdentityRecord::new(17, Some(ColorMode::Yellow));
//! let desc = decode(Some(&record)).unwrap();
//! assert_eq!(desc.family, DisplayFamily::WhatSsd1683);
//! assert_eq!(desc.resolution, Resolution::new(400, 300));
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod descriptor;
mod family;
pub mod identity;

pub use descriptor::{validate_color, ConfigurationError, DisplayDescriptor};
pub use family::{
    ColorMode, ColorRequirement, Controller, DisplayFamily, MultiInk, ParseError,
    RequestedFamily, Resolution, TriInk,
};
pub use identity::{decode, variant_name, IdentityRecord};
