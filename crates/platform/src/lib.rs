//! Driver abstractions for Inky e-paper displays
//!
//! This crate holds the pieces shared by hardware drivers and the desktop
//! simulator, so application code is identical on both targets.
//!
//! # Architecture Layers
//!
//! ```text
//! Application
//!         ↓
//! inky (factory, registry, debug adapter)
//!         ↓
//! Platform (this crate - trait abstractions)
//!         ↓
//! Hardware panel driver  |  inky-emulator
//! ```
//!
//! # Contents
//!
//! - [`DisplayDriver`] - the capability set every display offers
//! - [`IndexedImage`] - palette-indexed frame buffer, an embedded-graphics target
//! - [`Orientation`] - flips and rotation applied to outgoing frames
//! - [`Button`] / [`InputDevice`] - button input
//! - [`PlatformProbe`] - hardware-vs-simulator decision
//!
//! # Example
//!
//! ```no_run
//! use inky_platform::{DisplayDriver, DisplayError};
//!
//! fn clear<D: DisplayDriver>(display: &mut D) -> Result<(), DisplayError> {
//!     let white = display.descriptor().color_mode.white_index();
//!     for y in 0..display.height() as i32 {
//!         for x in 0..display.width() as i32 {
//!             display.set_pixel(x, y, white);
//!         }
//!     }
//!     display.show(true)
//! }
//! ```

#![deny(unused_must_use)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code

pub mod display;
mod error;
pub mod image;
pub mod input;
pub mod probe;
pub mod transform;

pub use display::{clamp_saturation, DisplayDriver, DEFAULT_SATURATION};
pub use error::DisplayError;
pub use image::{IndexedImage, PaletteIndex, PALETTE_MASK};
pub use input::{Button, ButtonHandler, InputDevice, UnknownButton};
pub use probe::{PlatformProbe, SimulationOverride, TargetMode, FORCE_SIMULATION_ENV};
pub use transform::{Orientation, Rotation};

pub use inky_specs as specs;
