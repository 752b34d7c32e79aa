//! Inky Display Simulator
//!
//! Desktop stand-in for Inky e-paper panels. Frames are rendered on a
//! dedicated thread with the panel's palette, orientation and refresh flash,
//! so application code can be developed without the hardware.
//!
//! - [`Simulator`] - threaded simulator (window or headless backend)
//! - [`SnapshotDisplay`] - synchronous fallback, optional PNG output
//! - Headless mode for CI (`headless` feature drops the window backend)
//!
//! # Example
//!
//! ```no_run
//! use inky_emulator::{EmulatorConfig, Simulator};
//! use inky_platform::DisplayDriver;
//! use inky_specs::{ColorMode, DisplayDescriptor, DisplayFamily};
//!
//! let descriptor =
//!     DisplayDescriptor::validated(DisplayFamily::What, Some(ColorMode::Red), None, false)?;
//! let (mut display, _surface) = Simulator::headless(descriptor, EmulatorConfig::default())?;
//!
//! display.set_pixel(10, 10, 2);
//! display.show(true)?;
//! display.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod config;
mod error;
mod handlers;
mod input;
pub mod palette;
mod queue;
pub mod render;
mod runtime;
mod snapshot;
mod sync;

pub use backend::{BackendFactory, HeadlessBackend, HeadlessHandle, Presentation, RenderBackend};
#[cfg(not(feature = "headless"))]
pub use backend::WindowBackend;
pub use config::EmulatorConfig;
pub use error::EmulatorError;
pub use input::ButtonEvents;
pub use palette::Palette;
pub use queue::{CompletionHandle, RenderReceipt, RenderStats};
pub use render::{compose, Frame};
pub use runtime::{Simulator, RENDER_THREAD_NAME};
pub use snapshot::SnapshotDisplay;
