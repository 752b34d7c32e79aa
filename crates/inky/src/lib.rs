//! Inky e-paper displays, on hardware or simulated
//!
//! One API drives a physical Inky panel on a Raspberry Pi or a desktop
//! simulator elsewhere; callers hold a `Box<dyn DisplayDriver>` and never
//! need to know which one they got.
//!
//! # Architecture
//!
//! ```text
//! Application
//!         ↓
//! DisplayFactory (probe, identity chip, registry, fallbacks)
//!         ↓
//! PanelDriver → PanelBus   |   Simulator / SnapshotDisplay
//! ```
//!
//! # Features
//!
//! - `headless` - no window backend; simulators render to memory (CI)
//!
//! # Example
//!
//! ```no_run
//! use inky::{DisplayFactory, DisplayRequest, DisplayDriver};
//! use inky::specs::{ColorMode, DisplayFamily};
//!
//! let factory = DisplayFactory::new();
//! let mut display = factory.create(
//!     &DisplayRequest::family(DisplayFamily::What).color(ColorMode::Red),
//! )?;
//!
//! let black = display.descriptor().color_mode.black_index();
//! for x in 0..display.width() as i32 {
//!     display.set_pixel(x, 10, black);
//! }
//! display.show(true)?;
//! # Ok::<(), inky::Error>(())
//! ```

pub mod debug;
mod error;
pub mod factory;
pub mod hardware;
pub mod registry;

pub use debug::DebugAdapter;
pub use error::{Error, Result};
pub use factory::{DisplayFactory, DisplayRequest, SimulatorBackend};
pub use hardware::{BusError, IdentitySource, PanelBus, PanelBusProvider, PanelDriver, PanelFrame};

pub use inky_emulator::{EmulatorConfig, Simulator, SnapshotDisplay};
pub use inky_platform::{
    Button, ButtonHandler, DisplayDriver, DisplayError, IndexedImage, InputDevice, Orientation,
    PaletteIndex, PlatformProbe, Rotation, SimulationOverride, TargetMode,
};

pub use inky_emulator as emulator;
pub use inky_platform as platform;
pub use inky_specs as specs;
