//! Physical panel boundary
//!
//! Chip-level command sequences live behind [`PanelBus`]: the library hands
//! a bus one oriented frame of palette indices and asks it to reset, write
//! and wait. [`PanelBusProvider`] opens a bus for a controller, and
//! [`IdentitySource`] reads the identity chip on the board.
//!
//! ```text
//! PanelDriver (frame buffer, orientation)
//!         ↓ write_frame / wait_idle
//! PanelBus (controller command set, SPI/GPIO)
//! ```

use inky_platform::{
    clamp_saturation, DisplayDriver, DisplayError, IndexedImage, Orientation, DEFAULT_SATURATION,
    PALETTE_MASK,
};
use inky_specs::{Controller, DisplayDescriptor, IdentityRecord};

/// Failure reported by a panel bus
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BusError(pub String);

impl From<BusError> for DisplayError {
    fn from(e: BusError) -> Self {
        DisplayError::Bus(e.0)
    }
}

/// One frame as the panel receives it, after orientation
#[derive(Debug, Clone, Copy)]
pub struct PanelFrame<'a> {
    /// Width after orientation
    pub width: u32,
    /// Height after orientation
    pub height: u32,
    /// Row-major palette indices, `width * height` long
    pub pixels: &'a [u8],
    /// Border palette index
    pub border: u8,
    /// Saturation requested by the caller (seven-colour panels dither with it)
    pub saturation: f32,
}

/// Command channel to one panel controller
pub trait PanelBus: Send {
    /// Hardware reset and controller initialisation
    fn reset(&mut self) -> Result<(), BusError>;

    /// Send a frame and start the refresh
    fn write_frame(&mut self, frame: &PanelFrame<'_>) -> Result<(), BusError>;

    /// Block until the controller reports not-busy
    fn wait_idle(&mut self) -> Result<(), BusError>;
}

/// Opens panel buses (SPI device + GPIO lines) for a controller
pub trait PanelBusProvider: Send + Sync {
    /// Open the bus for `controller` driving `descriptor`
    fn open(
        &self,
        controller: Controller,
        descriptor: &DisplayDescriptor,
    ) -> Result<Box<dyn PanelBus>, BusError>;
}

/// Reads the identity chip of an attached board
pub trait IdentitySource: Send + Sync {
    /// The stored record, or `None` when nothing answers
    ///
    /// Called once per auto-detection; implementations should not cache.
    fn read(&self) -> Option<IdentityRecord>;
}

/// Hardware display driven through a [`PanelBus`]
pub struct PanelDriver {
    descriptor: DisplayDescriptor,
    controller: Controller,
    orientation: Orientation,
    bus: Box<dyn PanelBus>,
    buffer: IndexedImage,
    saturation: f32,
    border: u8,
    ready: bool,
    closed: bool,
}

impl PanelDriver {
    /// Driver for `descriptor` over an opened bus
    pub fn new(
        descriptor: DisplayDescriptor,
        controller: Controller,
        orientation: Orientation,
        bus: Box<dyn PanelBus>,
    ) -> Self {
        Self {
            buffer: IndexedImage::with_resolution(descriptor.resolution),
            descriptor,
            controller,
            orientation,
            bus,
            saturation: DEFAULT_SATURATION,
            border: descriptor.color_mode.white_index(),
            ready: false,
            closed: false,
        }
    }

    /// Controller this driver talks to
    pub fn controller(&self) -> Controller {
        self.controller
    }
}

impl DisplayDriver for PanelDriver {
    fn descriptor(&self) -> &DisplayDescriptor {
        &self.descriptor
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
        if self.ready {
            return Ok(());
        }
        self.bus.reset()?;
        self.ready = true;
        tracing::info!(
            controller = self.controller.name(),
            display = %self.descriptor,
            "panel initialised"
        );
        Ok(())
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.buffer.set(x, y, value);
    }

    fn set_image(&mut self, image: &IndexedImage, saturation: f32) {
        self.buffer.copy_from(image);
        self.saturation = clamp_saturation(saturation);
    }

    fn set_border(&mut self, value: u8) {
        self.border = value & PALETTE_MASK;
    }

    fn show(&mut self, wait: bool) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        self.setup()?;
        let (pixels, width, height) =
            self.orientation
                .apply(self.buffer.pixels(), self.buffer.width(), self.buffer.height());
        self.bus.write_frame(&PanelFrame {
            width,
            height,
            pixels: &pixels,
            border: self.border,
            saturation: self.saturation,
        })?;
        if wait {
            self.bus.wait_idle()?;
        }
        tracing::debug!(controller = self.controller.name(), wait, "frame sent to panel");
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use inky_platform::Rotation;
    use inky_specs::{ColorMode, DisplayFamily};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Reset,
        Write { width: u32, height: u32, first: u8, border: u8 },
        WaitIdle,
    }

    #[derive(Clone, Default)]
    struct RecordingBus {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_reset: bool,
    }

    impl PanelBus for RecordingBus {
        fn reset(&mut self) -> Result<(), BusError> {
            if self.fail_reset {
                return Err(BusError("busy pin stuck high".into()));
            }
            self.calls.lock().unwrap().push(Call::Reset);
            Ok(())
        }

        fn write_frame(&mut self, frame: &PanelFrame<'_>) -> Result<(), BusError> {
            assert_eq!(frame.pixels.len(), (frame.width * frame.height) as usize);
            self.calls.lock().unwrap().push(Call::Write {
                width: frame.width,
                height: frame.height,
                first: frame.pixels[0],
                border: frame.border,
            });
            Ok(())
        }

        fn wait_idle(&mut self) -> Result<(), BusError> {
            self.calls.lock().unwrap().push(Call::WaitIdle);
            Ok(())
        }
    }

    fn phat() -> DisplayDescriptor {
        DisplayDescriptor::validated(DisplayFamily::Phat, Some(ColorMode::Red), None, true).unwrap()
    }

    #[test]
    fn test_show_resets_once_and_waits() {
        let bus = RecordingBus::default();
        let calls = bus.calls.clone();
        let mut driver = PanelDriver::new(phat(), Controller::IL91874, Orientation::IDENTITY, Box::new(bus));

        driver.set_pixel(0, 0, 2);
        driver.show(true).unwrap();
        driver.show(false).unwrap();

        let write = Call::Write { width: 212, height: 104, first: 2, border: 0 };
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Call::Reset, write.clone(), Call::WaitIdle, write]
        );
    }

    #[test]
    fn test_frames_are_oriented() {
        let bus = RecordingBus::default();
        let calls = bus.calls.clone();
        let orientation = Orientation { rotation: Rotation::Degrees90, ..Orientation::IDENTITY };
        let mut driver = PanelDriver::new(phat(), Controller::IL91874, orientation, Box::new(bus));

        driver.set_border(1);
        driver.show(false).unwrap();
        assert!(calls
            .lock()
            .unwrap()
            .contains(&Call::Write { width: 104, height: 212, first: 0, border: 1 }));
    }

    #[test]
    fn test_reset_failure_is_bus_error() {
        let bus = RecordingBus { fail_reset: true, ..RecordingBus::default() };
        let mut driver = PanelDriver::new(phat(), Controller::IL91874, Orientation::IDENTITY, Box::new(bus));
        assert!(matches!(driver.setup(), Err(DisplayError::Bus(ref m)) if m.contains("busy")));
    }

    #[test]
    fn test_show_after_close() {
        let mut driver = PanelDriver::new(
            phat(),
            Controller::IL91874,
            Orientation::IDENTITY,
            Box::new(RecordingBus::default()),
        );
        driver.close().unwrap();
        assert!(matches!(driver.show(true), Err(DisplayError::Closed)));
    }
}
