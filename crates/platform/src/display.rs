//! Display abstraction layer

use inky_specs::DisplayDescriptor;

use crate::error::DisplayError;
use crate::image::IndexedImage;
use crate::input::{Button, ButtonHandler};
use crate::transform::Orientation;

/// Saturation used when the caller does not pick one
pub const DEFAULT_SATURATION: f32 = 0.5;

/// Common interface of hardware panels and simulators
///
/// Callers draw into the driver's frame buffer with [`set_pixel`] or
/// [`set_image`], then push the frame to the panel with [`show`]. The trait
/// is object safe; the factory hands out `Box<dyn DisplayDriver>`.
///
/// [`set_pixel`]: DisplayDriver::set_pixel
/// [`set_image`]: DisplayDriver::set_image
/// [`show`]: DisplayDriver::show
pub trait DisplayDriver: Send {
    /// What this driver drives
    fn descriptor(&self) -> &DisplayDescriptor;

    /// Orientation applied to outgoing frames
    fn orientation(&self) -> Orientation;

    /// Prepare the panel (reset, power-up); idempotent
    fn setup(&mut self) -> Result<(), DisplayError>;

    /// Write one palette index; masked to `0..=7`, ignored outside the panel
    fn set_pixel(&mut self, x: i32, y: i32, value: u8);

    /// Replace the whole frame buffer
    ///
    /// Images of a different size are rescaled to the panel resolution.
    /// `saturation` (0.0–1.0) selects how vivid seven-colour inks appear.
    fn set_image(&mut self, image: &IndexedImage, saturation: f32);

    /// Palette index used for the border around the active area
    fn set_border(&mut self, value: u8);

    /// Push the current frame buffer to the panel
    ///
    /// With `wait` the call returns once the frame (or a later one that
    /// superseded it) is on the panel.
    fn show(&mut self, wait: bool) -> Result<(), DisplayError>;

    /// Call `handler` whenever `button` is pressed
    fn register_button_handler(
        &mut self,
        button: Button,
        handler: ButtonHandler,
    ) -> Result<(), DisplayError> {
        let _ = (button, handler);
        Err(DisplayError::Unsupported("button input"))
    }

    /// Stop background work and release the panel
    fn close(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Block until the user closes the display window
    ///
    /// Returns immediately on displays without a window.
    fn wait_for_close(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Panel width in pixels
    fn width(&self) -> u32 {
        self.descriptor().width()
    }

    /// Panel height in pixels
    fn height(&self) -> u32 {
        self.descriptor().height()
    }
}

impl<T: DisplayDriver + ?Sized> DisplayDriver for Box<T> {
    fn descriptor(&self) -> &DisplayDescriptor {
        (**self).descriptor()
    }

    fn orientation(&self) -> Orientation {
        (**self).orientation()
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
        (**self).setup()
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        (**self).set_pixel(x, y, value);
    }

    fn set_image(&mut self, image: &IndexedImage, saturation: f32) {
        (**self).set_image(image, saturation);
    }

    fn set_border(&mut self, value: u8) {
        (**self).set_border(value);
    }

    fn show(&mut self, wait: bool) -> Result<(), DisplayError> {
        (**self).show(wait)
    }

    fn register_button_handler(
        &mut self,
        button: Button,
        handler: ButtonHandler,
    ) -> Result<(), DisplayError> {
        (**self).register_button_handler(button, handler)
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        (**self).close()
    }

    fn wait_for_close(&mut self) -> Result<(), DisplayError> {
        (**self).wait_for_close()
    }
}

/// Clamp a caller-supplied saturation into `0.0..=1.0`
///
/// NaN falls back to [`DEFAULT_SATURATION`].
pub fn clamp_saturation(saturation: f32) -> f32 {
    if saturation.is_nan() {
        DEFAULT_SATURATION
    } else {
        saturation.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_saturation() {
        assert_eq!(clamp_saturation(0.25), 0.25);
        assert_eq!(clamp_saturation(-1.0), 0.0);
        assert_eq!(clamp_saturation(3.0), 1.0);
        assert_eq!(clamp_saturation(f32::NAN), DEFAULT_SATURATION);
    }
}
