//! Behaviour every driver inherits from the shared traits

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::VecDeque;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use inky_platform::specs::{ColorMode, DisplayDescriptor, DisplayFamily};
use inky_platform::{
    Button, DisplayDriver, DisplayError, IndexedImage, InputDevice, Orientation, PaletteIndex,
    Rotation,
};

/// Keeps the buffer and counts refreshes; no buttons
struct MemoryDisplay {
    descriptor: DisplayDescriptor,
    buffer: IndexedImage,
    refreshes: u32,
}

impl MemoryDisplay {
    fn new(family: DisplayFamily, color: Option<ColorMode>) -> Self {
        let descriptor = DisplayDescriptor::validated(family, color, None, false).unwrap();
        Self {
            descriptor,
            buffer: IndexedImage::with_resolution(descriptor.resolution),
            refreshes: 0,
        }
    }
}

impl DisplayDriver for MemoryDisplay {
    fn descriptor(&self) -> &DisplayDescriptor {
        &self.descriptor
    }

    fn orientation(&self) -> Orientation {
        Orientation::IDENTITY
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.buffer.set(x, y, value);
    }

    fn set_image(&mut self, image: &IndexedImage, _saturation: f32) {
        self.buffer.copy_from(image);
    }

    fn set_border(&mut self, _value: u8) {}

    fn show(&mut self, _wait: bool) -> Result<(), DisplayError> {
        self.refreshes += 1;
        Ok(())
    }
}

/// Replays a fixed sequence of presses
struct ScriptedButtons(VecDeque<Button>);

impl InputDevice for ScriptedButtons {
    async fn wait_for_event(&mut self) -> Button {
        loop {
            if let Some(button) = self.0.pop_front() {
                return button;
            }
            tokio::task::yield_now().await;
        }
    }

    fn poll_event(&mut self) -> Option<Button> {
        self.0.pop_front()
    }
}

#[test]
fn boxed_driver_uses_trait_defaults() {
    let mut display: Box<dyn DisplayDriver> =
        Box::new(MemoryDisplay::new(DisplayFamily::Phat, Some(ColorMode::Red)));
    assert_eq!((display.width(), display.height()), (212, 104));

    let err = display
        .register_button_handler(Button::A, Box::new(|_| {}))
        .unwrap_err();
    assert!(matches!(err, DisplayError::Unsupported(_)));

    display.set_pixel(-1, 0, 1);
    display.set_pixel(212, 0, 1);
    display.show(true).unwrap();
    display.wait_for_close().unwrap();
    display.close().unwrap();
}

#[test]
fn drawn_image_reaches_driver_buffer() {
    let mut display = MemoryDisplay::new(DisplayFamily::What, Some(ColorMode::Yellow));
    let mut image = IndexedImage::new(400, 300);
    Rectangle::new(Point::new(10, 10), Size::new(20, 5))
        .into_styled(PrimitiveStyle::with_fill(PaletteIndex::new(2)))
        .draw(&mut image)
        .unwrap();

    display.set_image(&image, 0.5);
    display.show(true).unwrap();

    assert_eq!(display.buffer.get(10, 10), Some(2));
    assert_eq!(display.buffer.get(29, 14), Some(2));
    assert_eq!(display.buffer.get(30, 14), Some(0));
    assert_eq!(display.refreshes, 1);
}

#[test]
fn rotated_frame_swaps_dimensions() {
    let mut image = IndexedImage::new(212, 104);
    image.set(0, 0, 1);
    let orientation = Orientation {
        rotation: Rotation::Degrees90,
        ..Orientation::IDENTITY
    };
    let (pixels, width, height) = orientation.apply(image.pixels(), image.width(), image.height());
    assert_eq!((width, height), (104, 212));
    // Counter-clockwise: the top-left corner lands bottom-left.
    assert_eq!(pixels[211 * 104], 1);
    assert_eq!(pixels.iter().filter(|&&p| p == 1).count(), 1);
}

#[tokio::test]
async fn input_device_yields_presses_in_order() {
    let mut buttons = ScriptedButtons(VecDeque::from([Button::B, Button::D]));
    assert_eq!(buttons.wait_for_event().await, Button::B);
    assert_eq!(buttons.poll_event(), Some(Button::D));
    assert_eq!(buttons.poll_event(), None);
}
