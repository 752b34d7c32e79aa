//! Synchronous snapshot display
//!
//! Same contract as the simulator without a thread or window: `show()`
//! composes the frame on the caller's thread, keeps it, and optionally writes
//! it to a PNG file. Used when no window can be opened.

use std::path::{Path, PathBuf};

use inky_platform::{
    clamp_saturation, DisplayDriver, DisplayError, IndexedImage, Orientation, DEFAULT_SATURATION,
    PALETTE_MASK,
};
use inky_specs::DisplayDescriptor;

use crate::palette::Palette;
use crate::render::{compose, Frame};

/// Display that renders to memory and, optionally, to a PNG file
pub struct SnapshotDisplay {
    descriptor: DisplayDescriptor,
    orientation: Orientation,
    buffer: IndexedImage,
    saturation: f32,
    border: u8,
    output: Option<PathBuf>,
    last_frame: Option<Frame>,
    shown: u64,
    closed: bool,
}

impl SnapshotDisplay {
    /// Snapshot display for `descriptor`
    pub fn new(descriptor: DisplayDescriptor, orientation: Orientation) -> Self {
        Self {
            descriptor,
            orientation,
            buffer: IndexedImage::with_resolution(descriptor.resolution),
            saturation: DEFAULT_SATURATION,
            border: descriptor.color_mode.white_index(),
            output: None,
            last_frame: None,
            shown: 0,
            closed: false,
        }
    }

    /// Write every shown frame to `path` (overwritten on each `show()`)
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Where frames are written, if anywhere
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The most recently shown frame
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Number of successful `show()` calls
    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl DisplayDriver for SnapshotDisplay {
    fn descriptor(&self) -> &DisplayDescriptor {
        &self.descriptor
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
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

    fn show(&mut self, _wait: bool) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        let palette = Palette::for_mode(self.descriptor.color_mode, self.saturation);
        let frame = compose(&self.buffer, &self.orientation, &palette, self.border);
        if let Some(path) = &self.output {
            frame
                .save(path)
                .map_err(|e| DisplayError::Snapshot(e.to_string()))?;
            tracing::info!(path = %path.display(), "snapshot written");
        }
        self.last_frame = Some(frame);
        self.shown += 1;
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
    use inky_platform::Button;
    use inky_specs::{ColorMode, DisplayFamily};

    fn what_red() -> DisplayDescriptor {
        DisplayDescriptor::validated(DisplayFamily::What, Some(ColorMode::Red), None, false).unwrap()
    }

    #[test]
    fn test_show_keeps_last_frame() {
        let mut display = SnapshotDisplay::new(what_red(), Orientation::IDENTITY);
        display.set_pixel(0, 0, 2);
        display.show(true).unwrap();
        let frame = display.last_frame().unwrap();
        assert_eq!((frame.width, frame.height), (400, 300));
        assert_eq!(frame.pixel(0, 0), Some(0xFFFF_0000));
        assert_eq!(frame.pixel(1, 0), Some(0xFFFF_FFFF));
        assert_eq!(display.frames_shown(), 1);
    }

    #[test]
    fn test_png_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut display =
            SnapshotDisplay::new(what_red(), Orientation::IDENTITY).with_output(&path);
        display.show(false).unwrap();
        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (400, 300));
    }

    #[test]
    fn test_buttons_unsupported() {
        let mut display = SnapshotDisplay::new(what_red(), Orientation::IDENTITY);
        let err = display
            .register_button_handler(Button::A, Box::new(|_| {}))
            .unwrap_err();
        assert!(matches!(err, DisplayError::Unsupported(_)));
    }

    #[test]
    fn test_show_after_close() {
        let mut display = SnapshotDisplay::new(what_red(), Orientation::IDENTITY);
        display.close().unwrap();
        assert!(matches!(display.show(true), Err(DisplayError::Closed)));
    }
}
