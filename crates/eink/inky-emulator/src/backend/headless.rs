//! In-memory backend for CI and tests
//!
//! Keeps the visible surface in memory and records every presentation, so
//! tests can check what a viewer would have seen. A [`HeadlessHandle`] can
//! inject button presses and close the "window".

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use inky_platform::Button;

use super::RenderBackend;
use crate::error::EmulatorError;
use crate::render::Frame;
use crate::sync::lock;

/// One thing shown on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// A solid fill (refresh flash)
    Fill(u32),
    /// A composed frame
    Frame,
}

#[derive(Debug)]
struct Surface {
    width: u32,
    height: u32,
    visible: Option<Frame>,
    log: Vec<Presentation>,
    buttons: VecDeque<Button>,
    open: bool,
}

/// Backend half, moved onto the render thread
pub struct HeadlessBackend {
    surface: Arc<Mutex<Surface>>,
}

/// Observer half, kept by the test
#[derive(Clone)]
pub struct HeadlessHandle {
    surface: Arc<Mutex<Surface>>,
}

impl HeadlessBackend {
    /// Linked (backend, handle) pair for a `width` × `height` surface
    pub fn new(width: u32, height: u32) -> (Self, HeadlessHandle) {
        let surface = Arc::new(Mutex::new(Surface {
            width,
            height,
            visible: None,
            log: Vec::new(),
            buttons: VecDeque::new(),
            open: true,
        }));
        (
            HeadlessBackend {
                surface: surface.clone(),
            },
            HeadlessHandle { surface },
        )
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn present(&mut self, frame: &Frame) -> Result<(), EmulatorError> {
        let mut surface = lock(&self.surface);
        surface.visible = Some(frame.clone());
        surface.log.push(Presentation::Frame);
        Ok(())
    }

    fn fill(&mut self, argb: u32) -> Result<(), EmulatorError> {
        let mut surface = lock(&self.surface);
        let (w, h) = (surface.width, surface.height);
        surface.visible = Some(Frame::solid(w, h, argb));
        surface.log.push(Presentation::Fill(argb));
        Ok(())
    }

    fn poll_buttons(&mut self) -> Vec<Button> {
        lock(&self.surface).buttons.drain(..).collect()
    }

    fn is_open(&self) -> bool {
        lock(&self.surface).open
    }
}

impl HeadlessHandle {
    /// What is on the surface now
    pub fn visible(&self) -> Option<Frame> {
        lock(&self.surface).visible.clone()
    }

    /// Everything shown so far, oldest first
    pub fn presentations(&self) -> Vec<Presentation> {
        lock(&self.surface).log.clone()
    }

    /// Number of composed frames shown
    pub fn frames_presented(&self) -> usize {
        lock(&self.surface)
            .log
            .iter()
            .filter(|p| matches!(p, Presentation::Frame))
            .count()
    }

    /// Simulate a key press
    pub fn press(&self, button: Button) {
        lock(&self.surface).buttons.push_back(button);
    }

    /// Simulate the user closing the window
    pub fn close_window(&self) {
        lock(&self.surface).open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_uses_surface_size() {
        let (mut backend, handle) = HeadlessBackend::new(4, 3);
        assert!(backend.fill(0xFFFF_FFFF).is_ok());
        let visible = handle.visible();
        assert!(matches!(visible, Some(ref f) if f.width == 4 && f.height == 3 && f.is_solid(0xFFFF_FFFF)));
        assert_eq!(handle.presentations(), vec![Presentation::Fill(0xFFFF_FFFF)]);
        assert_eq!(handle.frames_presented(), 0);
    }

    #[test]
    fn test_buttons_drain_once() {
        let (mut backend, handle) = HeadlessBackend::new(1, 1);
        handle.press(Button::A);
        handle.press(Button::C);
        assert_eq!(backend.poll_buttons(), vec![Button::A, Button::C]);
        assert!(backend.poll_buttons().is_empty());
    }

    #[test]
    fn test_close_window() {
        let (backend, handle) = HeadlessBackend::new(1, 1);
        assert!(backend.is_open());
        handle.close_window();
        assert!(!backend.is_open());
    }
}
