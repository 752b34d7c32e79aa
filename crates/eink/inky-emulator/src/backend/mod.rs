//! Rendering backends
//!
//! The render thread owns exactly one backend and is the only code that
//! touches the visible surface. Backends are built on the render thread
//! itself, because window systems tie a window to the thread that created it.

use std::time::Duration;

use inky_platform::Button;
use inky_specs::DisplayDescriptor;

use crate::config::EmulatorConfig;
use crate::error::EmulatorError;
use crate::render::Frame;

pub mod headless;
#[cfg(not(feature = "headless"))]
pub mod window;

pub use headless::{HeadlessBackend, HeadlessHandle, Presentation};
#[cfg(not(feature = "headless"))]
pub use window::WindowBackend;

/// Visible surface of a simulator
pub trait RenderBackend {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Show a composed frame
    fn present(&mut self, frame: &Frame) -> Result<(), EmulatorError>;

    /// Show one colour across the whole surface (refresh flashes)
    fn fill(&mut self, argb: u32) -> Result<(), EmulatorError>;

    /// Wait while keeping the surface responsive
    fn idle(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Buttons pressed since the last call
    fn poll_buttons(&mut self) -> Vec<Button> {
        Vec::new()
    }

    /// False once the user has closed the surface
    fn is_open(&self) -> bool {
        true
    }
}

/// Builds a backend on the render thread
pub type BackendFactory = Box<
    dyn FnOnce(&DisplayDescriptor, &EmulatorConfig) -> Result<Box<dyn RenderBackend>, EmulatorError>
        + Send,
>;
