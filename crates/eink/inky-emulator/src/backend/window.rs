//! Desktop window backend
//!
//! Based on softbuffer pattern: https://github.com/rust-windowing/softbuffer
//! Follows "isolate the madness" principle - all platform-specific code here.
//!
//! The window lives on the render thread, so the event loop is created with
//! `with_any_thread` on Linux and Windows. macOS only allows windows on the
//! main thread; there the backend reports itself unavailable and the factory
//! falls back to snapshots.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use inky_platform::Button;
use inky_specs::DisplayDescriptor;
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use super::RenderBackend;
use crate::config::EmulatorConfig;
use crate::error::EmulatorError;
use crate::render::Frame;

type WindowSurface = Surface<Arc<WinitWindow>, Arc<WinitWindow>>;

/// Event pump granularity while idling (~60 Hz keeps the title bar draggable)
const PUMP_SLICE: Duration = Duration::from_millis(16);

/// Attempts at pumping the loop until the window exists
const CREATE_ATTEMPTS: u32 = 20;

/// Map a physical key to a board button
///
/// Returns `None` for keys that have no mapping (they are silently ignored).
pub(crate) fn map_key(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::KeyA => Some(Button::A),
        KeyCode::KeyB => Some(Button::B),
        KeyCode::KeyC => Some(Button::C),
        KeyCode::KeyD => Some(Button::D),
        _ => None,
    }
}

/// Internal handler for the event loop
#[derive(Default)]
struct WindowEvents {
    buttons: Vec<Button>,
    close_requested: bool,
}

impl ApplicationHandler for WindowEvents {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Window is already created before the loop is pumped
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(button) = map_key(code) {
                        self.buttons.push(button);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Creates the window in `resumed()` during the first pumps of the loop
struct WindowCreator {
    attributes: Option<WindowAttributes>,
    created: Option<Result<(Arc<WinitWindow>, WindowSurface), String>>,
}

impl ApplicationHandler for WindowCreator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attributes) = self.attributes.take() else {
            return;
        };
        let created = event_loop
            .create_window(attributes)
            .map_err(|e| format!("failed to create window: {e}"))
            .and_then(|window| {
                let window = Arc::new(window);
                let context = Context::new(window.clone())
                    .map_err(|e| format!("failed to create context: {e}"))?;
                let surface = Surface::new(&context, window.clone())
                    .map_err(|e| format!("failed to create surface: {e}"))?;
                Ok((window, surface))
            });
        self.created = Some(created);
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// A winit window showing the simulated panel
pub struct WindowBackend {
    event_loop: EventLoop<()>,
    window: Arc<WinitWindow>,
    surface: WindowSurface,
    events: WindowEvents,
    frame_width: u32,
    frame_height: u32,
    scale: u32,
    margin: u32,
}

impl WindowBackend {
    /// Open a window sized for the descriptor after orientation and scaling
    pub fn open(descriptor: &DisplayDescriptor, config: &EmulatorConfig) -> Result<Self, EmulatorError> {
        let mut event_loop = build_event_loop()?;

        let (frame_width, frame_height) = config
            .orientation
            .output_dimensions(descriptor.width(), descriptor.height());
        let scale = config.scale.max(1);
        let margin = config.border_width;
        let (surface_w, surface_h) = surface_size(frame_width, frame_height, margin, scale);

        let attributes = WindowAttributes::default()
            .with_title(format!(
                "Inky Simulator - {}x{} - {}",
                descriptor.width(),
                descriptor.height(),
                descriptor.color_mode
            ))
            .with_inner_size(winit::dpi::PhysicalSize::new(surface_w, surface_h))
            .with_resizable(false);

        let mut creator = WindowCreator {
            attributes: Some(attributes),
            created: None,
        };
        for _ in 0..CREATE_ATTEMPTS {
            let _ = event_loop.pump_app_events(Some(Duration::from_millis(5)), &mut creator);
            if creator.created.is_some() {
                break;
            }
        }
        let (window, mut surface) = match creator.created {
            Some(Ok(created)) => created,
            Some(Err(reason)) => return Err(EmulatorError::BackendUnavailable(reason)),
            None => {
                return Err(EmulatorError::BackendUnavailable(
                    "event loop never resumed".to_string(),
                ))
            }
        };

        // Resize surface once during initialization (never resize again)
        let (Some(w), Some(h)) = (NonZeroU32::new(surface_w), NonZeroU32::new(surface_h)) else {
            return Err(EmulatorError::BackendUnavailable(format!(
                "zero-sized surface {surface_w}x{surface_h}"
            )));
        };
        surface
            .resize(w, h)
            .map_err(|e| EmulatorError::BackendUnavailable(e.to_string()))?;

        tracing::info!(
            width = surface_w,
            height = surface_h,
            scale,
            "simulator window opened"
        );

        Ok(Self {
            event_loop,
            window,
            surface,
            events: WindowEvents::default(),
            frame_width,
            frame_height,
            scale,
            margin,
        })
    }

    fn pump(&mut self, timeout: Duration) {
        let status = self
            .event_loop
            .pump_app_events(Some(timeout), &mut self.events);
        if let PumpStatus::Exit(_) = status {
            self.events.close_requested = true;
        }
    }

    fn surface_width(&self) -> usize {
        let (width, _) = surface_size(self.frame_width, self.frame_height, self.margin, self.scale);
        width as usize
    }

    fn write_buffer(&mut self, draw: impl FnOnce(&mut [u32], usize)) -> Result<(), EmulatorError> {
        let stride = self.surface_width();
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| EmulatorError::Present(e.to_string()))?;
        draw(&mut *buffer, stride);
        buffer
            .present()
            .map_err(|e| EmulatorError::Present(e.to_string()))?;
        self.window.request_redraw();
        Ok(())
    }
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
fn build_event_loop() -> Result<EventLoop<()>, EmulatorError> {
    let mut builder = EventLoop::builder();
    #[cfg(target_os = "linux")]
    {
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }
    #[cfg(target_os = "windows")]
    winit::platform::windows::EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);
    builder
        .build()
        .map_err(|e| EmulatorError::BackendUnavailable(e.to_string()))
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn build_event_loop() -> Result<EventLoop<()>, EmulatorError> {
    Err(EmulatorError::BackendUnavailable(
        "windows can only be opened from the main thread on this platform".to_string(),
    ))
}

/// Window size for a frame plus its border margin, scaled
fn surface_size(frame_width: u32, frame_height: u32, margin: u32, scale: u32) -> (u32, u32) {
    let grow = |side: u32| {
        side.saturating_add(margin.saturating_mul(2))
            .saturating_mul(scale)
    };
    (grow(frame_width), grow(frame_height))
}

/// Strip alpha; softbuffer expects 0RGB
const fn zero_rgb(argb: u32) -> u32 {
    argb & 0x00FF_FFFF
}

impl RenderBackend for WindowBackend {
    fn name(&self) -> &'static str {
        "window"
    }

    fn present(&mut self, frame: &Frame) -> Result<(), EmulatorError> {
        let scale = self.scale as usize;
        let offset = (self.margin as usize) * scale;
        let fw = (frame.width as usize).min(self.frame_width as usize);
        let fh = (frame.height as usize).min(self.frame_height as usize);
        self.write_buffer(|buffer, stride| {
            buffer.fill(zero_rgb(frame.border));
            for (y, row) in frame.pixels.chunks_exact((frame.width as usize).max(1)).take(fh).enumerate() {
                for (x, &pixel) in row.iter().take(fw).enumerate() {
                    let color = zero_rgb(pixel);
                    // Write scale×scale block
                    for dy in 0..scale {
                        let start = (offset + y * scale + dy) * stride + offset + x * scale;
                        if let Some(span) = buffer.get_mut(start..start + scale) {
                            span.fill(color);
                        }
                    }
                }
            }
        })
    }

    fn fill(&mut self, argb: u32) -> Result<(), EmulatorError> {
        self.write_buffer(|buffer, _| buffer.fill(zero_rgb(argb)))
    }

    /// Sleep while keeping the window responsive via OS event pumping
    fn idle(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.events.close_requested {
                break;
            }
            self.pump(remaining.min(PUMP_SLICE));
        }
    }

    fn poll_buttons(&mut self) -> Vec<Button> {
        self.pump(Duration::ZERO);
        std::mem::take(&mut self.events.buttons)
    }

    fn is_open(&self) -> bool {
        !self.events.close_requested
    }
}
