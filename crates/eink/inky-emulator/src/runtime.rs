//! Threaded display simulator
//!
//! Callers draw into an intake buffer and call `show()`. The render thread
//! (`inky-render`) owns the backend, wakes at the configured frame interval,
//! draws the newest pending frame and completes its waiters. Button presses
//! read from the backend are dispatched to handlers on that same thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use inky_platform::{
    clamp_saturation, Button, ButtonHandler, DisplayDriver, DisplayError, IndexedImage,
    Orientation, DEFAULT_SATURATION, PALETTE_MASK,
};
use inky_specs::{ColorMode, DisplayDescriptor};

use crate::backend::{BackendFactory, HeadlessBackend, HeadlessHandle, RenderBackend};
use crate::config::EmulatorConfig;
use crate::error::EmulatorError;
use crate::handlers::HandlerRegistry;
use crate::input::{ButtonEvents, ButtonQueue};
use crate::palette::{Palette, BLACK_ARGB, WHITE_ARGB};
use crate::queue::{CompletionHandle, Next, RenderQueue, RenderRequest, RenderStats};
use crate::render::{compose, Frame};

/// Name of the render thread
pub const RENDER_THREAD_NAME: &str = "inky-render";

/// Simulated Inky display
pub struct Simulator {
    descriptor: DisplayDescriptor,
    config: EmulatorConfig,
    intake: IndexedImage,
    saturation: f32,
    border: u8,
    queue: Arc<RenderQueue>,
    handlers: Arc<HandlerRegistry>,
    buttons: ButtonQueue,
    backend_name: &'static str,
    thread: Option<JoinHandle<()>>,
}

impl Simulator {
    /// Start a simulator whose backend is built by `factory` on the render thread
    ///
    /// Returns once the backend exists, or with the reason it could not be
    /// created.
    pub fn spawn(
        descriptor: DisplayDescriptor,
        config: EmulatorConfig,
        factory: BackendFactory,
    ) -> Result<Self, EmulatorError> {
        let queue = Arc::new(RenderQueue::new());
        let handlers = Arc::new(HandlerRegistry::default());
        let buttons = ButtonQueue::default();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let worker_queue = queue.clone();
        let worker_handlers = handlers.clone();
        let worker_buttons = buttons.clone();
        let thread = thread::Builder::new()
            .name(RENDER_THREAD_NAME.to_string())
            .spawn(move || {
                let _stopped = StopGuard(worker_queue.clone());
                let backend = match factory(&descriptor, &config) {
                    Ok(backend) => {
                        let _ = ready_tx.send(Ok(backend.name()));
                        backend
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                RenderWorker {
                    backend,
                    queue: worker_queue,
                    handlers: worker_handlers,
                    buttons: worker_buttons,
                    orientation: config.orientation,
                    color_mode: descriptor.color_mode,
                    frame_interval: config.frame_interval(),
                    flash_hold: config.flash_hold(),
                    last_frame: None,
                }
                .run();
            })?;

        let backend_name = match ready_rx.recv() {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(EmulatorError::BackendUnavailable(
                    "render thread exited during startup".to_string(),
                ));
            }
        };

        tracing::info!(
            display = %descriptor,
            backend = backend_name,
            interval_ms = config.frame_interval_ms,
            "simulator started"
        );

        Ok(Self {
            descriptor,
            intake: IndexedImage::with_resolution(descriptor.resolution),
            config,
            saturation: DEFAULT_SATURATION,
            border: descriptor.color_mode.white_index(),
            queue,
            handlers,
            buttons,
            backend_name,
            thread: Some(thread),
        })
    }

    /// Simulator drawing into a desktop window
    #[cfg(not(feature = "headless"))]
    pub fn windowed(descriptor: DisplayDescriptor, config: EmulatorConfig) -> Result<Self, EmulatorError> {
        Self::spawn(
            descriptor,
            config,
            Box::new(|descriptor: &DisplayDescriptor, config: &EmulatorConfig| {
                let window = crate::backend::WindowBackend::open(descriptor, config)?;
                Ok(Box::new(window) as Box<dyn RenderBackend>)
            }),
        )
    }

    /// Simulator drawing into memory, plus a handle to observe it
    pub fn headless(
        descriptor: DisplayDescriptor,
        config: EmulatorConfig,
    ) -> Result<(Self, HeadlessHandle), EmulatorError> {
        let (width, height) = config
            .orientation
            .output_dimensions(descriptor.width(), descriptor.height());
        let (backend, handle) = HeadlessBackend::new(width, height);
        let simulator = Self::spawn(
            descriptor,
            config,
            Box::new(move |_: &DisplayDescriptor, _: &EmulatorConfig| {
                Ok(Box::new(backend) as Box<dyn RenderBackend>)
            }),
        )?;
        Ok((simulator, handle))
    }

    /// Queue the current buffer for rendering without waiting
    pub fn publish(&self) -> Result<CompletionHandle, DisplayError> {
        self.queue.publish(
            self.intake.clone(),
            self.saturation,
            self.border,
            self.config.completion_timeout(),
        )
    }

    /// Render counters so far
    pub fn stats(&self) -> RenderStats {
        self.queue.stats()
    }

    /// False once the render thread has exited
    pub fn is_running(&self) -> bool {
        self.queue.is_alive()
    }

    /// Button presses as a pollable stream
    pub fn button_events(&self) -> ButtonEvents {
        self.buttons.subscribe()
    }

    /// Backend in use ("window" or "headless")
    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Active configuration
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// The caller-side frame buffer
    pub fn buffer(&self) -> &IndexedImage {
        &self.intake
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("render thread panicked");
            }
        }
    }
}

impl DisplayDriver for Simulator {
    fn descriptor(&self) -> &DisplayDescriptor {
        &self.descriptor
    }

    fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
        if self.queue.is_alive() {
            Ok(())
        } else {
            Err(DisplayError::RenderThreadStopped)
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.intake.set(x, y, value);
    }

    fn set_image(&mut self, image: &IndexedImage, saturation: f32) {
        self.intake.copy_from(image);
        self.saturation = clamp_saturation(saturation);
    }

    fn set_border(&mut self, value: u8) {
        self.border = value & PALETTE_MASK;
    }

    fn show(&mut self, wait: bool) -> Result<(), DisplayError> {
        let handle = self.publish()?;
        if wait {
            let receipt = handle.wait()?;
            tracing::trace!(
                requested = receipt.requested,
                rendered = receipt.rendered,
                skipped = receipt.skipped,
                "show completed"
            );
        }
        Ok(())
    }

    fn register_button_handler(
        &mut self,
        button: Button,
        handler: ButtonHandler,
    ) -> Result<(), DisplayError> {
        self.handlers.register(button, handler);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        self.queue.request_shutdown();
        self.join();
        Ok(())
    }

    fn wait_for_close(&mut self) -> Result<(), DisplayError> {
        self.join();
        Ok(())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.queue.request_shutdown();
        self.join();
    }
}

/// Marks the queue stopped however the render thread exits
struct StopGuard(Arc<RenderQueue>);

impl Drop for StopGuard {
    fn drop(&mut self) {
        self.0.mark_stopped();
    }
}

struct RenderWorker {
    backend: Box<dyn RenderBackend>,
    queue: Arc<RenderQueue>,
    handlers: Arc<HandlerRegistry>,
    buttons: ButtonQueue,
    orientation: Orientation,
    color_mode: ColorMode,
    frame_interval: Duration,
    flash_hold: Duration,
    /// Frame currently on the surface, restored when a render fails
    last_frame: Option<Frame>,
}

impl RenderWorker {
    fn run(mut self) {
        tracing::debug!(backend = self.backend.name(), "render loop running");
        loop {
            for button in self.backend.poll_buttons() {
                self.buttons.push(button);
                self.handlers.dispatch(button);
            }
            if !self.backend.is_open() {
                tracing::info!("simulator window closed");
                break;
            }
            match self.queue.next(self.frame_interval) {
                Next::Render(pending) => {
                    let skipped = !self.render(&pending.request);
                    self.queue.complete(pending, skipped);
                }
                Next::Idle => {}
                Next::Shutdown => {
                    tracing::debug!("render loop shutting down");
                    break;
                }
            }
        }
    }

    /// Draw one request; false when the frame was skipped
    ///
    /// A skipped frame leaves the previous frame on the surface, even when
    /// the failure happened after the refresh flash.
    fn render(&mut self, request: &RenderRequest) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(|| self.draw(request))) {
            Ok(Ok(frame)) => {
                self.last_frame = Some(frame);
                return true;
            }
            Ok(Err(e)) => tracing::warn!(request = request.id, error = %e, "frame skipped"),
            Err(_) => tracing::error!(request = request.id, "render panicked, frame skipped"),
        }
        self.restore();
        false
    }

    fn draw(&mut self, request: &RenderRequest) -> Result<Frame, EmulatorError> {
        let palette = Palette::for_mode(self.color_mode, request.saturation);
        let frame = compose(&request.image, &self.orientation, &palette, request.border);

        // First frame appears directly; later ones get the refresh flash.
        if self.last_frame.is_some() {
            self.backend.fill(WHITE_ARGB)?;
            self.backend.idle(self.flash_hold);
            self.backend.fill(BLACK_ARGB)?;
            self.backend.idle(self.flash_hold);
        }
        self.backend.present(&frame)?;
        tracing::debug!(request = request.id, "frame presented");
        Ok(frame)
    }

    /// Put the last good frame back after a failed render
    fn restore(&mut self) {
        let Some(last) = &self.last_frame else {
            return;
        };
        let restored = panic::catch_unwind(AssertUnwindSafe(|| self.backend.present(last)));
        match restored {
            Ok(Ok(())) => tracing::debug!("previous frame restored"),
            Ok(Err(e)) => tracing::error!(error = %e, "could not restore previous frame"),
            Err(_) => tracing::error!("backend panicked restoring previous frame"),
        }
    }
}
