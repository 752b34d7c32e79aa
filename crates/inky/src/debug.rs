//! Development aids for any display
//!
//! [`DebugAdapter`] wraps a driver and forwards every call, adding:
//!
//! - refresh timing (last / average / fastest / slowest / count), switchable
//! - optional grid and coordinate overlays on images passed to `set_image`
//! - a colour test pattern
//! - fast mode, which never waits for the panel to finish refreshing
//!
//! # Example
//!
//! ```no_run
//! use inky::debug::DebugAdapter;
//! use inky::{DisplayFactory, DisplayRequest};
//!
//! let display = DisplayFactory::new().create(&DisplayRequest::auto())?;
//! let mut debug = DebugAdapter::new(display);
//! debug.toggle_grid();
//! debug.draw_test_pattern()?;
//! println!("{}", debug.report());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Panel dimensions fit comfortably in i32; coordinates are non-negative.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use core::fmt;
use std::time::{Duration, Instant};

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use inky_platform::{
    Button, ButtonHandler, DisplayDriver, DisplayError, IndexedImage, Orientation, PaletteIndex,
    DEFAULT_SATURATION,
};
use inky_specs::DisplayDescriptor;

/// Default distance between grid lines, in pixels
pub const GRID_SPACING: u32 = 50;

/// Default distance between coordinate labels, in pixels
pub const LABEL_SPACING: u32 = 100;

/// Refresh time statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTimings {
    last: Option<Duration>,
    fastest: Option<Duration>,
    slowest: Option<Duration>,
    total: Duration,
    count: u32,
}

impl RefreshTimings {
    /// Add one measured refresh
    pub fn record(&mut self, elapsed: Duration) {
        self.last = Some(elapsed);
        self.fastest = Some(self.fastest.map_or(elapsed, |d| d.min(elapsed)));
        self.slowest = Some(self.slowest.map_or(elapsed, |d| d.max(elapsed)));
        self.total += elapsed;
        self.count += 1;
    }

    /// Most recent refresh
    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    /// Mean over all refreshes
    pub fn average(&self) -> Option<Duration> {
        (self.count > 0).then(|| self.total / self.count)
    }

    /// Quickest refresh
    pub fn fastest(&self) -> Option<Duration> {
        self.fastest
    }

    /// Slowest refresh
    pub fn slowest(&self) -> Option<Duration> {
        self.slowest
    }

    /// Number of refreshes measured
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Debugging decorator around a display driver
pub struct DebugAdapter<D> {
    inner: D,
    grid: bool,
    coordinates: bool,
    grid_spacing: u32,
    label_spacing: u32,
    fast_mode: bool,
    timing: bool,
    timings: RefreshTimings,
}

impl<D: DisplayDriver> DebugAdapter<D> {
    /// Wrap `inner`; overlays and fast mode start disabled, timing enabled
    pub fn new(inner: D) -> Self {
        tracing::info!(display = %inner.descriptor(), "debugger attached");
        Self {
            inner,
            grid: false,
            coordinates: false,
            grid_spacing: GRID_SPACING,
            label_spacing: LABEL_SPACING,
            fast_mode: false,
            timing: true,
            timings: RefreshTimings::default(),
        }
    }

    /// Toggle the grid overlay; returns the new state
    pub fn toggle_grid(&mut self) -> bool {
        self.grid = !self.grid;
        tracing::info!(enabled = self.grid, "grid overlay");
        self.grid
    }

    /// Toggle the coordinate labels; returns the new state
    pub fn toggle_coordinates(&mut self) -> bool {
        self.coordinates = !self.coordinates;
        tracing::info!(enabled = self.coordinates, "coordinate labels");
        self.coordinates
    }

    /// Toggle refresh timing; returns the new state
    ///
    /// Statistics gathered so far are kept while timing is off.
    pub fn toggle_timing(&mut self) -> bool {
        self.timing = !self.timing;
        tracing::info!(enabled = self.timing, "refresh timing");
        self.timing
    }

    /// Change grid and label spacing (zero keeps the current value)
    pub fn set_spacing(&mut self, grid: u32, labels: u32) {
        if grid > 0 {
            self.grid_spacing = grid;
        }
        if labels > 0 {
            self.label_spacing = labels;
        }
    }

    /// Stop waiting for refreshes to finish
    ///
    /// For development only; on real panels back-to-back refreshes without
    /// waiting can leave ghosting.
    pub fn enable_fast_mode(&mut self) {
        if self.fast_mode {
            tracing::info!("fast mode already enabled");
            return;
        }
        self.fast_mode = true;
        tracing::warn!("fast mode enabled, refresh waits are skipped");
    }

    /// Wait for refreshes again
    pub fn disable_fast_mode(&mut self) {
        if self.fast_mode {
            self.fast_mode = false;
            tracing::info!("fast mode disabled");
        }
    }

    /// True while fast mode is on
    pub fn is_fast_mode(&self) -> bool {
        self.fast_mode
    }

    /// Refresh statistics so far
    pub fn timings(&self) -> &RefreshTimings {
        &self.timings
    }

    /// The wrapped driver
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The wrapped driver, mutably
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    /// Unwrap the driver
    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Show a band of every ink the panel has, labelled with its name
    pub fn draw_test_pattern(&mut self) -> Result<(), DisplayError> {
        tracing::info!("drawing test pattern");
        let pattern = test_pattern(self.inner.descriptor());
        self.set_image(&pattern, DEFAULT_SATURATION);
        self.show(true)
    }

    /// Human-readable summary of the display and its timings
    pub fn report(&self) -> DebugReport<'_, D> {
        DebugReport { adapter: self }
    }

    fn overlay(&self, image: &IndexedImage) -> IndexedImage {
        let descriptor = self.inner.descriptor();
        let mut canvas = IndexedImage::with_resolution(descriptor.resolution);
        canvas.copy_from(image);
        let ink = PaletteIndex::new(descriptor.color_mode.black_index());
        if self.grid {
            draw_grid(&mut canvas, self.grid_spacing, ink);
        }
        if self.coordinates {
            draw_coordinates(&mut canvas, self.label_spacing, ink);
        }
        canvas
    }
}

impl<D: DisplayDriver> DisplayDriver for DebugAdapter<D> {
    fn descriptor(&self) -> &DisplayDescriptor {
        self.inner.descriptor()
    }

    fn orientation(&self) -> Orientation {
        self.inner.orientation()
    }

    fn setup(&mut self) -> Result<(), DisplayError> {
        self.inner.setup()
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.inner.set_pixel(x, y, value);
    }

    fn set_image(&mut self, image: &IndexedImage, saturation: f32) {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            saturation,
            "setting image"
        );
        if self.grid || self.coordinates {
            let decorated = self.overlay(image);
            self.inner.set_image(&decorated, saturation);
        } else {
            self.inner.set_image(image, saturation);
        }
    }

    fn set_border(&mut self, value: u8) {
        self.inner.set_border(value);
    }

    fn show(&mut self, wait: bool) -> Result<(), DisplayError> {
        let wait = wait && !self.fast_mode;
        tracing::info!(wait, "display update requested");
        if !self.timing {
            return self.inner.show(wait);
        }
        let started = Instant::now();
        self.inner.show(wait)?;
        let elapsed = started.elapsed();
        self.timings.record(elapsed);
        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            average_ms = self.timings.average().unwrap_or_default().as_millis() as u64,
            "display updated"
        );
        Ok(())
    }

    fn register_button_handler(
        &mut self,
        button: Button,
        handler: ButtonHandler,
    ) -> Result<(), DisplayError> {
        self.inner.register_button_handler(button, handler)
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        self.inner.close()
    }

    fn wait_for_close(&mut self) -> Result<(), DisplayError> {
        self.inner.wait_for_close()
    }
}

/// Printable summary returned by [`DebugAdapter::report`]
pub struct DebugReport<'a, D> {
    adapter: &'a DebugAdapter<D>,
}

impl<D: DisplayDriver> fmt::Display for DebugReport<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adapter = self.adapter;
        let descriptor = adapter.inner.descriptor();
        let orientation = adapter.inner.orientation();
        let on_off = |enabled: bool| if enabled { "enabled" } else { "disabled" };

        writeln!(f, "=== INKY DISPLAY INFORMATION ===")?;
        writeln!(f, "Display type: {}", descriptor.family)?;
        writeln!(f, "Resolution:   {} x {}", descriptor.width(), descriptor.height())?;
        writeln!(f, "Colour mode:  {}", descriptor.color_mode)?;
        writeln!(
            f,
            "Platform:     {}",
            if descriptor.is_hardware { "hardware" } else { "simulator" }
        )?;
        writeln!(f, "Rotation:     {}", orientation.rotation.degrees())?;
        writeln!(f, "H-flip:       {}", orientation.h_flip)?;
        writeln!(f, "V-flip:       {}", orientation.v_flip)?;

        writeln!(f, "=== PERFORMANCE ===")?;
        let timings = &adapter.timings;
        match (timings.last(), timings.average(), timings.fastest(), timings.slowest()) {
            (Some(last), Some(average), Some(fastest), Some(slowest)) => {
                writeln!(f, "Last refresh:    {:.2}s", last.as_secs_f64())?;
                writeln!(f, "Average refresh: {:.2}s", average.as_secs_f64())?;
                writeln!(f, "Fastest refresh: {:.2}s", fastest.as_secs_f64())?;
                writeln!(f, "Slowest refresh: {:.2}s", slowest.as_secs_f64())?;
                writeln!(f, "Total refreshes: {}", timings.count())?;
            }
            _ => writeln!(f, "No refresh data yet")?,
        }

        writeln!(f, "=== DEBUG SETTINGS ===")?;
        writeln!(f, "Grid overlay:  {}", on_off(adapter.grid))?;
        writeln!(f, "Coordinates:   {}", on_off(adapter.coordinates))?;
        writeln!(f, "Timing:        {}", on_off(adapter.timing))?;
        write!(f, "Fast mode:     {}", on_off(adapter.fast_mode))
    }
}

/// Full-width bands, one per ink, each labelled with the ink name
pub fn test_pattern(descriptor: &DisplayDescriptor) -> IndexedImage {
    let (width, height) = (descriptor.width(), descriptor.height());
    let inks = descriptor.color_mode.inks();
    let mut image = IndexedImage::new(width, height);
    let Ok(bands) = u32::try_from(inks.len()) else {
        return image;
    };
    let band_height = height / bands.max(1);
    let black = PaletteIndex::new(descriptor.color_mode.black_index());
    let white = PaletteIndex::new(descriptor.color_mode.white_index());
    let label_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    for (band, &(index, name)) in (0u32..).zip(inks) {
        let top = band * band_height;
        // Last band absorbs the rounding remainder.
        let bottom = if band + 1 == bands { height } else { top + band_height };
        let _ = Rectangle::new(Point::new(0, top as i32), Size::new(width, bottom - top))
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex::new(index)))
            .draw(&mut image);

        let text = if matches!(name, "white" | "clean") { black } else { white };
        let centre = Point::new((width / 2) as i32, ((top + bottom) / 2) as i32);
        let _ = Text::with_text_style(name, centre, MonoTextStyle::new(&FONT_10X20, text), label_style)
            .draw(&mut image);
    }
    image
}

fn draw_grid(canvas: &mut IndexedImage, spacing: u32, ink: PaletteIndex) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let style = PrimitiveStyle::with_stroke(ink, 1);
    for x in (0..width).step_by(spacing as usize) {
        let _ = Line::new(Point::new(x, 0), Point::new(x, height - 1))
            .into_styled(style)
            .draw(canvas);
    }
    for y in (0..height).step_by(spacing as usize) {
        let _ = Line::new(Point::new(0, y), Point::new(width - 1, y))
            .into_styled(style)
            .draw(canvas);
    }
}

fn draw_coordinates(canvas: &mut IndexedImage, spacing: u32, ink: PaletteIndex) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let style = MonoTextStyle::new(&FONT_6X10, ink);
    for x in (0..width).step_by(spacing as usize) {
        for y in (0..height).step_by(spacing as usize) {
            let label = format!("({x},{y})");
            let _ = Text::with_baseline(&label, Point::new(x + 2, y + 2), style, Baseline::Top)
                .draw(canvas);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use inky_specs::{ColorMode, DisplayFamily};

    #[test]
    fn test_timings() {
        let mut timings = RefreshTimings::default();
        assert_eq!(timings.average(), None);
        timings.record(Duration::from_millis(300));
        timings.record(Duration::from_millis(100));
        timings.record(Duration::from_millis(200));
        assert_eq!(timings.last(), Some(Duration::from_millis(200)));
        assert_eq!(timings.average(), Some(Duration::from_millis(200)));
        assert_eq!(timings.fastest(), Some(Duration::from_millis(100)));
        assert_eq!(timings.slowest(), Some(Duration::from_millis(300)));
        assert_eq!(timings.count(), 3);
    }

    #[test]
    fn test_pattern_has_a_band_per_ink() {
        let descriptor =
            DisplayDescriptor::validated(DisplayFamily::Impressions, None, None, false)
                .unwrap();
        let pattern = test_pattern(&descriptor);
        // 448 / 8 = 56 px bands; sample each band's left edge.
        for index in 0..8u8 {
            let y = i32::from(index) * 56 + 1;
            assert_eq!(pattern.get(0, y), Some(index));
        }
    }

    #[test]
    fn test_pattern_last_band_reaches_bottom() {
        let descriptor =
            DisplayDescriptor::validated(DisplayFamily::Phat, Some(ColorMode::Red), None, false)
                .unwrap();
        let pattern = test_pattern(&descriptor);
        // 104 / 3 = 34; last band covers rows 68..104.
        assert_eq!(pattern.get(0, 103), Some(2));
        assert_eq!(pattern.get(0, 0), Some(0));
    }
}
