//! Display factory
//!
//! Chooses between a physical panel and a simulator, then builds the driver.
//! Each step has a fallback:
//!
//! ```text
//! Hardware + auto     → identity chip → concrete family
//!                       (nothing found → request fallback / NoDisplayDetected)
//! Hardware + family   → registry → PanelDriver
//!                       (HardwareUnavailable → simulator, same descriptor)
//! Simulator           → window / headless Simulator
//!                       (backend unavailable → SnapshotDisplay)
//! Simulator + auto    → request fallback, else Impressions 600×448
//! ```

use std::path::PathBuf;

use inky_emulator::{EmulatorConfig, EmulatorError, Simulator, SnapshotDisplay};
use inky_platform::{DisplayDriver, Orientation, PlatformProbe, Rotation, SimulationOverride, TargetMode};
use inky_specs::{
    decode, variant_name, ColorMode, ConfigurationError, DisplayDescriptor, DisplayFamily,
    RequestedFamily, Resolution,
};

use crate::error::{Error, Result};
use crate::hardware::{IdentitySource, PanelBusProvider};
use crate::registry;

/// What to build when no panel is detected in simulator mode
pub const DEFAULT_SIMULATED_FAMILY: DisplayFamily = DisplayFamily::Impressions;

/// Which simulator to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatorBackend {
    /// Desktop window (falls back to snapshots when no window can be opened)
    Window,
    /// In-memory surface, nothing shown
    Headless,
    /// Synchronous snapshot display, optionally writing a PNG per frame
    Snapshot {
        /// PNG written on every `show()`
        output: Option<PathBuf>,
    },
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        if cfg!(feature = "headless") {
            SimulatorBackend::Headless
        } else {
            SimulatorBackend::Window
        }
    }
}

/// Everything a caller can ask for when creating a display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayRequest {
    /// Panel family, or auto-detection
    pub family: RequestedFamily,
    /// Ink set; required for physical pHAT/wHAT panels (simulators default to
    /// black), forbidden for Impressions
    pub color: Option<ColorMode>,
    /// Explicit hardware/simulator choice
    pub simulation: SimulationOverride,
    /// Resolution override
    pub resolution: Option<Resolution>,
    /// Flips and rotation
    pub orientation: Orientation,
    /// Panel to use when auto-detection finds nothing
    pub fallback: Option<(DisplayFamily, Option<ColorMode>)>,
}

impl DisplayRequest {
    /// Auto-detect the panel
    pub fn auto() -> Self {
        Self::default()
    }

    /// A specific panel family
    pub fn family(family: DisplayFamily) -> Self {
        Self {
            family: RequestedFamily::Family(family),
            ..Self::default()
        }
    }

    /// Set the ink set
    pub fn color(mut self, color: ColorMode) -> Self {
        self.color = Some(color);
        self
    }

    /// Force simulation (`true`) or hardware (`false`)
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulation = SimulationOverride::from(Some(simulate));
        self
    }

    /// Override the family's default resolution
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Some(Resolution::new(width, height));
        self
    }

    /// Mirror top-bottom
    pub fn h_flip(mut self, flip: bool) -> Self {
        self.orientation.h_flip = flip;
        self
    }

    /// Mirror left-right
    pub fn v_flip(mut self, flip: bool) -> Self {
        self.orientation.v_flip = flip;
        self
    }

    /// Rotate counter-clockwise
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.orientation.rotation = rotation;
        self
    }

    /// Rotate counter-clockwise by 0, 90, 180 or 270 degrees
    pub fn rotation_degrees(self, degrees: u16) -> Result<Self> {
        Ok(self.rotation(Rotation::try_from(degrees)?))
    }

    /// Panel to build when auto-detection finds nothing
    pub fn fallback(mut self, family: DisplayFamily, color: Option<ColorMode>) -> Self {
        self.fallback = Some((family, color));
        self
    }

    fn with_panel(&self, family: DisplayFamily, color: Option<ColorMode>, resolution: Option<Resolution>) -> Self {
        Self {
            family: RequestedFamily::Family(family),
            color,
            resolution,
            fallback: None,
            ..self.clone()
        }
    }
}

/// Builds display drivers
///
/// The factory is an explicit handle holding the platform facts and the
/// hardware collaborators; create one per application.
pub struct DisplayFactory {
    probe: PlatformProbe,
    identity: Option<Box<dyn IdentitySource>>,
    buses: Option<Box<dyn PanelBusProvider>>,
    backend: SimulatorBackend,
    config: EmulatorConfig,
}

impl Default for DisplayFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayFactory {
    /// Factory using the detected platform
    pub fn new() -> Self {
        Self::with_probe(PlatformProbe::detect())
    }

    /// Factory using injected platform facts
    pub fn with_probe(probe: PlatformProbe) -> Self {
        Self {
            probe,
            identity: None,
            buses: None,
            backend: SimulatorBackend::default(),
            config: EmulatorConfig::default(),
        }
    }

    /// Identity chip reader used for auto-detection
    pub fn identity_source(mut self, source: impl IdentitySource + 'static) -> Self {
        self.identity = Some(Box::new(source));
        self
    }

    /// Bus provider used to open physical panels
    pub fn bus_provider(mut self, provider: impl PanelBusProvider + 'static) -> Self {
        self.buses = Some(Box::new(provider));
        self
    }

    /// Simulator to start in simulator mode
    pub fn simulator_backend(mut self, backend: SimulatorBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Presentation and timing of simulators
    ///
    /// The request's orientation replaces the one in `config`.
    pub fn emulator_config(mut self, config: EmulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Platform facts in use
    pub fn probe(&self) -> &PlatformProbe {
        &self.probe
    }

    /// Build the display described by `request`
    pub fn create(&self, request: &DisplayRequest) -> Result<Box<dyn DisplayDriver>> {
        if let Some(resolution) = request.resolution.filter(Resolution::is_empty) {
            return Err(ConfigurationError::EmptyResolution { resolution }.into());
        }
        let mode = self.probe.target_mode(request.simulation);
        tracing::debug!(family = %request.family, ?mode, "creating display");

        match request.family {
            RequestedFamily::Family(family) => {
                let descriptor = DisplayDescriptor::validated(
                    family,
                    request.color,
                    request.resolution,
                    mode == TargetMode::Hardware,
                )?;
                match mode {
                    TargetMode::Hardware => self.create_hardware(descriptor, request.orientation),
                    TargetMode::Simulator => Ok(self.create_simulator(descriptor, request.orientation)),
                }
            }
            RequestedFamily::Auto => self.create_auto(request, mode),
        }
    }

    fn create_auto(&self, request: &DisplayRequest, mode: TargetMode) -> Result<Box<dyn DisplayDriver>> {
        if mode == TargetMode::Hardware {
            if let Some(detected) = self.detect() {
                if request.color.is_some_and(|c| c != detected.color_mode) {
                    tracing::debug!(
                        requested = ?request.color,
                        detected = %detected.color_mode,
                        "detected colour overrides request"
                    );
                }
                return self.create(&request.with_panel(
                    detected.family,
                    Some(detected.color_mode),
                    Some(detected.resolution),
                ));
            }
        }

        if let Some((family, color)) = request.fallback {
            tracing::info!(%family, "no display detected, using fallback panel");
            return self.create(&request.with_panel(family, color, request.resolution));
        }

        match mode {
            TargetMode::Hardware => Err(Error::NoDisplayDetected),
            TargetMode::Simulator => {
                tracing::info!(family = %DEFAULT_SIMULATED_FAMILY, "simulating default panel");
                self.create(&request.with_panel(DEFAULT_SIMULATED_FAMILY, None, request.resolution))
            }
        }
    }

    /// Read and decode the identity chip
    fn detect(&self) -> Option<DisplayDescriptor> {
        let Some(source) = &self.identity else {
            tracing::debug!("no identity source configured");
            return None;
        };
        let record = source.read();
        let detected = decode(record.as_ref());
        match (&record, &detected) {
            (Some(record), Some(descriptor)) => tracing::info!(
                variant = record.variant_code(),
                board = variant_name(record.variant_code()).unwrap_or("unknown"),
                display = %descriptor,
                "display detected"
            ),
            (Some(record), None) => tracing::warn!(
                variant = record.variant_code(),
                color = ?record.color(),
                "identity record not recognised"
            ),
            (None, _) => tracing::debug!("identity chip did not answer"),
        }
        detected
    }

    fn create_hardware(
        &self,
        descriptor: DisplayDescriptor,
        orientation: Orientation,
    ) -> Result<Box<dyn DisplayDriver>> {
        match self.open_panel(descriptor, orientation) {
            Ok(driver) => Ok(driver),
            Err(Error::HardwareUnavailable(reason)) => {
                tracing::warn!(
                    family = %descriptor.family,
                    %reason,
                    "hardware unavailable, falling back to simulator"
                );
                Ok(self.create_simulator(descriptor.with_hardware(false), orientation))
            }
            Err(e) => Err(e),
        }
    }

    fn open_panel(
        &self,
        descriptor: DisplayDescriptor,
        orientation: Orientation,
    ) -> Result<Box<dyn DisplayDriver>> {
        let entry = registry::lookup(descriptor.family).ok_or_else(|| {
            Error::HardwareUnavailable(format!("no driver registered for {}", descriptor.family))
        })?;
        let buses = self
            .buses
            .as_deref()
            .ok_or_else(|| Error::HardwareUnavailable("no panel bus provider configured".into()))?;
        entry.open(descriptor, orientation, buses)
    }

    /// Start the configured simulator, or a snapshot display if it cannot start
    fn create_simulator(&self, descriptor: DisplayDescriptor, orientation: Orientation) -> Box<dyn DisplayDriver> {
        let config = self.config.with_orientation(orientation);
        let started = match &self.backend {
            SimulatorBackend::Window => start_windowed(descriptor, config),
            SimulatorBackend::Headless => Simulator::headless(descriptor, config).map(|(sim, _)| sim),
            SimulatorBackend::Snapshot { output } => {
                return Box::new(snapshot(descriptor, orientation, output.clone()));
            }
        };
        match started {
            Ok(simulator) => Box::new(simulator),
            Err(e) => {
                let err = Error::SimulatorBackendUnavailable(e.to_string());
                tracing::warn!(error = %err, "falling back to snapshot display");
                Box::new(snapshot(descriptor, orientation, None))
            }
        }
    }
}

fn snapshot(descriptor: DisplayDescriptor, orientation: Orientation, output: Option<PathBuf>) -> SnapshotDisplay {
    let display = SnapshotDisplay::new(descriptor, orientation);
    match output {
        Some(path) => display.with_output(path),
        None => display,
    }
}

#[cfg(not(feature = "headless"))]
fn start_windowed(descriptor: DisplayDescriptor, config: EmulatorConfig) -> Result<Simulator, EmulatorError> {
    Simulator::windowed(descriptor, config)
}

#[cfg(feature = "headless")]
fn start_windowed(_descriptor: DisplayDescriptor, _config: EmulatorConfig) -> Result<Simulator, EmulatorError> {
    Err(EmulatorError::BackendUnavailable(
        "window backend not compiled in (headless build)".to_string(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = DisplayRequest::family(DisplayFamily::What)
            .color(ColorMode::Red)
            .simulate(true)
            .resolution(200, 100)
            .h_flip(true)
            .rotation_degrees(270)
            .unwrap();
        assert_eq!(request.family, RequestedFamily::Family(DisplayFamily::What));
        assert_eq!(request.color, Some(ColorMode::Red));
        assert_eq!(request.simulation, SimulationOverride::Simulate);
        assert_eq!(request.resolution, Some(Resolution::new(200, 100)));
        assert!(request.orientation.h_flip);
        assert!(!request.orientation.v_flip);
        assert_eq!(request.orientation.rotation, Rotation::Degrees270);
    }

    #[test]
    fn test_bad_rotation_is_configuration_error() {
        let err = DisplayRequest::auto().rotation_degrees(45).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::InvalidRotation { degrees: 45 })
        ));
    }

    #[test]
    fn test_with_panel_drops_fallback() {
        let request = DisplayRequest::auto()
            .v_flip(true)
            .fallback(DisplayFamily::Phat, Some(ColorMode::Red));
        let resolved = request.with_panel(DisplayFamily::Phat, Some(ColorMode::Red), None);
        assert_eq!(resolved.family, RequestedFamily::Family(DisplayFamily::Phat));
        assert!(resolved.fallback.is_none());
        assert!(resolved.orientation.v_flip);
    }

    #[cfg(feature = "headless")]
    #[test]
    fn test_headless_build_has_no_window() {
        let descriptor =
            DisplayDescriptor::validated(DisplayFamily::Phat, Some(ColorMode::Red), None, false).unwrap();
        let err = start_windowed(descriptor, EmulatorConfig::FAST).err().unwrap();
        assert!(matches!(err, EmulatorError::BackendUnavailable(_)));
    }
}
