//! Display selection and fallback chain

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{Arc, Mutex};

use inky::specs::{
    ColorMode, ConfigurationError, Controller, DisplayDescriptor, DisplayFamily, IdentityRecord,
    Resolution,
};
use inky::{
    BusError, DisplayDriver, DisplayFactory, DisplayRequest, EmulatorConfig, Error, IdentitySource,
    PanelBus, PanelBusProvider, PanelFrame, PlatformProbe, SimulatorBackend,
};

struct NullBus;

impl PanelBus for NullBus {
    fn reset(&mut self) -> Result<(), BusError> {
        Ok(())
    }

    fn write_frame(&mut self, _frame: &PanelFrame<'_>) -> Result<(), BusError> {
        Ok(())
    }

    fn wait_idle(&mut self) -> Result<(), BusError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MockBuses {
    opened: Arc<Mutex<Vec<Controller>>>,
    fail: bool,
}

impl PanelBusProvider for MockBuses {
    fn open(
        &self,
        controller: Controller,
        _descriptor: &DisplayDescriptor,
    ) -> Result<Box<dyn PanelBus>, BusError> {
        if self.fail {
            return Err(BusError("spidev0.0 not found".into()));
        }
        self.opened.lock().unwrap().push(controller);
        Ok(Box::new(NullBus))
    }
}

struct FixedIdentity(Option<IdentityRecord>);

impl IdentitySource for FixedIdentity {
    fn read(&self) -> Option<IdentityRecord> {
        self.0
    }
}

fn raspberry_pi() -> PlatformProbe {
    PlatformProbe::from_facts(true, false)
}

fn desktop() -> PlatformProbe {
    PlatformProbe::from_facts(false, false)
}

fn factory(probe: PlatformProbe) -> DisplayFactory {
    DisplayFactory::with_probe(probe)
        .simulator_backend(SimulatorBackend::Headless)
        .emulator_config(EmulatorConfig::FAST)
}

#[test]
fn detects_impressions_73_from_identity_chip() {
    let buses = MockBuses::default();
    let opened = buses.opened.clone();
    let factory = factory(raspberry_pi())
        .identity_source(FixedIdentity(Some(IdentityRecord::new(20, None))))
        .bus_provider(buses);

    let display = factory.create(&DisplayRequest::auto()).unwrap();
    let descriptor = display.descriptor();
    assert_eq!(descriptor.family, DisplayFamily::Impressions73);
    assert_eq!(descriptor.resolution, Resolution::new(800, 480));
    assert_eq!(descriptor.color_mode, ColorMode::Multi);
    assert!(descriptor.is_hardware);
    assert_eq!(*opened.lock().unwrap(), vec![Controller::AC073TC1A]);
}

#[test]
fn detects_yellow_what_ssd1683() {
    let buses = MockBuses::default();
    let opened = buses.opened.clone();
    let factory = factory(raspberry_pi())
        .identity_source(FixedIdentity(Some(IdentityRecord::new(17, Some(ColorMode::Yellow)))))
        .bus_provider(buses);

    let display = factory.create(&DisplayRequest::auto()).unwrap();
    let descriptor = display.descriptor();
    assert_eq!(descriptor.family, DisplayFamily::WhatSsd1683);
    assert_eq!(descriptor.resolution, Resolution::new(400, 300));
    assert_eq!(descriptor.color_mode, ColorMode::Yellow);
    assert_eq!(*opened.lock().unwrap(), vec![Controller::SSD1683]);
}

#[test]
fn hardware_failure_falls_back_to_equal_simulator() {
    let request = DisplayRequest::family(DisplayFamily::What).color(ColorMode::Red);
    let expected =
        DisplayDescriptor::validated(DisplayFamily::What, Some(ColorMode::Red), None, false).unwrap();

    let broken = factory(raspberry_pi()).bus_provider(MockBuses {
        fail: true,
        ..MockBuses::default()
    });
    assert_eq!(*broken.create(&request).unwrap().descriptor(), expected);

    let no_bus = factory(raspberry_pi());
    assert_eq!(*no_bus.create(&request).unwrap().descriptor(), expected);
}

#[test]
fn hardware_driver_is_built_from_registry() {
    let buses = MockBuses::default();
    let opened = buses.opened.clone();
    let factory = factory(raspberry_pi()).bus_provider(buses);

    let mut display = factory
        .create(&DisplayRequest::family(DisplayFamily::PhatSsd1608).color(ColorMode::Mono))
        .unwrap();
    assert!(display.descriptor().is_hardware);
    assert_eq!(display.descriptor().resolution, Resolution::new(250, 122));
    display.show(true).unwrap();
    assert_eq!(*opened.lock().unwrap(), vec![Controller::SSD1608]);
}

#[test]
fn simulate_override_skips_hardware() {
    let buses = MockBuses::default();
    let opened = buses.opened.clone();
    let factory = factory(raspberry_pi()).bus_provider(buses);

    let display = factory
        .create(&DisplayRequest::family(DisplayFamily::Phat).color(ColorMode::Red).simulate(true))
        .unwrap();
    assert!(!display.descriptor().is_hardware);
    assert!(opened.lock().unwrap().is_empty());
}

#[test]
fn forced_simulation_environment_wins_over_capability() {
    let factory = factory(PlatformProbe::from_facts(true, true)).bus_provider(MockBuses::default());
    let display = factory
        .create(&DisplayRequest::family(DisplayFamily::Impressions))
        .unwrap();
    assert!(!display.descriptor().is_hardware);
}

#[test]
fn auto_in_simulator_defaults_to_impressions() {
    let display = factory(desktop()).create(&DisplayRequest::auto()).unwrap();
    let descriptor = display.descriptor();
    assert_eq!(descriptor.family, DisplayFamily::Impressions);
    assert_eq!(descriptor.resolution, Resolution::new(600, 448));
    assert_eq!(descriptor.color_mode, ColorMode::Multi);
    assert!(!descriptor.is_hardware);
}

#[test]
fn auto_uses_explicit_fallback() {
    let request = DisplayRequest::auto().fallback(DisplayFamily::Phat, Some(ColorMode::Yellow));

    let simulated = factory(desktop()).create(&request).unwrap();
    assert_eq!(simulated.descriptor().family, DisplayFamily::Phat);
    assert_eq!(simulated.descriptor().color_mode, ColorMode::Yellow);

    // Unrecognised chip on hardware also takes the fallback.
    let hardware = factory(raspberry_pi())
        .identity_source(FixedIdentity(Some(IdentityRecord::new(99, None))))
        .bus_provider(MockBuses::default());
    let display = hardware.create(&request).unwrap();
    assert_eq!(display.descriptor().family, DisplayFamily::Phat);
    assert!(display.descriptor().is_hardware);
}

#[test]
fn auto_on_hardware_without_detection_fails() {
    let factory = factory(raspberry_pi())
        .identity_source(FixedIdentity(None))
        .bus_provider(MockBuses::default());
    let err = factory.create(&DisplayRequest::auto()).err().expect("nothing to detect");
    assert!(matches!(err, Error::NoDisplayDetected));
}

#[test]
fn colour_rules_are_enforced() {
    let hardware = factory(raspberry_pi()).bus_provider(MockBuses::default());
    let err = hardware
        .create(&DisplayRequest::family(DisplayFamily::Phat))
        .err()
        .expect("a physical pHAT needs a colour");
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::ColorRequired { family: DisplayFamily::Phat })
    ));

    let factory = factory(desktop());

    // A simulated pHAT/wHAT without a colour shows black ink.
    let display = factory
        .create(&DisplayRequest::family(DisplayFamily::Phat))
        .unwrap();
    assert_eq!(display.descriptor().color_mode, ColorMode::Mono);
    assert!(!display.descriptor().is_hardware);
    let display = factory
        .create(&DisplayRequest::family(DisplayFamily::What).simulate(true))
        .unwrap();
    assert_eq!(display.descriptor().color_mode, ColorMode::Mono);

    let err = factory
        .create(&DisplayRequest::family(DisplayFamily::Impressions).color(ColorMode::Red))
        .err()
        .expect("Impressions has a fixed ink set");
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::ColorForbidden { .. })
    ));

    // The intrinsic colour of a multicolour panel is accepted.
    assert!(factory
        .create(&DisplayRequest::family(DisplayFamily::Impressions73).color(ColorMode::Multi))
        .is_ok());
}

#[test]
fn zero_resolution_is_rejected() {
    let err = factory(desktop())
        .create(&DisplayRequest::auto().resolution(0, 448))
        .err()
        .expect("zero width");
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::EmptyResolution { .. })
    ));
}

#[test]
fn resolution_override_is_honoured() {
    let display = factory(desktop())
        .create(&DisplayRequest::family(DisplayFamily::Impressions).resolution(640, 400))
        .unwrap();
    assert_eq!(display.descriptor().resolution, Resolution::new(640, 400));
}

#[test]
fn snapshot_backend_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inky.png");
    let factory = DisplayFactory::with_probe(desktop()).simulator_backend(SimulatorBackend::Snapshot {
        output: Some(path.clone()),
    });

    let mut display = factory
        .create(&DisplayRequest::family(DisplayFamily::What).color(ColorMode::Mono))
        .unwrap();
    display.show(true).unwrap();
    assert!(path.exists());
}

#[cfg(feature = "headless")]
#[test]
fn window_backend_falls_back_to_snapshot_in_headless_build() {
    let factory = DisplayFactory::with_probe(desktop())
        .simulator_backend(SimulatorBackend::Window)
        .emulator_config(EmulatorConfig::FAST);
    let mut display = factory
        .create(&DisplayRequest::family(DisplayFamily::WhatSsd1683).color(ColorMode::Red))
        .unwrap();

    let descriptor = display.descriptor();
    assert_eq!(descriptor.family, DisplayFamily::WhatSsd1683);
    assert_eq!(descriptor.color_mode, ColorMode::Red);
    assert_eq!(descriptor.resolution, Resolution::new(400, 300));
    assert!(!descriptor.is_hardware);

    // Snapshot displays have no buttons; the threaded simulator does.
    let err = display
        .register_button_handler(inky::Button::A, Box::new(|_| {}))
        .unwrap_err();
    assert!(matches!(err, inky::DisplayError::Unsupported(_)));

    display.set_pixel(0, 0, 1);
    display.show(true).unwrap();
    display.close().unwrap();
}
