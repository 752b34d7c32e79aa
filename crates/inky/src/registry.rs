//! Static driver registry
//!
//! One entry per panel family: the controller it carries and the function
//! that builds its hardware driver. Lookup is a table scan keyed by the
//! family enum.

use core::fmt;

use inky_platform::{DisplayDriver, Orientation};
use inky_specs::{Controller, DisplayDescriptor, DisplayFamily};

use crate::error::{Error, Result};
use crate::hardware::{PanelBusProvider, PanelDriver};

/// Builds a hardware driver for one registry entry
pub type PanelConstructor = fn(
    controller: Controller,
    descriptor: DisplayDescriptor,
    orientation: Orientation,
    buses: &dyn PanelBusProvider,
) -> Result<Box<dyn DisplayDriver>>;

/// How to drive one panel family
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    /// Panel family served by this entry
    pub family: DisplayFamily,
    /// Controller on that panel
    pub controller: Controller,
    /// Hardware driver constructor
    pub construct: PanelConstructor,
}

impl RegistryEntry {
    /// Open the panel and initialise it
    pub fn open(
        &self,
        descriptor: DisplayDescriptor,
        orientation: Orientation,
        buses: &dyn PanelBusProvider,
    ) -> Result<Box<dyn DisplayDriver>> {
        (self.construct)(self.controller, descriptor, orientation, buses)
    }
}

/// Every supported family
pub static REGISTRY: [RegistryEntry; 6] = [
    entry(DisplayFamily::Phat),
    entry(DisplayFamily::PhatSsd1608),
    entry(DisplayFamily::What),
    entry(DisplayFamily::WhatSsd1683),
    entry(DisplayFamily::Impressions),
    entry(DisplayFamily::Impressions73),
];

const fn entry(family: DisplayFamily) -> RegistryEntry {
    RegistryEntry {
        family,
        controller: family.controller(),
        construct: open_panel,
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("family", &self.family)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

/// Registry entry for `family`
pub fn lookup(family: DisplayFamily) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.family == family)
}

/// Open a bus for the controller and reset the panel
///
/// Bus failures become [`Error::HardwareUnavailable`] so the factory can fall
/// back to a simulator.
fn open_panel(
    controller: Controller,
    descriptor: DisplayDescriptor,
    orientation: Orientation,
    buses: &dyn PanelBusProvider,
) -> Result<Box<dyn DisplayDriver>> {
    let bus = buses
        .open(controller, &descriptor)
        .map_err(|e| Error::HardwareUnavailable(format!("{}: {e}", controller.name())))?;
    let mut driver = PanelDriver::new(descriptor, controller, orientation, bus);
    driver
        .setup()
        .map_err(|e| Error::HardwareUnavailable(format!("{}: {e}", controller.name())))?;
    Ok(Box::new(driver))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_is_registered() {
        for family in DisplayFamily::ALL {
            let entry = lookup(family);
            assert!(matches!(entry, Some(e) if e.controller == family.controller()));
        }
    }

    #[test]
    fn test_registry_controllers() {
        let controllers: Vec<_> = REGISTRY.iter().map(|e| e.controller.name()).collect();
        assert_eq!(
            controllers,
            ["IL91874", "SSD1608", "IL91874", "SSD1683", "UC8159", "AC073TC1A"]
        );
    }
}
