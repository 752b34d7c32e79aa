//! Platform detection
//!
//! Decides whether a display request should go to real hardware or to the
//! simulator. The precedence is: explicit caller flag, then the
//! `INKY_FORCE_SIMULATION` environment override, then detected capability.

use std::path::Path;

/// Environment variable that forces simulation on capable hardware
pub const FORCE_SIMULATION_ENV: &str = "INKY_FORCE_SIMULATION";

/// Device-tree node naming the board model on ARM Linux
pub const DEVICE_TREE_MODEL: &str = "/proc/device-tree/model";

/// Caller's explicit choice between hardware and simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationOverride {
    /// Decide from the environment and platform
    #[default]
    Auto,
    /// Always simulate
    Simulate,
    /// Always attempt hardware
    Hardware,
}

impl From<Option<bool>> for SimulationOverride {
    fn from(simulate: Option<bool>) -> Self {
        match simulate {
            None => SimulationOverride::Auto,
            Some(true) => SimulationOverride::Simulate,
            Some(false) => SimulationOverride::Hardware,
        }
    }
}

/// Where a display request should be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// Physical panel
    Hardware,
    /// Software stand-in
    Simulator,
}

/// Snapshot of the platform facts relevant to display selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProbe {
    capable: bool,
    forced: bool,
}

impl PlatformProbe {
    /// Read the real platform: OS, device-tree model and environment
    pub fn detect() -> Self {
        let capable = cfg!(target_os = "linux") && device_model_is_raspberry_pi(DEVICE_TREE_MODEL);
        let forced = std::env::var(FORCE_SIMULATION_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        tracing::debug!(capable, forced, "platform probe");
        Self { capable, forced }
    }

    /// Build a probe from known facts
    pub const fn from_facts(capable: bool, forced: bool) -> Self {
        Self { capable, forced }
    }

    /// True on a Raspberry Pi running Linux
    pub fn is_capable_hardware(&self) -> bool {
        self.capable
    }

    /// True when the environment forces simulation
    pub fn is_simulation_forced(&self) -> bool {
        self.forced
    }

    /// Hardware is used only when capable and not forced into simulation
    pub fn should_use_hardware(&self) -> bool {
        self.capable && !self.forced
    }

    /// Resolve the target for a request
    pub fn target_mode(&self, request: SimulationOverride) -> TargetMode {
        match request {
            SimulationOverride::Simulate => TargetMode::Simulator,
            SimulationOverride::Hardware => TargetMode::Hardware,
            SimulationOverride::Auto if self.should_use_hardware() => TargetMode::Hardware,
            SimulationOverride::Auto => TargetMode::Simulator,
        }
    }
}

/// `1`, `true` and `yes` in any case
pub fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes"]
        .iter()
        .any(|t| t.eq_ignore_ascii_case(value))
}

/// True when the model string names a Raspberry Pi
pub fn model_is_raspberry_pi(model: &str) -> bool {
    model.to_ascii_lowercase().contains("raspberry pi")
}

fn device_model_is_raspberry_pi(path: impl AsRef<Path>) -> bool {
    match std::fs::read(path) {
        // The device-tree string is NUL-terminated.
        Ok(bytes) => model_is_raspberry_pi(&String::from_utf8_lossy(&bytes)),
        Err(_) => false,
    }
}
