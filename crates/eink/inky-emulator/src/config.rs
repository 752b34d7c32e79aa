//! Emulator configuration

use std::time::Duration;

use inky_platform::Orientation;
use serde::{Deserialize, Serialize};

use crate::error::EmulatorError;

/// Configuration for simulator presentation and timing
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Flips and rotation applied to every frame
    pub orientation: Orientation,
    /// Upscaling factor (1 = no scaling, 2 = 2x for visibility, etc.)
    pub scale: u32,
    /// Width of the border margin around the active area, in panel pixels
    pub border_width: u32,
    /// Render loop period (input polling and request pickup)
    pub frame_interval_ms: u64,
    /// How long each flash (white, then black) stays on screen
    pub flash_hold_ms: u64,
    /// Upper bound on `show(wait = true)`
    pub completion_timeout_ms: u64,
}

impl EmulatorConfig {
    /// 30 Hz loop, 200 ms flashes, 1:1 pixels
    pub const DEFAULT: Self = Self {
        orientation: Orientation::IDENTITY,
        scale: 1,
        border_width: 8,
        frame_interval_ms: 33,
        flash_hold_ms: 200,
        completion_timeout_ms: 30_000,
    };

    /// No flash hold and a fast loop, for tests and scripted runs
    pub const FAST: Self = Self {
        orientation: Orientation::IDENTITY,
        scale: 1,
        border_width: 0,
        frame_interval_ms: 5,
        flash_hold_ms: 0,
        completion_timeout_ms: 5_000,
    };

    /// Same config with a different orientation
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Render loop period
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Flash hold time
    pub fn flash_hold(&self) -> Duration {
        Duration::from_millis(self.flash_hold_ms)
    }

    /// Completion timeout
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    /// Parse a JSON config; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, EmulatorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, EmulatorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use inky_platform::Rotation;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EmulatorConfig::from_json(r#"{"scale": 3}"#).unwrap();
        assert_eq!(config.scale, 3);
        assert_eq!(config.flash_hold_ms, EmulatorConfig::DEFAULT.flash_hold_ms);
        assert_eq!(config.orientation, Orientation::IDENTITY);
    }

    #[test]
    fn test_orientation_in_json() {
        let config = EmulatorConfig::from_json(
            r#"{"orientation": {"rotation": 90, "v_flip": true}}"#,
        )
        .unwrap();
        assert_eq!(config.orientation.rotation, Rotation::Degrees90);
        assert!(config.orientation.v_flip);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EmulatorConfig::FAST.with_orientation(Orientation {
            h_flip: true,
            ..Orientation::IDENTITY
        });
        let back = EmulatorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = EmulatorConfig::from_json(r#"{"scale": "big"}"#).unwrap_err();
        assert!(matches!(err, EmulatorError::Config(_)));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = EmulatorConfig {
            frame_interval_ms: 0,
            ..EmulatorConfig::DEFAULT
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }
}
