//! Top-level errors

use inky_platform::DisplayError;
use inky_specs::ConfigurationError;

/// Errors returned while creating or driving a display
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested family, colour, resolution or rotation is invalid
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The panel could not be opened (no bus provider, bus open or reset failed)
    #[error("display hardware unavailable: {0}")]
    HardwareUnavailable(String),
    /// Auto-detection found nothing and no fallback panel was given
    #[error("no display detected")]
    NoDisplayDetected,
    /// The simulator backend could not be started
    #[error("simulator backend unavailable: {0}")]
    SimulatorBackendUnavailable(String),
    /// A driver operation failed
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Result alias for this crate
pub type Result<T, E = Error> = core::result::Result<T, E>;
