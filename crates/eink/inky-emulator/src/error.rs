//! Simulator errors

/// Failures starting or configuring a simulator
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    /// The rendering backend could not be created (no display server,
    /// unsupported platform, headless build)
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The render thread could not be started
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// A configuration file did not parse
    #[error("invalid emulator config: {0}")]
    Config(#[from] serde_json::Error),
    /// The backend failed to put a frame on screen
    #[error("failed to present frame: {0}")]
    Present(String),
}
