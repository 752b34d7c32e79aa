//! Driver errors

/// Errors returned by [`DisplayDriver`](crate::DisplayDriver) operations
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The simulator's render thread has exited (window closed or crashed)
    #[error("render thread has stopped")]
    RenderThreadStopped,
    /// No completion arrived within the configured timeout
    #[error("frame was not rendered within {waited_ms}ms")]
    CompletionTimeout {
        /// How long the caller waited
        waited_ms: u64,
    },
    /// The display was closed by the caller
    #[error("display has been closed")]
    Closed,
    /// The driver cannot perform this operation
    #[error("{0} is not supported by this display")]
    Unsupported(&'static str),
    /// Panel bus failure on hardware
    #[error("panel bus error: {0}")]
    Bus(String),
    /// Writing a snapshot image failed
    #[error("failed to write snapshot: {0}")]
    Snapshot(String),
}
