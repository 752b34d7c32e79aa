//! Render request hand-off between callers and the render thread
//!
//! At most one request is pending. Publishing while one is pending replaces
//! its frame (last write wins) and moves its waiters onto the new request, so
//! every waiter is completed exactly once, by whichever frame is drawn.
//!
//! Each waiter holds the receiving end of a single-use channel. Dropping a
//! pending request without completing it (render thread gone) disconnects
//! the channel, which the waiter reports as
//! [`DisplayError::RenderThreadStopped`].

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use inky_platform::{DisplayError, IndexedImage};

use crate::sync::lock;

/// A frame snapshot waiting for the render thread
#[derive(Debug, Clone)]
pub(crate) struct RenderRequest {
    pub id: u64,
    pub image: IndexedImage,
    pub saturation: f32,
    pub border: u8,
}

/// Outcome delivered to a waiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReceipt {
    /// Request the waiter published
    pub requested: u64,
    /// Request actually drawn (equal to or later than `requested`)
    pub rendered: u64,
    /// True when the drawn frame failed and was skipped
    pub skipped: bool,
}

impl RenderReceipt {
    /// True when a later request replaced this one before it was drawn
    pub fn was_superseded(&self) -> bool {
        self.rendered != self.requested
    }
}

/// Counters kept by the render queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Requests published
    pub requested: u64,
    /// Frames drawn successfully
    pub rendered: u64,
    /// Requests replaced before they were drawn
    pub superseded: u64,
    /// Frames that failed and were skipped
    pub skipped: u64,
}

struct Waiter {
    requested: u64,
    tx: SyncSender<RenderReceipt>,
}

/// The pending request plus everyone waiting on it
pub(crate) struct Pending {
    pub request: RenderRequest,
    waiters: Vec<Waiter>,
}

impl Pending {
    fn complete(self, skipped: bool) {
        let rendered = self.request.id;
        for waiter in self.waiters {
            // Receiver dropped means the caller did not wait.
            let _ = waiter.tx.send(RenderReceipt {
                requested: waiter.requested,
                rendered,
                skipped,
            });
        }
    }
}

/// Handle for one published request
#[derive(Debug)]
pub struct CompletionHandle {
    requested: u64,
    rx: Receiver<RenderReceipt>,
    timeout: Duration,
}

impl CompletionHandle {
    /// Id of the published request
    pub fn request_id(&self) -> u64 {
        self.requested
    }

    /// Block until the request (or its replacement) is drawn
    ///
    /// Fails with [`DisplayError::RenderThreadStopped`] as soon as the render
    /// thread exits, and with [`DisplayError::CompletionTimeout`] after the
    /// configured timeout.
    pub fn wait(self) -> Result<RenderReceipt, DisplayError> {
        match self.rx.recv_timeout(self.timeout) {
            Ok(receipt) => Ok(receipt),
            Err(RecvTimeoutError::Disconnected) => Err(DisplayError::RenderThreadStopped),
            Err(RecvTimeoutError::Timeout) => Err(DisplayError::CompletionTimeout {
                waited_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

/// What the render thread should do next
pub(crate) enum Next {
    Render(Pending),
    Idle,
    Shutdown,
}

struct QueueState {
    pending: Option<Pending>,
    next_id: u64,
    shutdown: bool,
    alive: bool,
    stats: RenderStats,
}

pub(crate) struct RenderQueue {
    state: Mutex<QueueState>,
    wake: Condvar,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: None,
                next_id: 0,
                shutdown: false,
                alive: true,
                stats: RenderStats::default(),
            }),
            wake: Condvar::new(),
        }
    }

    /// Publish a frame, superseding any pending one
    pub fn publish(
        &self,
        image: IndexedImage,
        saturation: f32,
        border: u8,
        timeout: Duration,
    ) -> Result<CompletionHandle, DisplayError> {
        let (tx, rx) = mpsc::sync_channel(1);
        let mut state = lock(&self.state);
        if state.shutdown {
            return Err(DisplayError::Closed);
        }
        if !state.alive {
            return Err(DisplayError::RenderThreadStopped);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.stats.requested += 1;

        let request = RenderRequest {
            id,
            image,
            saturation,
            border,
        };
        let waiter = Waiter { requested: id, tx };
        match state.pending.take() {
            Some(mut pending) => {
                tracing::debug!(superseded = pending.request.id, by = id, "render request superseded");
                state.stats.superseded += 1;
                pending.request = request;
                pending.waiters.push(waiter);
                state.pending = Some(pending);
            }
            None => {
                state.pending = Some(Pending {
                    request,
                    waiters: vec![waiter],
                });
            }
        }
        drop(state);
        self.wake.notify_one();

        Ok(CompletionHandle {
            requested: id,
            rx,
            timeout,
        })
    }

    /// Take the pending request, waiting up to `tick` for one to arrive
    ///
    /// A pending request is handed out even after shutdown was requested, so
    /// frames published before `close()` still reach the surface.
    pub fn next(&self, tick: Duration) -> Next {
        let mut state = lock(&self.state);
        if state.pending.is_none() && !state.shutdown {
            state = self
                .wake
                .wait_timeout(state, tick)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
        match state.pending.take() {
            Some(pending) => Next::Render(pending),
            None if state.shutdown => Next::Shutdown,
            None => Next::Idle,
        }
    }

    /// Resolve every waiter of a drawn (or skipped) request
    pub fn complete(&self, pending: Pending, skipped: bool) {
        {
            let mut state = lock(&self.state);
            if skipped {
                state.stats.skipped += 1;
            } else {
                state.stats.rendered += 1;
            }
        }
        pending.complete(skipped);
    }

    pub fn request_shutdown(&self) {
        lock(&self.state).shutdown = true;
        self.wake.notify_all();
    }

    /// Called when the render thread exits; releases all waiters
    pub fn mark_stopped(&self) {
        let orphaned = {
            let mut state = lock(&self.state);
            state.alive = false;
            state.pending.take()
        };
        if let Some(pending) = orphaned {
            tracing::warn!(
                request = pending.request.id,
                waiters = pending.waiters.len(),
                "render thread stopped with a pending request"
            );
        }
        self.wake.notify_all();
    }

    pub fn is_alive(&self) -> bool {
        lock(&self.state).alive
    }

    pub fn stats(&self) -> RenderStats {
        lock(&self.state).stats
    }
}
