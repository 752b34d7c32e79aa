//! Button event stream for application code
//!
//! - [`ButtonQueue`] - producer, fed by the render thread on every press.
//! - [`ButtonEvents`] - consumer, returned by
//!   [`Simulator::button_events()`](crate::Simulator::button_events).
//!   Implements [`inky_platform::InputDevice`] so the same polling code can
//!   run against hardware input.
//!
//! Handlers registered on the display still fire; the queue is an
//! additional way to read the same presses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use inky_platform::{Button, InputDevice};

use crate::sync::lock;

/// Maximum number of unread presses buffered in the queue.
///
/// Newer presses are dropped when the queue is full.
const QUEUE_CAP: usize = 64;

/// Poll period of [`ButtonEvents::wait_for_event`]
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Producer half, owned by the render thread
#[derive(Clone, Default)]
pub(crate) struct ButtonQueue {
    queue: Arc<Mutex<VecDeque<Button>>>,
}

impl ButtonQueue {
    /// A consumer reading from this queue
    pub fn subscribe(&self) -> ButtonEvents {
        ButtonEvents {
            queue: self.queue.clone(),
        }
    }

    /// Enqueue a press. Drops the press if the queue is full.
    pub fn push(&self, button: Button) {
        let mut queue = lock(&self.queue);
        if queue.len() < QUEUE_CAP {
            queue.push_back(button);
        } else {
            tracing::trace!(button = %button, "button queue full, press dropped");
        }
    }
}

/// Consumer half of the button queue
///
/// Every `ButtonEvents` obtained from one simulator reads the same queue; a
/// press is delivered to whichever consumer polls first.
pub struct ButtonEvents {
    queue: Arc<Mutex<VecDeque<Button>>>,
}

impl InputDevice for ButtonEvents {
    /// Async wait: polls the queue every 5 ms until a press is available.
    async fn wait_for_event(&mut self) -> Button {
        loop {
            if let Some(button) = self.poll_event() {
                return button;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn poll_event(&mut self) -> Option<Button> {
        lock(&self.queue).pop_front()
    }
}
