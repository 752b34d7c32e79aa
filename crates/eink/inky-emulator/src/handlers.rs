//! Button handler registry
//!
//! Handlers run on the render thread, in registration order. A handler that
//! panics is logged and skipped; the remaining handlers and the render loop
//! carry on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use inky_platform::{Button, ButtonHandler};

use crate::sync::lock;

#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: Mutex<Vec<(Button, ButtonHandler)>>,
}

impl HandlerRegistry {
    pub fn register(&self, button: Button, handler: ButtonHandler) {
        lock(&self.handlers).push((button, handler));
    }

    /// Invoke every handler registered for `button`
    ///
    /// The list is taken out of the lock while handlers run, so a handler
    /// may register further handlers. Those join the end of the list and
    /// first fire on the next press.
    pub fn dispatch(&self, button: Button) {
        let mut running = std::mem::take(&mut *lock(&self.handlers));
        let mut called = 0usize;
        for (index, (bound, handler)) in running.iter_mut().enumerate() {
            if *bound != button {
                continue;
            }
            called += 1;
            if panic::catch_unwind(AssertUnwindSafe(|| handler(button))).is_err() {
                tracing::error!(button = %button, handler = index, "button handler panicked");
            }
        }
        tracing::debug!(button = %button, handlers = called, "button dispatched");

        let mut handlers = lock(&self.handlers);
        let added = std::mem::take(&mut *handlers);
        *handlers = running;
        handlers.extend(added);
    }

    pub fn len(&self) -> usize {
        lock(&self.handlers).len()
    }
}
