//! Resettable coalescing timer for change notifications.

use std::time::{Duration, Instant};

/// Collapses a burst of events into one notification.
///
/// Every [`Debouncer::touch`] pushes the deadline back by the window;
/// [`Debouncer::poll`] fires once when the deadline has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an event at `now`, superseding any pending deadline.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Check if a notification is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire if the deadline has passed. Returns true at most once per burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending notification.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Change the window; a pending deadline is kept.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}
