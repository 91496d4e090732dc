//! Format-painter button gestures.
//!
//! A single click arms the painter and waits for the confirmation window to
//! pass, so that the click can still turn out to be the first half of a
//! double click. A double click switches to persistent painting. The
//! machine only decides which painter command to issue; the session runs it.

use std::time::{Duration, Instant};

use crate::command::Command;

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PainterGesture {
    /// Painter off, nothing pending
    #[default]
    Idle,
    /// Single click seen; fires when `deadline` passes
    Armed {
        /// When the single-shot painter is issued
        deadline: Instant,
    },
    /// Painting until turned off
    Persistent,
}

/// Tracks clicks on the painter button.
#[derive(Debug, Clone)]
pub struct PainterMachine {
    state: PainterGesture,
    timeout: Duration,
}

impl PainterMachine {
    /// Create an idle machine with the given confirmation window.
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: PainterGesture::Idle,
            timeout,
        }
    }

    /// Current state.
    pub fn state(&self) -> PainterGesture {
        self.state
    }

    /// Change the confirmation window; a pending deadline is kept.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Single click at `now`.
    ///
    /// Arms from idle. A second click inside the window cancels without
    /// painting. A click while persistent turns painting off.
    pub fn click(&mut self, now: Instant) -> Option<Command> {
        match self.state {
            PainterGesture::Idle => {
                self.state = PainterGesture::Armed {
                    deadline: now + self.timeout,
                };
                None
            }
            PainterGesture::Armed { .. } => {
                self.state = PainterGesture::Idle;
                None
            }
            PainterGesture::Persistent => {
                self.state = PainterGesture::Idle;
                Some(Command::CancelPainter)
            }
        }
    }

    /// Double click: persistent painting, dropping any pending single shot.
    pub fn double_click(&mut self) -> Option<Command> {
        self.state = PainterGesture::Persistent;
        Some(Command::Painter { double_click: true })
    }

    /// Fire the single-shot painter once the window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Command> {
        match self.state {
            PainterGesture::Armed { deadline } if now >= deadline => {
                self.state = PainterGesture::Idle;
                Some(Command::Painter {
                    double_click: false,
                })
            }
            _ => None,
        }
    }

    /// Return to idle without issuing anything.
    pub fn reset(&mut self) {
        self.state = PainterGesture::Idle;
    }
}

impl Default for PainterMachine {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    #[test]
    fn test_single_click_fires_after_window() {
        let t0 = Instant::now();
        let mut machine = PainterMachine::new(WINDOW);
        assert_eq!(machine.click(t0), None);
        assert!(matches!(machine.state(), PainterGesture::Armed { .. }));

        assert_eq!(machine.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            machine.poll(t0 + WINDOW),
            Some(Command::Painter {
                double_click: false
            })
        );
        assert_eq!(machine.state(), PainterGesture::Idle);
        assert_eq!(machine.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn test_second_click_cancels() {
        let t0 = Instant::now();
        let mut machine = PainterMachine::new(WINDOW);
        machine.click(t0);
        assert_eq!(machine.click(t0 + Duration::from_millis(50)), None);
        assert_eq!(machine.state(), PainterGesture::Idle);
        assert_eq!(machine.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn test_double_click_is_persistent() {
        let t0 = Instant::now();
        let mut machine = PainterMachine::new(WINDOW);
        machine.click(t0);
        assert_eq!(
            machine.double_click(),
            Some(Command::Painter { double_click: true })
        );
        assert_eq!(machine.state(), PainterGesture::Persistent);
        // The pending single shot was dropped.
        assert_eq!(machine.poll(t0 + WINDOW * 2), None);

        assert_eq!(machine.click(t0 + WINDOW * 3), Some(Command::CancelPainter));
        assert_eq!(machine.state(), PainterGesture::Idle);
    }
}
