//! Trailing-edge debounce timer.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep};

/// Collapses a burst of triggers into one firing, `interval` after the
/// last trigger.
///
/// [`Debouncer::wait`] is cancel-safe and meant to sit in a
/// `tokio::select!` loop beside the event source.
pub struct Debouncer {
    interval: Duration,
    sleep: Pin<Box<Sleep>>,
    armed: bool,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            sleep: Box::pin(tokio::time::sleep(interval)),
            armed: false,
        }
    }

    /// Restart the countdown.
    pub fn schedule(&mut self) {
        self.sleep.as_mut().reset(Instant::now() + self.interval);
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Drop any pending firing.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Resolve when the countdown elapses. Never resolves while disarmed.
    pub async fn wait(&mut self) {
        if !self.armed {
            std::future::pending::<()>().await;
        }
        self.sleep.as_mut().await;
        self.armed = false;
    }
}
