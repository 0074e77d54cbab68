//! Debounced autosave timer.
//!
//! A panel owns exactly one `Autosave`. Arming it replaces the pending
//! deadline, so a burst of edits produces a single save once the window
//! has passed without further edits.

use std::future::pending;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// default quiet period before an autosave fires
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct Autosave {
    window: Duration,
    deadline: Option<Instant>,
}

impl Autosave {
    pub fn new(window: Duration) -> Autosave {
        Autosave {
            window: window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// (re)start the window from now, dropping any earlier deadline
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Autosave::new(DEFAULT_WINDOW)
    }
}

/// Resolves at `deadline`, or never when there is none.
pub async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending::<()>().await,
    }
}
