//! Clock and timing utilities.
//!
//! Export artifacts are named after the wall-clock millisecond at which
//! they were produced, and the "copied" acknowledgment is shown for a
//! short monotonic window after a successful clipboard write.

use std::time::{Duration, Instant};

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

/// Milliseconds since the Unix epoch, wall-clock.
pub fn unix_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// File name for a downloaded export taken at `timestamp_ms`.
pub fn download_file_name(timestamp_ms: i64) -> String {
    format!("gradient-image-{timestamp_ms}.png")
}

/// Transient acknowledgment shown after a successful copy.
///
/// Each new copy restarts the window; the flag reverts on its own once
/// the window has elapsed.
#[derive(Debug, Clone)]
pub struct CopyAcknowledgment {
    shown_at: Option<Instant>,
    window: Duration,
}

impl Default for CopyAcknowledgment {
    fn default() -> Self {
        Self::new(COPY_ACK_WINDOW)
    }
}

impl CopyAcknowledgment {
    /// Create an acknowledgment with a custom display window.
    pub fn new(window: Duration) -> Self {
        Self {
            shown_at: None,
            window,
        }
    }

    /// Mark a successful copy at `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    /// Whether the acknowledgment is visible at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        match self.shown_at {
            Some(at) => now.saturating_duration_since(at) < self.window,
            None => false,
        }
    }

    /// Time left before the acknowledgment reverts.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.shown_at {
            Some(at) => self
                .window
                .saturating_sub(now.saturating_duration_since(at)),
            None => Duration::ZERO,
        }
    }

    /// Label for the copy control at `now`.
    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_active(now) {
            "Copied!"
        } else {
            "Copy"
        }
    }
}
