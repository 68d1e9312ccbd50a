// ── Refresh policy ──
//
// Decides whether a read may reuse the cached snapshot or must go to the
// device. Shared by every read path so many independent pollers collapse
// into at most one device request per interval.

use std::time::{Duration, Instant};

/// Minimum-interval refresh policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    min_interval: Duration,
}

impl RefreshPolicy {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// A refresh is due if none was ever attempted, or the last attempt
    /// started at least `min_interval` ago.
    pub fn is_due(&self, last_attempt: Option<Instant>, now: Instant) -> bool {
        match last_attempt {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= self.min_interval,
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REFRESH_INTERVAL)
    }
}
