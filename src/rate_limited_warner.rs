//! Rate-limited warnings about messages that could not be sent.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Clock returning whole seconds; injectable for tests.
pub type TimeProvider = Box<dyn Fn() -> u64 + Send + Sync>;

/// Seconds since the UNIX epoch, or 0 if the clock is before it.
pub fn system_time_provider() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_secs())
        .unwrap_or_default()
}

/// Counts dropped messages and reports them at most once per interval.
///
/// Callers increment the counter via [`record_drop`](Self::record_drop).
/// [`warn_if_due`](Self::warn_if_due) hands the pending count to a callback
/// once the interval has elapsed since the last report, and
/// [`flush`](Self::flush) reports immediately.
pub struct RateLimitedWarner {
    last_warn: AtomicU64,
    dropped: AtomicU64,
    interval_secs: u64,
    now: TimeProvider,
}

impl RateLimitedWarner {
    /// Create a warner whose first warning can be emitted immediately.
    pub fn new(interval: Duration) -> Self {
        Self::with_time_provider(interval, Box::new(system_time_provider))
    }

    pub fn with_time_provider(interval: Duration, now: TimeProvider) -> Self {
        let interval_secs = interval.as_secs();
        Self {
            last_warn: AtomicU64::new(now().saturating_sub(interval_secs)),
            dropped: AtomicU64::new(0),
            interval_secs,
            now,
        }
    }

    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Messages dropped since the last report.
    pub fn pending(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Report pending drops if the interval has elapsed.
    pub fn warn_if_due(&self, warn: impl FnOnce(u64)) {
        let now = (self.now)();
        let prev = self.last_warn.load(Ordering::Relaxed);
        if now.saturating_sub(prev) < self.interval_secs {
            return;
        }
        if self
            .last_warn
            .compare_exchange(prev, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            // Another thread is reporting for this interval.
            return;
        }
        let count = self.dropped.swap(0, Ordering::Relaxed);
        if count > 0 {
            warn(count);
        }
    }

    /// Report pending drops now, regardless of the interval.
    pub fn flush(&self, warn: impl FnOnce(u64)) {
        let count = self.dropped.swap(0, Ordering::Relaxed);
        if count > 0 {
            warn(count);
            self.last_warn.store((self.now)(), Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for RateLimitedWarner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitedWarner")
            .field("interval_secs", &self.interval_secs)
            .field("dropped", &self.pending())
            .finish()
    }
}
