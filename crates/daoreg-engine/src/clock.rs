//! Time source for offer timestamps and trade records.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock with one-second resolution.
///
/// Clones share the same instant, so a test can keep a handle and advance
/// the clock owned by a registry.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    secs: Arc<AtomicI64>,
}

impl FixedClock {
    #[must_use]
    pub fn at(unix_secs: i64) -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(unix_secs)),
        }
    }

    pub fn set(&self, unix_secs: i64) {
        self.secs.store(unix_secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_handles_share_time() {
        let clock = FixedClock::at(1_700_000_000);
        let handle = clock.clone();
        handle.advance(30);
        assert_eq!(clock.now().timestamp(), 1_700_000_030);
        handle.set(5);
        assert_eq!(clock.now().timestamp(), 5);
    }
}
