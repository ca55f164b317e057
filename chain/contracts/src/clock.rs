//! Clock oracle
//!
//! The bond never reads time on its own; callers pass a `Clock`. Production
//! code uses the wall clock, tests and the devnet use a `ManualClock` that
//! only moves forward when told to.

use bond_types::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of the current time in Unix seconds.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp()
    }
}

/// Deterministic, monotonic clock.
///
/// Clones share the same underlying time, so a test can hold one handle
/// and advance it while another handle is passed into the code under test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Timestamp", into = "Timestamp")]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock reading `timestamp`.
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(timestamp)),
        }
    }

    /// Move the clock forward by `seconds`. Returns the new time.
    pub fn advance(&self, seconds: u64) -> Timestamp {
        let delta = i64::try_from(seconds).unwrap_or(i64::MAX);
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(delta))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(delta)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl From<Timestamp> for ManualClock {
    fn from(timestamp: Timestamp) -> Self {
        Self::at(timestamp)
    }
}

impl From<ManualClock> for Timestamp {
    fn from(clock: ManualClock) -> Self {
        clock.now()
    }
}
