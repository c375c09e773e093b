// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Queue timestamps (enqueue time, last heartbeat) are wall-clock epoch
//! milliseconds; idle measurements use the monotonic `Instant`.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;

    /// Milliseconds elapsed since `epoch_ms`, saturating at zero.
    fn ms_since(&self, epoch_ms: u64) -> u64 {
        self.epoch_ms().saturating_sub(epoch_ms)
    }
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

/// Fake clock for testing with controllable time.
///
/// Clones share the same underlying time, so a clock handed to the queue can
/// be advanced from the test body.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeTime>>,
}

struct FakeTime {
    instant: Instant,
    epoch_ms: u64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at_epoch_ms(1_000_000)
    }

    pub fn at_epoch_ms(epoch_ms: u64) -> Self {
        Self { inner: Arc::new(Mutex::new(FakeTime { instant: Instant::now(), epoch_ms })) }
    }

    /// Advance both the monotonic and wall-clock readings.
    pub fn advance(&self, duration: Duration) {
        let mut time = self.inner.lock();
        time.instant += duration;
        time.epoch_ms += duration.as_millis() as u64;
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().instant
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
