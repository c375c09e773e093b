// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idle tracking for automatic termination.

use std::sync::Arc;
use std::time::Duration;

use bq_core::Clock;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::AutomaticTermination;

/// Time of the last request that proved the job is progressing.
#[derive(Clone)]
pub struct ActivityTracker<C: Clock> {
    clock: C,
    last_activity_ms: Arc<Mutex<u64>>,
    termination: AutomaticTermination,
}

impl<C: Clock> ActivityTracker<C> {
    /// Starts counting idle time from now.
    pub fn new(clock: C, termination: AutomaticTermination) -> Self {
        let now = clock.epoch_ms();
        Self { clock, last_activity_ms: Arc::new(Mutex::new(now)), termination }
    }

    pub fn record_activity(&self) {
        *self.last_activity_ms.lock() = self.clock.epoch_ms();
    }

    pub fn idle_for(&self) -> Duration {
        Duration::from_millis(self.clock.ms_since(*self.last_activity_ms.lock()))
    }

    pub fn should_terminate(&self) -> bool {
        match self.termination.idle_limit() {
            Some(limit) => self.idle_for() >= limit,
            None => false,
        }
    }

    /// Cancel `shutdown` once the idle limit passes. Checks every `check_interval`.
    pub fn spawn_watch(
        self,
        check_interval: Duration,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if self.termination.idle_limit().is_none() {
                return;
            }
            let mut interval = tokio::time::interval(check_interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = interval.tick() => {
                        if self.should_terminate() {
                            info!(idle_secs = self.idle_for().as_secs(), "queue idle, terminating");
                            shutdown.cancel();
                            return;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
