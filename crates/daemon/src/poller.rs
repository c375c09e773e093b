// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background reclamation of stuck buckets.

use std::time::Duration;

use bq_core::{Clock, IdGen};
use bq_queue::{BucketQueue, ResultsCollector, TestHistoryTracker, WorkerAlivenessProvider};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run the stuck bucket reenqueuer every `interval` until `shutdown` fires.
///
/// Each pass takes the queue lock once, the same lock request handlers use.
pub fn spawn_stuck_bucket_poller<A, H, R, C, G>(
    queue: BucketQueue<A, H, R, C, G>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("stuck bucket poller stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let stuck = queue.reenqueue_stuck_buckets();
                    if !stuck.is_empty() {
                        info!(count = stuck.len(), "reclaimed stuck buckets");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
