// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reclaiming buckets whose worker can no longer be trusted to finish them.

use bq_core::{Clock, DequeuedBucket, IdGen, StuckBucket, StuckReason, WorkerAliveness};

use crate::aliveness::WorkerAlivenessProvider;
use crate::history::TestHistoryTracker;
use crate::results::ResultsCollector;
use crate::state::QueueState;

/// Why `dequeued` is stuck, or `None` if its worker still owns it.
pub fn stuck_reason(dequeued: &DequeuedBucket, aliveness: &WorkerAliveness) -> Option<StuckReason> {
    if aliveness.disabled {
        Some(StuckReason::WorkerIsBlocked)
    } else if aliveness.is_silent() || !aliveness.registered() {
        Some(StuckReason::WorkerIsSilent)
    } else if !aliveness.bucket_ids_being_processed.contains(dequeued.bucket_id()) {
        Some(StuckReason::BucketLost)
    } else {
        None
    }
}

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    /// Move every stuck bucket back to the enqueued set as single-entry
    /// buckets. A bucket whose fragments cannot be enqueued stays dequeued
    /// for the next pass.
    pub fn reenqueue_stuck_buckets(&mut self) -> Vec<StuckBucket> {
        let workers = self.aliveness.workers_aliveness();
        let stuck: Vec<StuckBucket> = self
            .holder
            .dequeued()
            .filter_map(|dequeued| {
                let aliveness = workers
                    .get(&dequeued.worker_id)
                    .cloned()
                    .unwrap_or_else(WorkerAliveness::not_registered);
                stuck_reason(dequeued, &aliveness)
                    .map(|reason| StuckBucket { bucket: dequeued.clone(), reason })
            })
            .collect();

        let mut reclaimed = Vec::with_capacity(stuck.len());
        for stuck_bucket in stuck {
            let fragments = stuck_bucket.bucket.bucket().split_into_single_entry_buckets();
            if let Err(e) = self.validate_requirements(&fragments) {
                tracing::error!(
                    worker_id = %stuck_bucket.bucket.worker_id,
                    bucket_id = %stuck_bucket.bucket.bucket_id(),
                    reason = %stuck_bucket.reason,
                    error = %e,
                    "failed to reenqueue stuck bucket"
                );
                continue;
            }
            self.holder.remove_dequeued(stuck_bucket.bucket.unique_id());
            let enqueued = self.admit(fragments);
            tracing::warn!(
                worker_id = %stuck_bucket.bucket.worker_id,
                bucket_id = %stuck_bucket.bucket.bucket_id(),
                reason = %stuck_bucket.reason,
                fragments = enqueued.len(),
                "reenqueued stuck bucket"
            );
            reclaimed.push(stuck_bucket);
        }
        reclaimed
    }
}

#[cfg(test)]
#[path = "stuck_tests.rs"]
mod tests;
