// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciling worker results against dequeued buckets.

use bq_core::{BucketId, Clock, DequeuedBucket, IdGen, TestingResult, WorkerId};

use crate::aliveness::WorkerAlivenessProvider;
use crate::error::QueueError;
use crate::history::TestHistoryTracker;
use crate::results::ResultsCollector;
use crate::state::QueueState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketQueueAcceptResult {
    pub dequeued_bucket: DequeuedBucket,
    /// Finalized part of the submitted result, as handed to the collector.
    pub testing_result_to_collect: TestingResult,
    /// Number of single-entry buckets enqueued for retry.
    pub reenqueued_bucket_count: usize,
}

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    /// Either the whole result is reconciled or nothing changes.
    pub fn accept(
        &mut self,
        bucket_id: &BucketId,
        testing_result: TestingResult,
        worker_id: &WorkerId,
    ) -> Result<BucketQueueAcceptResult, QueueError> {
        let Some(dequeued) = self.holder.find_dequeued(bucket_id, worker_id) else {
            tracing::warn!(
                worker_id = %worker_id,
                bucket_id = %bucket_id,
                "result for bucket that is not dequeued by worker"
            );
            return Err(QueueError::NoSuchDequeuedBucket {
                bucket_id: bucket_id.clone(),
                worker_id: worker_id.clone(),
            });
        };

        // Retries must be placeable before any attempt is recorded.
        let retries = self.history.buckets_to_retry(&testing_result, dequeued.bucket());
        self.validate_requirements(&retries)?;

        let unique_id = dequeued.unique_id().clone();
        let Some(dequeued) = self.holder.remove_dequeued(&unique_id) else {
            return Err(QueueError::NoSuchDequeuedBucket {
                bucket_id: bucket_id.clone(),
                worker_id: worker_id.clone(),
            });
        };

        let accepted = self.history.accept(testing_result, dequeued.bucket(), worker_id);
        let reenqueued = self.admit(accepted.buckets_to_reenqueue);
        self.results.append(accepted.testing_result.clone());

        tracing::debug!(
            worker_id = %worker_id,
            bucket_id = %bucket_id,
            finalized = accepted.testing_result.unfiltered_results.len(),
            retries = reenqueued.len(),
            "accepted bucket result"
        );

        Ok(BucketQueueAcceptResult {
            dequeued_bucket: dequeued,
            testing_result_to_collect: accepted.testing_result,
            reenqueued_bucket_count: reenqueued.len(),
        })
    }
}

#[cfg(test)]
#[path = "accept_tests.rs"]
mod tests;
