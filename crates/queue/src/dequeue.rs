// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handing buckets to polling workers.

use std::collections::BTreeSet;

use bq_core::{Clock, DequeuedBucket, IdGen, RequestId, WorkerCapability, WorkerId};

use crate::aliveness::WorkerAlivenessProvider;
use crate::error::QueueError;
use crate::history::TestHistoryTracker;
use crate::results::ResultsCollector;
use crate::state::QueueState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DequeueResult {
    Dequeued(DequeuedBucket),
    /// Nothing enqueued and nothing in flight.
    QueueIsEmpty,
    /// Nothing this worker may take right now; poll again later.
    CheckAgainLater,
}

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    pub fn dequeue(
        &mut self,
        worker_id: &WorkerId,
        request_id: Option<RequestId>,
        capabilities: BTreeSet<WorkerCapability>,
    ) -> Result<DequeueResult, QueueError> {
        let aliveness = self.aliveness.aliveness(worker_id);
        if !aliveness.registered() {
            return Err(QueueError::WorkerNotRegistered(worker_id.clone()));
        }
        if aliveness.disabled {
            return Err(QueueError::WorkerBlocked(worker_id.clone()));
        }

        self.aliveness.worker_is_alive(worker_id);
        self.capabilities.set(worker_id, capabilities);

        if let Some(request_id) = &request_id {
            if let Some(previous) = self.holder.find_dequeued_by_request(worker_id, request_id) {
                tracing::debug!(
                    worker_id = %worker_id,
                    request_id = %request_id,
                    bucket_id = %previous.bucket_id(),
                    "repeated dequeue request, returning same bucket"
                );
                return Ok(DequeueResult::Dequeued(previous.clone()));
            }
        }

        if !aliveness.may_be_utilized() {
            return Ok(DequeueResult::CheckAgainLater);
        }
        if self.holder.is_depleted() {
            return Ok(DequeueResult::QueueIsEmpty);
        }

        let aliveness_provider = &self.aliveness;
        let Some(candidate) = self.history.bucket_to_dequeue(
            worker_id,
            self.holder.enqueued(),
            || aliveness_provider.worker_ids_in_working_condition(),
        ) else {
            return Ok(DequeueResult::CheckAgainLater);
        };

        if !self.capabilities.satisfies(worker_id, candidate.bucket.worker_capability_requirements()) {
            tracing::debug!(
                worker_id = %worker_id,
                bucket_id = %candidate.bucket_id(),
                "worker capabilities do not meet bucket requirements"
            );
            return Ok(DequeueResult::CheckAgainLater);
        }

        let unique_id = candidate.unique_id.clone();
        let Some(dequeued) = self.holder.dequeue(&unique_id, worker_id, request_id) else {
            return Ok(DequeueResult::CheckAgainLater);
        };
        self.aliveness.did_dequeue_bucket(worker_id, dequeued.bucket_id());
        tracing::debug!(
            worker_id = %worker_id,
            bucket_id = %dequeued.bucket_id(),
            unique_id = %dequeued.unique_id(),
            tests = dequeued.bucket().test_entries().len(),
            "dequeued bucket"
        );
        Ok(DequeueResult::Dequeued(dequeued))
    }
}

#[cfg(test)]
#[path = "dequeue_tests.rs"]
mod tests;
