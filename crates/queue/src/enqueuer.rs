// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admitting buckets to the holder.

use bq_core::{Bucket, Clock, ConfiguredTestEntry, EnqueuedBucket, EnqueuedBucketId, IdGen};

use crate::aliveness::WorkerAlivenessProvider;
use crate::error::QueueError;
use crate::generator::generate_buckets;
use crate::history::TestHistoryTracker;
use crate::results::ResultsCollector;
use crate::splitter::{BucketSplitInfo, SplitStrategy};
use crate::state::QueueState;

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    /// Admit every bucket, or none of them if any carries requirements that
    /// no registered, enabled worker currently satisfies.
    pub fn enqueue(&mut self, buckets: Vec<Bucket>) -> Result<Vec<EnqueuedBucket>, QueueError> {
        self.validate_requirements(&buckets)?;
        Ok(self.admit(buckets))
    }

    /// Group, split and enqueue configured test entries as one batch.
    pub fn schedule_tests(
        &mut self,
        entries: &[ConfiguredTestEntry],
        strategy: SplitStrategy,
        info: &BucketSplitInfo,
    ) -> Result<Vec<EnqueuedBucket>, QueueError> {
        let buckets = generate_buckets(entries, strategy, info);
        tracing::info!(
            tests = entries.len(),
            buckets = buckets.len(),
            strategy = %strategy,
            "scheduling tests"
        );
        self.enqueue(buckets)
    }

    pub(crate) fn validate_requirements(&self, buckets: &[Bucket]) -> Result<(), QueueError> {
        let with_requirements: Vec<&Bucket> =
            buckets.iter().filter(|b| !b.worker_capability_requirements().is_empty()).collect();
        if with_requirements.is_empty() {
            return Ok(());
        }

        let candidates: Vec<_> = self
            .aliveness
            .workers_aliveness()
            .into_iter()
            .filter(|(_, a)| a.registered() && !a.disabled)
            .map(|(id, _)| id)
            .collect();
        let unsatisfied: Vec<_> = with_requirements
            .into_iter()
            .filter(|b| {
                !candidates
                    .iter()
                    .any(|w| self.capabilities.satisfies(w, b.worker_capability_requirements()))
            })
            .map(|b| b.bucket_id().clone())
            .collect();

        if unsatisfied.is_empty() {
            Ok(())
        } else {
            tracing::warn!(buckets = unsatisfied.len(), "no worker satisfies bucket requirements");
            Err(QueueError::NoWorkerSatisfiesRequirements { bucket_ids: unsatisfied })
        }
    }

    pub(crate) fn admit(&mut self, buckets: Vec<Bucket>) -> Vec<EnqueuedBucket> {
        if buckets.is_empty() {
            return Vec::new();
        }
        let now = self.clock.epoch_ms();
        let enqueued: Vec<EnqueuedBucket> = buckets
            .into_iter()
            .map(|bucket| {
                let unique_id = EnqueuedBucketId::from_string(format!(
                    "{}{}",
                    EnqueuedBucketId::PREFIX,
                    self.id_gen.next()
                ));
                EnqueuedBucket::new(bucket, now, unique_id)
            })
            .collect();
        let position = self.config.enqueue_position.index(self.holder.enqueued().len());
        for bucket in &enqueued {
            tracing::debug!(
                bucket_id = %bucket.bucket_id(),
                unique_id = %bucket.unique_id,
                tests = bucket.bucket.test_entries().len(),
                "enqueued bucket"
            );
        }
        self.holder.insert(enqueued.clone(), position);
        enqueued
    }
}

#[cfg(test)]
#[path = "enqueuer_tests.rs"]
mod tests;
