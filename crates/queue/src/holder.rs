// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single store of enqueued and dequeued buckets.
//!
//! Performs no policy. A given [`EnqueuedBucketId`] lives in at most one of
//! the two collections; every move between them goes through [`BucketQueueHolder::dequeue`].

use bq_core::{BucketId, DequeuedBucket, EnqueuedBucket, EnqueuedBucketId, RequestId, WorkerId};
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct BucketQueueHolder {
    enqueued: Vec<EnqueuedBucket>,
    dequeued: IndexMap<EnqueuedBucketId, DequeuedBucket>,
}

impl BucketQueueHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueued buckets in serving order.
    pub fn enqueued(&self) -> &[EnqueuedBucket] {
        &self.enqueued
    }

    /// Dequeued buckets in the order they were claimed.
    pub fn dequeued(&self) -> impl Iterator<Item = &DequeuedBucket> {
        self.dequeued.values()
    }

    pub fn is_depleted(&self) -> bool {
        self.enqueued.is_empty() && self.dequeued.is_empty()
    }

    /// Insert `buckets` (keeping their order) starting at `position`,
    /// clamped to the end of the queue.
    pub fn insert(&mut self, buckets: Vec<EnqueuedBucket>, position: usize) {
        let at = position.min(self.enqueued.len());
        self.enqueued.splice(at..at, buckets);
    }

    pub fn remove_enqueued(&mut self, unique_id: &EnqueuedBucketId) -> Option<EnqueuedBucket> {
        let index = self.enqueued.iter().position(|b| &b.unique_id == unique_id)?;
        Some(self.enqueued.remove(index))
    }

    /// Move an enqueued bucket to the dequeued set, bound to `worker_id`.
    pub fn dequeue(
        &mut self,
        unique_id: &EnqueuedBucketId,
        worker_id: &WorkerId,
        request_id: Option<RequestId>,
    ) -> Option<DequeuedBucket> {
        let enqueued_bucket = self.remove_enqueued(unique_id)?;
        let dequeued =
            DequeuedBucket { enqueued_bucket, worker_id: worker_id.clone(), request_id };
        self.dequeued.insert(dequeued.unique_id().clone(), dequeued.clone());
        Some(dequeued)
    }

    pub fn remove_dequeued(&mut self, unique_id: &EnqueuedBucketId) -> Option<DequeuedBucket> {
        self.dequeued.shift_remove(unique_id)
    }

    /// Earliest-claimed dequeued bucket with `bucket_id` held by `worker_id`.
    pub fn find_dequeued(
        &self,
        bucket_id: &BucketId,
        worker_id: &WorkerId,
    ) -> Option<&DequeuedBucket> {
        self.dequeued.values().find(|d| d.bucket_id() == bucket_id && &d.worker_id == worker_id)
    }

    pub fn find_dequeued_by_request(
        &self,
        worker_id: &WorkerId,
        request_id: &RequestId,
    ) -> Option<&DequeuedBucket> {
        self.dequeued
            .values()
            .find(|d| &d.worker_id == worker_id && d.request_id.as_ref() == Some(request_id))
    }

    pub fn enqueued_test_count(&self) -> usize {
        self.enqueued.iter().map(|b| b.bucket.test_entries().len()).sum()
    }

    pub fn dequeued_test_count(&self) -> usize {
        self.dequeued.values().map(|b| b.bucket().test_entries().len()).sum()
    }
}

#[cfg(test)]
#[path = "holder_tests.rs"]
mod tests;
