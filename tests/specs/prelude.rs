// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by every scenario.

pub use std::collections::BTreeSet;
pub use std::time::Duration;

pub use bq_core::test_support::*;
pub use bq_core::{
    Bucket, DequeuedBucket, FakeClock, StuckReason, TestingResult, WorkerCapability,
};
pub use bq_queue::test_support::{test_queue, worker, TestBucketQueue, MAX_SILENCE};
pub use bq_queue::{DequeueResult, QueueError};

/// Dequeue for `worker_id` and insist a bucket comes back.
pub fn take(queue: &TestBucketQueue, worker_id: &str) -> DequeuedBucket {
    take_with(queue, worker_id, BTreeSet::new())
}

pub fn take_with(
    queue: &TestBucketQueue,
    worker_id: &str,
    caps: BTreeSet<WorkerCapability>,
) -> DequeuedBucket {
    match queue.dequeue(&worker(worker_id), None, caps) {
        Ok(DequeueResult::Dequeued(d)) => d,
        other => panic!("expected a bucket for {worker_id}, got {other:?}"),
    }
}

/// Method names of every test entry currently waiting in the queue.
pub fn enqueued_methods(queue: &TestBucketQueue) -> Vec<String> {
    queue.with_state(|state| {
        state
            .holder()
            .enqueued()
            .iter()
            .flat_map(|b| b.bucket.test_entries().iter().map(|e| e.test_name.method_name.clone()))
            .collect()
    })
}

pub fn methods(bucket: &Bucket) -> Vec<&str> {
    bucket.test_entries().iter().map(|e| e.test_name.method_name.as_str()).collect()
}

/// `(method, succeeded)` for every collected result entry, in order.
pub fn collected(queue: &TestBucketQueue) -> Vec<(String, bool)> {
    queue
        .job_results()
        .iter()
        .flat_map(|r: &TestingResult| {
            r.unfiltered_results
                .iter()
                .map(|e| (e.test_entry.test_name.method_name.clone(), e.succeeded()))
                .collect::<Vec<_>>()
        })
        .collect()
}
