// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability specs
//!
//! Buckets only reach workers whose advertised capabilities satisfy them.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn gpu_bucket_rejected_when_no_worker_has_gpu() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    take_with_empty_queue(&queue, "worker1", capabilities(&[("os", "14")]));

    let result = queue.enqueue(vec![bucket_requiring(&["render"], &[gpu_required()])]);

    assert!(matches!(result, Err(QueueError::NoWorkerSatisfiesRequirements { .. })));
    assert_eq!(queue.running_queue_state().enqueued_bucket_count, 0);
}

#[test]
fn gpu_bucket_goes_to_gpu_worker() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["cpu", "gpu"]);
    take_with_empty_queue(&queue, "gpu", capabilities(&[("gpu", "1")]));
    queue.enqueue(vec![bucket_requiring(&["render"], &[gpu_required()])]).unwrap();

    let cpu = queue.dequeue(&worker("cpu"), None, BTreeSet::new()).unwrap();
    assert!(!matches!(cpu, DequeueResult::Dequeued(_)));

    let d = take_with(&queue, "gpu", capabilities(&[("gpu", "1")]));
    assert_eq!(methods(d.bucket()), vec!["render"]);
}

/// Advertise capabilities on an empty queue.
fn take_with_empty_queue(
    queue: &TestBucketQueue,
    worker_id: &str,
    caps: BTreeSet<WorkerCapability>,
) {
    let result = queue.dequeue(&worker(worker_id), None, caps).unwrap();
    assert_eq!(result, DequeueResult::QueueIsEmpty);
}
