// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stuck bucket specs
//!
//! Buckets held by workers that can no longer finish them return to the
//! queue as single-test buckets.

use crate::prelude::*;
use similar_asserts::assert_eq;

fn reclaim_one(queue: &TestBucketQueue) -> StuckReason {
    let stuck = queue.reenqueue_stuck_buckets();
    assert_eq!(stuck.len(), 1, "expected exactly one stuck bucket");
    stuck[0].reason
}

fn assert_split_back(queue: &TestBucketQueue, expected: &[&str]) {
    queue.with_state(|s| {
        assert_eq!(s.holder().enqueued().len(), expected.len());
        assert!(s.holder().enqueued().iter().all(|b| b.bucket.test_entries().len() == 1));
        assert_eq!(s.holder().dequeued().count(), 0);
    });
    assert_eq!(enqueued_methods(queue), expected.iter().map(|m| m.to_string()).collect::<Vec<_>>());
}

#[test]
fn silent_worker_is_reclaimed() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A", "B", "C"])]).unwrap();
    take(&queue, "worker1");

    clock.advance(MAX_SILENCE - Duration::from_secs(1));
    assert!(queue.reenqueue_stuck_buckets().is_empty());

    clock.advance(Duration::from_secs(2));
    assert_eq!(reclaim_one(&queue), StuckReason::WorkerIsSilent);
    assert_split_back(&queue, &["A", "B", "C"]);
}

#[test]
fn disabled_worker_is_reclaimed_as_blocked() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A", "B"])]).unwrap();
    take(&queue, "worker1");
    queue.disable_worker(&worker("worker1")).unwrap();

    assert_eq!(reclaim_one(&queue), StuckReason::WorkerIsBlocked);
    assert_split_back(&queue, &["A", "B"]);
}

#[test]
fn forgotten_bucket_is_reclaimed_as_lost() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A", "B"])]).unwrap();
    take(&queue, "worker1");

    clock.advance(MAX_SILENCE + Duration::from_secs(1));
    queue.report_alive(&worker("worker1"), BTreeSet::new()).unwrap();

    assert_eq!(reclaim_one(&queue), StuckReason::BucketLost);
    assert_split_back(&queue, &["A", "B"]);
}

#[test]
fn reported_bucket_is_not_stuck() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A"])]).unwrap();
    let d = take(&queue, "worker1");

    clock.advance(MAX_SILENCE + Duration::from_secs(1));
    queue.report_alive(&worker("worker1"), BTreeSet::from([d.bucket_id().clone()])).unwrap();

    assert!(queue.reenqueue_stuck_buckets().is_empty());
}
