// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dequeue specs

use bq_core::RequestId;

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn same_request_id_returns_identical_bucket() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A"]), bucket(&["B"])]).unwrap();
    let request_id = RequestId::from_string("r-1");

    let first = queue.dequeue(&worker("worker1"), Some(request_id.clone()), BTreeSet::new());
    let second = queue.dequeue(&worker("worker1"), Some(request_id), BTreeSet::new());

    assert_eq!(first, second);
    assert_eq!(queue.running_queue_state().dequeued_bucket_count, 1);
}

#[test]
fn failing_pair_is_isolated() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1", "worker2"]);
    queue.enqueue(vec![bucket_with_retries(&["T"], 1)]).unwrap();
    let d = take(&queue, "worker1");
    queue.enqueue(vec![bucket(&["U"])]).unwrap();

    // The retry of T lands at the head, in front of the untried U.
    queue.accept(d.bucket_id(), testing_result(&[("T", false)]), &worker("worker1")).unwrap();
    assert_eq!(enqueued_methods(&queue), vec!["T", "U"]);

    let for_w1 = take(&queue, "worker1");
    assert_eq!(methods(for_w1.bucket()), vec!["U"]);

    let for_w2 = take(&queue, "worker2");
    assert_eq!(methods(for_w2.bucket()), vec!["T"]);
}

#[test]
fn unregistered_worker_cannot_dequeue() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    let result = queue.dequeue(&worker("stranger"), None, BTreeSet::new());
    assert!(result.is_err());
}
