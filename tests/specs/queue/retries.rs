// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry specs
//!
//! A failing test is retried until it has run R + 1 times.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn one_retry_then_final_failure() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1", "worker2"]);
    queue.enqueue(vec![bucket_with_retries(&["A", "B"], 1)]).unwrap();

    let first = take(&queue, "worker1");
    let accepted = queue
        .accept(first.bucket_id(), testing_result(&[("A", false), ("B", true)]), &worker("worker1"))
        .unwrap();

    assert_eq!(collected(&queue), vec![("B".to_string(), true)]);
    assert_eq!(accepted.reenqueued_bucket_count, 1);
    assert_eq!(enqueued_methods(&queue), vec!["A"]);

    let retry = take(&queue, "worker2");
    assert_eq!(methods(retry.bucket()), vec!["A"]);
    let accepted = queue
        .accept(retry.bucket_id(), testing_result(&[("A", false)]), &worker("worker2"))
        .unwrap();

    assert_eq!(accepted.reenqueued_bucket_count, 0);
    assert_eq!(
        collected(&queue),
        vec![("B".to_string(), true), ("A".to_string(), false)]
    );
    assert!(queue.is_depleted());
}

#[test]
fn no_retries_finalizes_on_first_failure() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket(&["A"])]).unwrap();

    let d = take(&queue, "worker1");
    queue.accept(d.bucket_id(), testing_result(&[("A", false)]), &worker("worker1")).unwrap();

    assert_eq!(collected(&queue), vec![("A".to_string(), false)]);
    assert!(queue.is_depleted());
}

#[test]
fn test_failing_everywhere_uses_every_attempt() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1"]);
    queue.enqueue(vec![bucket_with_retries(&["A"], 3)]).unwrap();

    let mut attempts = 0;
    while !queue.is_depleted() {
        let d = take(&queue, "worker1");
        queue.accept(d.bucket_id(), testing_result(&[("A", false)]), &worker("worker1")).unwrap();
        attempts += 1;
        assert!(attempts <= 4, "retried more than R + 1 times");
    }

    assert_eq!(attempts, 4);
    assert_eq!(collected(&queue), vec![("A".to_string(), false)]);
}

#[test]
fn submission_for_unknown_bucket_changes_nothing() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["worker1", "worker2"]);
    queue.enqueue(vec![bucket(&["A"])]).unwrap();
    let d = take(&queue, "worker1");
    let before = queue.running_queue_state();

    let result = queue.accept(d.bucket_id(), testing_result(&[("A", true)]), &worker("worker2"));

    assert!(matches!(result, Err(QueueError::NoSuchDequeuedBucket { .. })));
    assert_eq!(queue.running_queue_state(), before);
    assert!(collected(&queue).is_empty());
}
