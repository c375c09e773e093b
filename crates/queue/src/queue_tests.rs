// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::thread;

use super::*;
use bq_core::test_support::{bucket, testing_result_for};
use bq_core::FakeClock;

use crate::test_support::{test_queue, worker};

#[test]
fn clones_share_one_queue() {
    let clock = FakeClock::new();
    let queue = test_queue(&clock, &["w1"]);
    let other = queue.clone();
    other.enqueue(vec![bucket(&["a"])]).unwrap();
    assert_eq!(queue.running_queue_state().enqueued_bucket_count, 1);
    assert!(!queue.is_depleted());
}

#[test]
fn concurrent_workers_drain_every_bucket_once() {
    let clock = FakeClock::new();
    let workers = ["w1", "w2", "w3", "w4"];
    let queue = test_queue(&clock, &workers);
    let methods: Vec<String> = (0..40).map(|i| format!("t{i}")).collect();
    let buckets = methods.iter().map(|m| bucket(&[m.as_str()])).collect();
    queue.enqueue(buckets).unwrap();

    let handles: Vec<_> = workers
        .iter()
        .map(|id| {
            let queue = queue.clone();
            let worker_id = worker(id);
            thread::spawn(move || {
                let mut done = 0;
                loop {
                    match queue.dequeue(&worker_id, None, BTreeSet::new()).unwrap() {
                        DequeueResult::Dequeued(d) => {
                            let result = testing_result_for(d.bucket(), true);
                            queue.accept(d.bucket_id(), result, &worker_id).unwrap();
                            done += 1;
                        }
                        DequeueResult::QueueIsEmpty => return done,
                        DequeueResult::CheckAgainLater => thread::yield_now(),
                    }
                }
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 40);
    assert!(queue.is_depleted());
    assert_eq!(queue.with_state(|s| s.results().finalized_test_count()), 40);
    assert_eq!(queue.job_results().len(), 40);
}

#[test]
fn default_queue_uses_nanoid_unique_ids() {
    let clock = FakeClock::new();
    let queue = DefaultBucketQueue::with_workers(
        clock,
        [worker("w1")],
        Duration::from_secs(60),
        QueueConfig::default(),
    );
    let enqueued = queue.enqueue(vec![bucket(&["a"])]).unwrap();
    assert!(enqueued[0].unique_id.starts_with("enq-"));
    assert_eq!(enqueued[0].unique_id.len(), "enq-".len() + 19);
}
