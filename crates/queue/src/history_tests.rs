// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bq_core::test_support::{bucket, bucket_with_retries, test_entry, testing_result};
use bq_core::{EnqueuedBucketId, TestRunResult};

fn w(id: &str) -> WorkerId {
    WorkerId::new(id)
}

fn enqueued(bucket: Bucket, id: &str) -> EnqueuedBucket {
    EnqueuedBucket::new(bucket, 0, EnqueuedBucketId::from_string(id))
}

fn record(tracker: &mut TestHistoryTrackerImpl, bucket: &Bucket, method: &str, worker: &str, ok: bool) {
    tracker.storage.register_attempt(TestEntryHistoryId::new(&test_entry(method), bucket), &w(worker), ok);
}

fn methods(result: &TestingResult) -> Vec<String> {
    result.unfiltered_results.iter().map(|r| r.test_entry.test_name.method_name.clone()).collect()
}

#[test]
fn failing_on_worker_tracks_most_recent_attempt() {
    let mut history = TestEntryHistory::default();
    assert!(!history.is_failing_on_worker(&w("1")));
    history.attempts.push(TestAttempt { worker_id: w("1"), succeeded: false });
    history.attempts.push(TestAttempt { worker_id: w("2"), succeeded: true });
    assert!(history.is_failing_on_worker(&w("1")));
    assert!(!history.is_failing_on_worker(&w("2")));
    history.attempts.push(TestAttempt { worker_id: w("1"), succeeded: true });
    assert!(!history.is_failing_on_worker(&w("1")));
    assert_eq!(history.attempts_on_worker(&w("1")), 2);
}

#[test]
fn bucket_with_failing_entry_is_not_served_to_that_worker() {
    let two = bucket(&["first", "second"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    record(&mut tracker, &two, "first", "1", true);
    record(&mut tracker, &two, "second", "1", false);

    let queue = [enqueued(two, "e1")];
    assert!(tracker.bucket_to_dequeue(&w("1"), &queue, || vec![w("1"), w("2")]).is_none());
    assert!(tracker.bucket_to_dequeue(&w("2"), &queue, || vec![w("1"), w("2")]).is_some());
}

#[test]
fn non_failing_bucket_behind_failing_one_is_served() {
    let two = bucket(&["first", "second"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    record(&mut tracker, &two, "first", "1", false);

    let queue = [enqueued(two, "e1"), enqueued(bucket(&["other"]), "e2")];
    let chosen = tracker.bucket_to_dequeue(&w("1"), &queue, || vec![w("1"), w("2")]).unwrap();
    assert_eq!(chosen.unique_id, "e2");
}

#[test]
fn bucket_failing_on_every_working_worker_is_served() {
    let one = bucket(&["first"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    record(&mut tracker, &one, "first", "1", false);
    record(&mut tracker, &one, "first", "2", false);

    let queue = [enqueued(one, "e1")];
    let chosen = tracker.bucket_to_dequeue(&w("1"), &queue, || vec![w("1"), w("2")]);
    assert_eq!(chosen.map(|b| b.unique_id.as_str()), Some("e1"));

    let three_workers = tracker.bucket_to_dequeue(&w("1"), &queue, || vec![w("1"), w("2"), w("3")]);
    assert!(three_workers.is_none());
}

#[test]
fn working_workers_are_only_computed_when_needed() {
    let tracker = TestHistoryTrackerImpl::new();
    let queue = [enqueued(bucket(&["a"]), "e1")];
    let chosen = tracker.bucket_to_dequeue(&w("1"), &queue, || unreachable!());
    assert!(chosen.is_some());
}

#[test]
fn history_is_keyed_by_configuration() {
    let no_retries = bucket(&["first"]);
    let with_retries = bucket_with_retries(&["first"], 2);
    let mut tracker = TestHistoryTrackerImpl::new();
    record(&mut tracker, &no_retries, "first", "1", false);

    let queue = [enqueued(with_retries, "e1")];
    assert!(tracker.bucket_to_dequeue(&w("1"), &queue, Vec::new).is_some());
}

#[test]
fn accept_retries_failure_with_attempts_left() {
    let b = bucket_with_retries(&["a", "b"], 1);
    let mut tracker = TestHistoryTrackerImpl::new();

    let accepted = tracker.accept(testing_result(&[("a", false), ("b", true)]), &b, &w("1"));
    assert_eq!(methods(&accepted.testing_result), vec!["b"]);
    assert_eq!(accepted.buckets_to_reenqueue, vec![b.with_test_entries(vec![test_entry("a")])]);

    let retry = &accepted.buckets_to_reenqueue[0];
    let second = tracker.accept(testing_result(&[("a", false)]), retry, &w("2"));
    assert_eq!(methods(&second.testing_result), vec!["a"]);
    assert!(!second.testing_result.unfiltered_results[0].succeeded());
    assert!(second.buckets_to_reenqueue.is_empty());
}

#[test]
fn accept_finalizes_failure_without_retries() {
    let b = bucket(&["a"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    let accepted = tracker.accept(testing_result(&[("a", false)]), &b, &w("1"));
    assert_eq!(methods(&accepted.testing_result), vec!["a"]);
    assert!(accepted.buckets_to_reenqueue.is_empty());
}

#[test]
fn accept_treats_missing_entries_as_lost() {
    let b = bucket_with_retries(&["a", "b"], 1);
    let mut tracker = TestHistoryTrackerImpl::new();
    let accepted = tracker.accept(testing_result(&[("a", true)]), &b, &w("1"));
    assert_eq!(methods(&accepted.testing_result), vec!["a"]);
    assert_eq!(accepted.buckets_to_reenqueue, vec![b.with_test_entries(vec![test_entry("b")])]);

    let history = tracker.storage().history(&TestEntryHistoryId::new(&test_entry("b"), &b)).unwrap();
    assert_eq!(history.attempts(), &[TestAttempt { worker_id: w("1"), succeeded: false }]);
}

#[test]
fn accept_finalizes_lost_entries_without_retries() {
    let b = bucket(&["a"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    let accepted = tracker.accept(testing_result(&[]), &b, &w("1"));
    assert_eq!(accepted.testing_result.unfiltered_results, vec![TestEntryResult::lost(test_entry("a"))]);
}

#[test]
fn accept_drops_entries_not_in_bucket() {
    let b = bucket(&["a"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    let accepted = tracker.accept(testing_result(&[("a", true), ("intruder", true)]), &b, &w("1"));
    assert_eq!(methods(&accepted.testing_result), vec!["a"]);
    assert!(tracker
        .storage()
        .history(&TestEntryHistoryId::new(&test_entry("intruder"), &b))
        .is_none());
}

#[test]
fn duplicate_entries_each_consume_one_result() {
    let b = bucket(&["a", "a"]);
    let mut tracker = TestHistoryTrackerImpl::new();
    let accepted = tracker.accept(testing_result(&[("a", true)]), &b, &w("1"));
    assert_eq!(accepted.testing_result.unfiltered_results.len(), 2);
    assert!(accepted.testing_result.unfiltered_results[0].succeeded());
    assert!(accepted.testing_result.unfiltered_results[1].is_lost());
}

#[test]
fn any_successful_run_counts_as_success() {
    let b = bucket_with_retries(&["a"], 3);
    let mut tracker = TestHistoryTrackerImpl::new();
    let mut result = testing_result(&[("a", false)]);
    result.unfiltered_results[0].test_run_results.push(TestRunResult::success("host"));
    let accepted = tracker.accept(result, &b, &w("1"));
    assert!(accepted.buckets_to_reenqueue.is_empty());
    assert!(accepted.testing_result.unfiltered_results[0].succeeded());
}

#[test]
fn buckets_to_retry_matches_accept_without_recording() {
    let b = bucket_with_retries(&["a", "b", "c"], 1);
    let mut tracker = TestHistoryTrackerImpl::new();
    let result = testing_result(&[("a", false), ("b", true)]);

    let planned = tracker.buckets_to_retry(&result, &b);
    assert!(tracker.storage().history(&TestEntryHistoryId::new(&test_entry("a"), &b)).is_none());

    let accepted = tracker.accept(result, &b, &w("1"));
    assert_eq!(planned, accepted.buckets_to_reenqueue);
    assert_eq!(planned.len(), 2);
}

#[test]
fn buckets_to_retry_is_empty_when_everything_passed() {
    let b = bucket_with_retries(&["a"], 2);
    let tracker = TestHistoryTrackerImpl::new();
    assert!(tracker.buckets_to_retry(&testing_result(&[("a", true)]), &b).is_empty());
}

#[test]
fn buckets_to_retry_counts_recorded_attempts() {
    let b = bucket_with_retries(&["a"], 1);
    let mut tracker = TestHistoryTrackerImpl::new();
    let failing = testing_result(&[("a", false)]);
    assert_eq!(tracker.buckets_to_retry(&failing, &b).len(), 1);

    record(&mut tracker, &b, "a", "1", false);
    assert!(tracker.buckets_to_retry(&failing, &b).is_empty());
}

#[test]
fn repeated_entry_failures_count_as_separate_attempts() {
    let b = bucket_with_retries(&["a", "a"], 1);
    let mut tracker = TestHistoryTrackerImpl::new();
    let result = testing_result(&[("a", false), ("a", false)]);

    let planned = tracker.buckets_to_retry(&result, &b);
    let accepted = tracker.accept(result, &b, &w("1"));
    assert_eq!(planned, accepted.buckets_to_reenqueue);
    assert_eq!(accepted.buckets_to_reenqueue.len(), 1);
    assert_eq!(accepted.testing_result.unfiltered_results.len(), 1);
}
