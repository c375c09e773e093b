// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-test attempt history and the retry / eligibility decisions built on it.

use std::collections::HashMap;

use bq_core::{
    Bucket, ConfigurationFingerprint, EnqueuedBucket, TestEntry, TestEntryResult, TestingResult,
    WorkerId,
};

/// A test entry in one execution context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestEntryHistoryId {
    pub test_entry: TestEntry,
    pub fingerprint: ConfigurationFingerprint,
}

impl TestEntryHistoryId {
    pub fn new(test_entry: &TestEntry, bucket: &Bucket) -> Self {
        Self { test_entry: test_entry.clone(), fingerprint: bucket.configuration_fingerprint() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAttempt {
    pub worker_id: WorkerId,
    pub succeeded: bool,
}

/// Append-only list of attempts, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEntryHistory {
    attempts: Vec<TestAttempt>,
}

impl TestEntryHistory {
    pub fn attempts(&self) -> &[TestAttempt] {
        &self.attempts
    }

    pub fn number_of_attempts(&self) -> usize {
        self.attempts.len()
    }

    pub fn attempts_on_worker(&self, worker_id: &WorkerId) -> usize {
        self.attempts.iter().filter(|a| &a.worker_id == worker_id).count()
    }

    /// The most recent attempt on `worker_id` failed.
    pub fn is_failing_on_worker(&self, worker_id: &WorkerId) -> bool {
        self.attempts.iter().rev().find(|a| &a.worker_id == worker_id).is_some_and(|a| !a.succeeded)
    }
}

#[derive(Debug, Default)]
pub struct TestHistoryStorage {
    histories: HashMap<TestEntryHistoryId, TestEntryHistory>,
}

impl TestHistoryStorage {
    pub fn history(&self, id: &TestEntryHistoryId) -> Option<&TestEntryHistory> {
        self.histories.get(id)
    }

    pub fn register_attempt(
        &mut self,
        id: TestEntryHistoryId,
        worker_id: &WorkerId,
        succeeded: bool,
    ) -> &TestEntryHistory {
        let history = self.histories.entry(id).or_default();
        history.attempts.push(TestAttempt { worker_id: worker_id.clone(), succeeded });
        history
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHistoryTrackerAcceptResult {
    /// One single-entry bucket per failed entry that still has attempts left.
    pub buckets_to_reenqueue: Vec<Bucket>,
    /// Succeeded entries plus failures that are final.
    pub testing_result: TestingResult,
}

pub trait TestHistoryTracker: Send + 'static {
    /// First bucket in `queue` the worker may take, or `None` when nothing is
    /// eligible for this worker right now (which is not the same as empty).
    fn bucket_to_dequeue<'q>(
        &self,
        worker_id: &WorkerId,
        queue: &'q [EnqueuedBucket],
        workers_in_working_condition: impl FnOnce() -> Vec<WorkerId>,
    ) -> Option<&'q EnqueuedBucket>;

    /// The single-entry buckets [`accept`](Self::accept) would return for
    /// `result`, without recording anything.
    fn buckets_to_retry(&self, result: &TestingResult, bucket: &Bucket) -> Vec<Bucket>;

    /// Record attempts for `result` run by `worker_id` and split it into the
    /// finalized part and the entries to retry.
    fn accept(
        &mut self,
        result: TestingResult,
        bucket: &Bucket,
        worker_id: &WorkerId,
    ) -> TestHistoryTrackerAcceptResult;
}

#[derive(Debug, Default)]
pub struct TestHistoryTrackerImpl {
    storage: TestHistoryStorage,
}

impl TestHistoryTrackerImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage(&self) -> &TestHistoryStorage {
        &self.storage
    }

    fn bucket_has_entry(
        &self,
        bucket: &Bucket,
        failing: impl Fn(&TestEntryHistory) -> bool,
    ) -> bool {
        bucket.test_entries().iter().any(|entry| {
            self.storage
                .history(&TestEntryHistoryId::new(entry, bucket))
                .is_some_and(&failing)
        })
    }

    /// Pair each bucket entry with its submitted result; entries without one
    /// are lost, submitted entries not in the bucket are dropped.
    fn reconcile(result: TestingResult, bucket: &Bucket) -> Reconciled {
        let mut pending: Vec<Option<TestEntryResult>> =
            result.unfiltered_results.into_iter().map(Some).collect();
        let mut reconciled = Reconciled::default();
        for entry in bucket.test_entries() {
            let submitted = pending
                .iter_mut()
                .find(|r| matches!(r, Some(r) if &r.test_entry == entry))
                .and_then(Option::take);
            match submitted {
                Some(entry_result) => reconciled.results.push(entry_result),
                None => {
                    reconciled.lost.push(entry.clone());
                    reconciled.results.push(TestEntryResult::lost(entry.clone()));
                }
            }
        }
        reconciled.foreign = pending.into_iter().flatten().map(|r| r.test_entry).collect();
        reconciled
    }

    /// For each result, whether it goes back to the queue once its attempt is
    /// recorded. Repeated entries within one result count as separate attempts.
    fn plan_retries(&self, results: &[TestEntryResult], bucket: &Bucket) -> Vec<bool> {
        let max_attempts = 1 + bucket.payload().number_of_retries() as usize;
        let mut attempts: HashMap<TestEntryHistoryId, usize> = HashMap::new();
        results
            .iter()
            .map(|entry_result| {
                let id = TestEntryHistoryId::new(&entry_result.test_entry, bucket);
                let recorded = self.storage.history(&id).map_or(0, |h| h.number_of_attempts());
                let count = attempts.entry(id).or_insert(recorded);
                *count += 1;
                !entry_result.succeeded() && *count < max_attempts
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct Reconciled {
    results: Vec<TestEntryResult>,
    lost: Vec<TestEntry>,
    foreign: Vec<TestEntry>,
}

impl Reconciled {
    fn log_mismatches(&self, bucket: &Bucket, worker_id: &WorkerId) {
        for entry in &self.lost {
            tracing::warn!(
                worker_id = %worker_id,
                bucket_id = %bucket.bucket_id(),
                test_entry = %entry,
                "no result for test entry, treating as lost"
            );
        }
        for entry in &self.foreign {
            tracing::warn!(
                worker_id = %worker_id,
                bucket_id = %bucket.bucket_id(),
                test_entry = %entry,
                "dropping result for test entry not in bucket"
            );
        }
    }
}

impl TestHistoryTracker for TestHistoryTrackerImpl {
    fn bucket_to_dequeue<'q>(
        &self,
        worker_id: &WorkerId,
        queue: &'q [EnqueuedBucket],
        workers_in_working_condition: impl FnOnce() -> Vec<WorkerId>,
    ) -> Option<&'q EnqueuedBucket> {
        if let Some(eligible) = queue
            .iter()
            .find(|b| !self.bucket_has_entry(&b.bucket, |h| h.is_failing_on_worker(worker_id)))
        {
            return Some(eligible);
        }
        // Nothing fresh for this worker: serve a bucket that fails everywhere so
        // its retries still get exhausted.
        let workers = workers_in_working_condition();
        queue.iter().find(|b| {
            self.bucket_has_entry(&b.bucket, |h| workers.iter().all(|w| h.is_failing_on_worker(w)))
        })
    }

    fn buckets_to_retry(&self, result: &TestingResult, bucket: &Bucket) -> Vec<Bucket> {
        let reconciled = Self::reconcile(result.clone(), bucket);
        let plan = self.plan_retries(&reconciled.results, bucket);
        reconciled
            .results
            .into_iter()
            .zip(plan)
            .filter(|(_, retry)| *retry)
            .map(|(entry_result, _)| bucket.with_test_entries(vec![entry_result.test_entry]))
            .collect()
    }

    fn accept(
        &mut self,
        result: TestingResult,
        bucket: &Bucket,
        worker_id: &WorkerId,
    ) -> TestHistoryTrackerAcceptResult {
        let test_destination = result.test_destination.clone();
        let reconciled = Self::reconcile(result, bucket);
        reconciled.log_mismatches(bucket, worker_id);
        let plan = self.plan_retries(&reconciled.results, bucket);

        let mut finalized = Vec::new();
        let mut to_retry = Vec::new();
        for (entry_result, retry) in reconciled.results.into_iter().zip(plan) {
            self.storage.register_attempt(
                TestEntryHistoryId::new(&entry_result.test_entry, bucket),
                worker_id,
                entry_result.succeeded(),
            );
            if retry {
                to_retry.push(entry_result.test_entry);
            } else {
                finalized.push(entry_result);
            }
        }

        let buckets_to_reenqueue =
            to_retry.into_iter().map(|entry| bucket.with_test_entries(vec![entry])).collect();
        TestHistoryTrackerAcceptResult {
            buckets_to_reenqueue,
            testing_result: TestingResult::new(test_destination, finalized),
        }
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
