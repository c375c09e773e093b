// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handle to one job's queue.
//!
//! Every operation takes the same lock, so multi-object updates (holder,
//! aliveness, history) are observed atomically by request handlers and the
//! stuck bucket poller alike.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use bq_core::{
    Bucket, BucketId, Clock, ConfiguredTestEntry, EnqueuedBucket, IdGen, NanoIdGen, RequestId,
    StuckBucket, TestingResult, WorkerAliveness, WorkerCapability, WorkerId,
    WorkerUtilizationPermission,
};

use crate::accept::BucketQueueAcceptResult;
use crate::aliveness::{WorkerAlivenessProvider, WorkerAlivenessProviderImpl};
use crate::dequeue::DequeueResult;
use crate::error::QueueError;
use crate::history::{TestHistoryTracker, TestHistoryTrackerImpl};
use crate::results::{InMemoryResultsCollector, ResultsCollector};
use crate::splitter::{BucketSplitInfo, SplitStrategy};
use crate::state::{QueueConfig, QueueState, RunningQueueState};

/// Queue wired with the production components.
pub type DefaultBucketQueue<C> = BucketQueue<
    WorkerAlivenessProviderImpl<C>,
    TestHistoryTrackerImpl,
    InMemoryResultsCollector,
    C,
    NanoIdGen,
>;

impl<C: Clock> DefaultBucketQueue<C> {
    pub fn with_workers(
        clock: C,
        known_worker_ids: impl IntoIterator<Item = WorkerId>,
        maximum_not_reporting_duration: Duration,
        config: QueueConfig,
    ) -> Self {
        let aliveness = WorkerAlivenessProviderImpl::new(
            clock.clone(),
            known_worker_ids,
            maximum_not_reporting_duration,
        );
        Self::new(QueueState::new(
            aliveness,
            TestHistoryTrackerImpl::new(),
            InMemoryResultsCollector::default(),
            clock,
            NanoIdGen,
            config,
        ))
    }
}

pub struct BucketQueue<A, H, R, C, G> {
    state: Arc<Mutex<QueueState<A, H, R, C, G>>>,
}

impl<A, H, R, C, G> Clone for BucketQueue<A, H, R, C, G> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state) }
    }
}

impl<A, H, R, C, G> BucketQueue<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    pub fn new(state: QueueState<A, H, R, C, G>) -> Self {
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Run `f` with the lock held. For reads spanning several components.
    pub fn with_state<T>(&self, f: impl FnOnce(&QueueState<A, H, R, C, G>) -> T) -> T {
        f(&self.state.lock())
    }

    pub fn register_worker(&self, worker_id: &WorkerId) -> Result<(), QueueError> {
        self.state.lock().register_worker(worker_id)
    }

    pub fn report_alive(
        &self,
        worker_id: &WorkerId,
        bucket_ids_being_processed: BTreeSet<BucketId>,
    ) -> Result<(), QueueError> {
        self.state.lock().report_alive(worker_id, bucket_ids_being_processed)
    }

    pub fn disable_worker(&self, worker_id: &WorkerId) -> Result<WorkerAliveness, QueueError> {
        self.state.lock().disable_worker(worker_id)
    }

    pub fn enable_worker(&self, worker_id: &WorkerId) -> Result<WorkerAliveness, QueueError> {
        self.state.lock().enable_worker(worker_id)
    }

    pub fn set_utilization_permission(
        &self,
        worker_id: &WorkerId,
        permission: WorkerUtilizationPermission,
    ) -> Result<WorkerAliveness, QueueError> {
        self.state.lock().set_utilization_permission(worker_id, permission)
    }

    pub fn workers_aliveness(&self) -> BTreeMap<WorkerId, WorkerAliveness> {
        self.state.lock().workers_aliveness()
    }

    pub fn enqueue(&self, buckets: Vec<Bucket>) -> Result<Vec<EnqueuedBucket>, QueueError> {
        self.state.lock().enqueue(buckets)
    }

    pub fn schedule_tests(
        &self,
        entries: &[ConfiguredTestEntry],
        strategy: SplitStrategy,
        info: &BucketSplitInfo,
    ) -> Result<Vec<EnqueuedBucket>, QueueError> {
        self.state.lock().schedule_tests(entries, strategy, info)
    }

    pub fn dequeue(
        &self,
        worker_id: &WorkerId,
        request_id: Option<RequestId>,
        capabilities: BTreeSet<WorkerCapability>,
    ) -> Result<DequeueResult, QueueError> {
        self.state.lock().dequeue(worker_id, request_id, capabilities)
    }

    pub fn accept(
        &self,
        bucket_id: &BucketId,
        testing_result: TestingResult,
        worker_id: &WorkerId,
    ) -> Result<BucketQueueAcceptResult, QueueError> {
        self.state.lock().accept(bucket_id, testing_result, worker_id)
    }

    pub fn reenqueue_stuck_buckets(&self) -> Vec<StuckBucket> {
        self.state.lock().reenqueue_stuck_buckets()
    }

    pub fn running_queue_state(&self) -> RunningQueueState {
        self.state.lock().running_queue_state()
    }

    pub fn job_results(&self) -> Vec<TestingResult> {
        self.state.lock().results().collected()
    }

    pub fn is_depleted(&self) -> bool {
        self.state.lock().holder().is_depleted()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
