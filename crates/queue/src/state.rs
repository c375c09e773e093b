// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue state guarded by the queue's single lock.
//!
//! Every component (enqueuer, dequeue source, result accepter, stuck bucket
//! reenqueuer, worker admin) is an `impl QueueState` block in its own module,
//! so each operation sees the holder, aliveness, history and capabilities
//! together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bq_core::{Clock, IdGen, WorkerId};

use crate::aliveness::WorkerAlivenessProvider;
use crate::capabilities::WorkerCapabilitiesStorage;
use crate::history::TestHistoryTracker;
use crate::holder::BucketQueueHolder;
use crate::results::ResultsCollector;

/// Where newly admitted buckets land in the enqueued list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnqueuePosition {
    /// Served before everything already waiting.
    #[default]
    Front,
    /// Just behind the bucket about to be served.
    AfterHead,
    Back,
}

impl EnqueuePosition {
    pub fn index(self, len: usize) -> usize {
        match self {
            Self::Front => 0,
            Self::AfterHead => len.min(1),
            Self::Back => len,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub enqueue_position: EnqueuePosition,
}

/// Snapshot of queue progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunningQueueState {
    pub enqueued_bucket_count: usize,
    pub enqueued_test_count: usize,
    pub dequeued_bucket_count: usize,
    /// Number of test entries each worker currently holds.
    pub dequeued_tests_by_worker: BTreeMap<WorkerId, usize>,
    pub is_depleted: bool,
}

pub struct QueueState<A, H, R, C, G> {
    pub(crate) holder: BucketQueueHolder,
    pub(crate) aliveness: A,
    pub(crate) capabilities: WorkerCapabilitiesStorage,
    pub(crate) history: H,
    pub(crate) results: R,
    pub(crate) clock: C,
    pub(crate) id_gen: G,
    pub(crate) config: QueueConfig,
}

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    pub fn new(aliveness: A, history: H, results: R, clock: C, id_gen: G, config: QueueConfig) -> Self {
        Self {
            holder: BucketQueueHolder::new(),
            aliveness,
            capabilities: WorkerCapabilitiesStorage::default(),
            history,
            results,
            clock,
            id_gen,
            config,
        }
    }

    pub fn holder(&self) -> &BucketQueueHolder {
        &self.holder
    }

    pub fn aliveness(&self) -> &A {
        &self.aliveness
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn results(&self) -> &R {
        &self.results
    }

    pub fn running_queue_state(&self) -> RunningQueueState {
        let mut dequeued_tests_by_worker = BTreeMap::new();
        for dequeued in self.holder.dequeued() {
            *dequeued_tests_by_worker.entry(dequeued.worker_id.clone()).or_insert(0) +=
                dequeued.bucket().test_entries().len();
        }
        RunningQueueState {
            enqueued_bucket_count: self.holder.enqueued().len(),
            enqueued_test_count: self.holder.enqueued_test_count(),
            dequeued_bucket_count: self.holder.dequeued().count(),
            dequeued_tests_by_worker,
            is_depleted: self.holder.is_depleted(),
        }
    }
}
