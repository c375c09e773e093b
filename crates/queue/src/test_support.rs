// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue fixtures driven by a [`FakeClock`] and predictable ids.

use std::time::Duration;

use bq_core::{FakeClock, SequentialIdGen, WorkerId};

use crate::aliveness::WorkerAlivenessProviderImpl;
use crate::history::TestHistoryTrackerImpl;
use crate::queue::BucketQueue;
use crate::results::InMemoryResultsCollector;
use crate::state::{QueueConfig, QueueState};

/// Silence threshold used by every fixture.
pub const MAX_SILENCE: Duration = Duration::from_secs(60);

pub type TestQueueState = QueueState<
    WorkerAlivenessProviderImpl<FakeClock>,
    TestHistoryTrackerImpl,
    InMemoryResultsCollector,
    FakeClock,
    SequentialIdGen,
>;

pub type TestBucketQueue = BucketQueue<
    WorkerAlivenessProviderImpl<FakeClock>,
    TestHistoryTrackerImpl,
    InMemoryResultsCollector,
    FakeClock,
    SequentialIdGen,
>;

pub fn worker(id: &str) -> WorkerId {
    WorkerId::new(id)
}

/// Queue state that knows `workers`, none of them registered yet.
pub fn queue_state(clock: &FakeClock, workers: &[&str]) -> TestQueueState {
    queue_state_with_config(clock, workers, QueueConfig::default())
}

pub fn queue_state_with_config(
    clock: &FakeClock,
    workers: &[&str],
    config: QueueConfig,
) -> TestQueueState {
    let aliveness = WorkerAlivenessProviderImpl::new(
        clock.clone(),
        workers.iter().map(|id| worker(id)),
        MAX_SILENCE,
    );
    QueueState::new(
        aliveness,
        TestHistoryTrackerImpl::new(),
        InMemoryResultsCollector::default(),
        clock.clone(),
        SequentialIdGen::new("u"),
        config,
    )
}

/// Queue state with every one of `workers` registered.
pub fn registered_queue_state(clock: &FakeClock, workers: &[&str]) -> TestQueueState {
    let mut state = queue_state(clock, workers);
    for id in workers {
        let _ = state.register_worker(&worker(id));
    }
    state
}

/// Shared queue handle with every one of `workers` registered.
pub fn test_queue(clock: &FakeClock, workers: &[&str]) -> TestBucketQueue {
    BucketQueue::new(registered_queue_state(clock, workers))
}
