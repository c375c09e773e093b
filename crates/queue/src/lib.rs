// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bq-queue: in-memory distributed test bucket queue
//!
//! Buckets flow from the enqueued set to the dequeued set when a worker
//! polls, and leave the dequeued set when the worker's result is accepted
//! or the stuck bucket reenqueuer reclaims them.

mod accept;
mod dequeue;
mod enqueuer;
mod stuck;
mod workers;

pub mod aliveness;
pub mod capabilities;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod history;
pub mod holder;
pub mod queue;
pub mod results;
pub mod splitter;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;


pub use accept::BucketQueueAcceptResult;
#[cfg(any(test, feature = "test-support"))]
pub use aliveness::FakeAlivenessProvider;
pub use aliveness::{WorkerAlivenessProvider, WorkerAlivenessProviderImpl};
pub use capabilities::WorkerCapabilitiesStorage;
pub use dequeue::DequeueResult;
pub use error::QueueError;
pub use generator::generate_buckets;
pub use grouping::group_by_configuration;
pub use history::{
    TestEntryHistory, TestEntryHistoryId, TestHistoryStorage, TestHistoryTracker,
    TestHistoryTrackerAcceptResult, TestHistoryTrackerImpl,
};
pub use holder::BucketQueueHolder;
pub use queue::{BucketQueue, DefaultBucketQueue};
pub use results::{InMemoryResultsCollector, ResultsCollector};
pub use splitter::{BucketSplitInfo, SplitStrategy};
pub use state::{EnqueuePosition, QueueConfig, QueueState, RunningQueueState};
pub use stuck::stuck_reason;
