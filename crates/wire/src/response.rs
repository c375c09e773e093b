// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use bq_core::{
    BucketId, DequeuedBucket, TestingResult, WorkerAliveness, WorkerConfiguration, WorkerId,
};
use bq_queue::RunningQueueState;
use serde::{Deserialize, Serialize};

/// Response from the queue server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Worker registered; carries its static configuration
    WorkerRegistered { worker_configuration: WorkerConfiguration },

    /// Worker is disabled; it should stop polling
    WorkerBlocked { worker_id: WorkerId },

    /// Worker id is not part of this queue's fleet
    WorkerNotFound { worker_id: WorkerId },

    /// Worker must register before it polls or heartbeats
    WorkerNotRegistered { worker_id: WorkerId },

    BucketDequeued { bucket: DequeuedBucket },

    /// Nothing enqueued and nothing in flight
    QueueIsEmpty,

    /// Poll again after the given delay
    CheckAgainLater { check_after_secs: u64 },

    BucketResultAccepted { bucket_id: BucketId },

    AliveReportAccepted,

    /// Worker's aliveness after an admin toggle
    WorkerStatusUpdated { worker_id: WorkerId, aliveness: WorkerAliveness },

    WorkersStatus { workers: BTreeMap<WorkerId, WorkerAliveness> },

    /// Bucket ids in the order they were enqueued
    TestsScheduled { bucket_ids: Vec<BucketId> },

    QueueState { state: RunningQueueState },

    JobResults { results: Vec<TestingResult> },

    /// Error response
    Error { message: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error { message: message.into() }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
