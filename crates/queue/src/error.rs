// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bq_core::{BucketId, WorkerId};
use thiserror::Error;

/// Errors surfaced synchronously by queue operations.
///
/// No operation mutates queue state before returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("worker {0} is not registered")]
    WorkerNotRegistered(WorkerId),
    #[error("worker {0} is not a known worker")]
    UnknownWorker(WorkerId),
    #[error("worker {0} is blocked")]
    WorkerBlocked(WorkerId),
    #[error("worker {0} is already registered and alive")]
    WorkerAlreadyRegistered(WorkerId),
    #[error("worker {0} is already disabled")]
    WorkerAlreadyDisabled(WorkerId),
    #[error("worker {0} is already enabled")]
    WorkerAlreadyEnabled(WorkerId),
    #[error("no worker satisfies requirements of buckets {}", join_ids(.bucket_ids))]
    NoWorkerSatisfiesRequirements { bucket_ids: Vec<BucketId> },
    #[error("no dequeued bucket {bucket_id} for worker {worker_id}")]
    NoSuchDequeuedBucket { bucket_id: BucketId, worker_id: WorkerId },
}

fn join_ids(ids: &[BucketId]) -> String {
    ids.iter().map(|id| id.short(12)).collect::<Vec<_>>().join(", ")
}
