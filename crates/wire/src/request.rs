// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeSet;

use bq_core::{
    BucketId, ConfiguredTestEntry, PayloadSignature, RequestId, TestingResult, WorkerAddress,
    WorkerCapability, WorkerId,
};
use bq_queue::{BucketSplitInfo, SplitStrategy};
use serde::{Deserialize, Serialize};

/// Request from a worker or job submitter to the queue server.
///
/// Every variant except `Ping` carries the shared payload signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    RegisterWorker {
        signature: PayloadSignature,
        worker_id: WorkerId,
        /// Where the worker can be reached for callbacks.
        worker_address: WorkerAddress,
    },

    DequeueBucket {
        signature: PayloadSignature,
        worker_id: WorkerId,
        /// Repeating a request id returns the bucket handed out for it.
        request_id: RequestId,
        #[serde(default)]
        worker_capabilities: BTreeSet<WorkerCapability>,
    },

    SubmitResult {
        signature: PayloadSignature,
        worker_id: WorkerId,
        bucket_id: BucketId,
        testing_result: TestingResult,
    },

    /// Heartbeat with the worker's in-flight bucket ids
    ReportAlive {
        signature: PayloadSignature,
        worker_id: WorkerId,
        #[serde(default)]
        bucket_ids_being_processed: BTreeSet<BucketId>,
    },

    DisableWorker { signature: PayloadSignature, worker_id: WorkerId },

    EnableWorker { signature: PayloadSignature, worker_id: WorkerId },

    /// Aliveness of every known worker
    WorkerStatus { signature: PayloadSignature },

    /// Group, split and enqueue tests for this job
    ScheduleTests {
        signature: PayloadSignature,
        configured_test_entries: Vec<ConfiguredTestEntry>,
        split_strategy: SplitStrategy,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        split_info: Option<BucketSplitInfo>,
    },

    QueueState { signature: PayloadSignature },

    JobResults { signature: PayloadSignature },
}

impl Request {
    pub fn signature(&self) -> Option<&PayloadSignature> {
        match self {
            Request::Ping => None,
            Request::RegisterWorker { signature, .. }
            | Request::DequeueBucket { signature, .. }
            | Request::SubmitResult { signature, .. }
            | Request::ReportAlive { signature, .. }
            | Request::DisableWorker { signature, .. }
            | Request::EnableWorker { signature, .. }
            | Request::WorkerStatus { signature }
            | Request::ScheduleTests { signature, .. }
            | Request::QueueState { signature }
            | Request::JobResults { signature } => Some(signature),
        }
    }

    /// Whether handling this request is evidence the job is progressing.
    ///
    /// Polling, heartbeats and admin toggles are not: a fleet of idle
    /// workers must not keep an abandoned queue alive.
    pub fn indicates_activity(&self) -> bool {
        matches!(self, Request::SubmitResult { .. } | Request::ScheduleTests { .. })
    }

    pub fn worker_id(&self) -> Option<&WorkerId> {
        match self {
            Request::RegisterWorker { worker_id, .. }
            | Request::DequeueBucket { worker_id, .. }
            | Request::SubmitResult { worker_id, .. }
            | Request::ReportAlive { worker_id, .. }
            | Request::DisableWorker { worker_id, .. }
            | Request::EnableWorker { worker_id, .. } => Some(worker_id),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Request::Ping => "ping",
            Request::RegisterWorker { .. } => "register_worker",
            Request::DequeueBucket { .. } => "dequeue_bucket",
            Request::SubmitResult { .. } => "submit_result",
            Request::ReportAlive { .. } => "report_alive",
            Request::DisableWorker { .. } => "disable_worker",
            Request::EnableWorker { .. } => "enable_worker",
            Request::WorkerStatus { .. } => "worker_status",
            Request::ScheduleTests { .. } => "schedule_tests",
            Request::QueueState { .. } => "queue_state",
            Request::JobResults { .. } => "job_results",
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
