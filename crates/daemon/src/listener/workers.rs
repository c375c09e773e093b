// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registration, polling and aliveness handlers.

use std::collections::BTreeSet;

use bq_core::{BucketId, Clock, RequestId, WorkerAddress, WorkerCapability, WorkerId};
use bq_queue::DequeueResult;
use bq_wire::Response;
use tracing::info;

use super::{queue_error_response, ListenCtx};

pub(super) fn handle_register<C: Clock>(
    ctx: &ListenCtx<C>,
    worker_id: WorkerId,
    worker_address: &WorkerAddress,
) -> Response {
    match ctx.queue.register_worker(&worker_id) {
        Ok(()) => {
            info!(worker_id = %worker_id, host = %worker_address.host, port = worker_address.port, "worker registered");
            let worker_configuration =
                ctx.config.worker_configuration(&worker_id, &ctx.signature);
            Response::WorkerRegistered { worker_configuration }
        }
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_dequeue<C: Clock>(
    ctx: &ListenCtx<C>,
    worker_id: &WorkerId,
    request_id: RequestId,
    worker_capabilities: BTreeSet<WorkerCapability>,
) -> Response {
    match ctx.queue.dequeue(worker_id, Some(request_id), worker_capabilities) {
        Ok(DequeueResult::Dequeued(bucket)) => Response::BucketDequeued { bucket },
        Ok(DequeueResult::QueueIsEmpty) => Response::QueueIsEmpty,
        Ok(DequeueResult::CheckAgainLater) => {
            Response::CheckAgainLater { check_after_secs: ctx.config.check_again_after_secs }
        }
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_report_alive<C: Clock>(
    ctx: &ListenCtx<C>,
    worker_id: &WorkerId,
    bucket_ids_being_processed: BTreeSet<BucketId>,
) -> Response {
    match ctx.queue.report_alive(worker_id, bucket_ids_being_processed) {
        Ok(()) => Response::AliveReportAccepted,
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_disable<C: Clock>(ctx: &ListenCtx<C>, worker_id: WorkerId) -> Response {
    match ctx.queue.disable_worker(&worker_id) {
        Ok(aliveness) => {
            info!(worker_id = %worker_id, "worker disabled");
            Response::WorkerStatusUpdated { worker_id, aliveness }
        }
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_enable<C: Clock>(ctx: &ListenCtx<C>, worker_id: WorkerId) -> Response {
    match ctx.queue.enable_worker(&worker_id) {
        Ok(aliveness) => {
            info!(worker_id = %worker_id, "worker enabled");
            Response::WorkerStatusUpdated { worker_id, aliveness }
        }
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_worker_status<C: Clock>(ctx: &ListenCtx<C>) -> Response {
    Response::WorkersStatus { workers: ctx.queue.workers_aliveness() }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
