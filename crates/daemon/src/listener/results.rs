// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bq_core::{BucketId, Clock, TestingResult, WorkerId};
use bq_wire::Response;
use tracing::info;

use super::{queue_error_response, ListenCtx};

pub(super) fn handle_submit<C: Clock>(
    ctx: &ListenCtx<C>,
    worker_id: &WorkerId,
    bucket_id: &BucketId,
    testing_result: TestingResult,
) -> Response {
    match ctx.queue.accept(bucket_id, testing_result, worker_id) {
        Ok(accepted) => {
            info!(
                worker_id = %worker_id,
                bucket_id = %bucket_id.short(12),
                collected = accepted.testing_result_to_collect.unfiltered_results.len(),
                retries = accepted.reenqueued_bucket_count,
                "bucket result accepted"
            );
            Response::BucketResultAccepted { bucket_id: bucket_id.clone() }
        }
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_job_results<C: Clock>(ctx: &ListenCtx<C>) -> Response {
    Response::JobResults { results: ctx.queue.job_results() }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
