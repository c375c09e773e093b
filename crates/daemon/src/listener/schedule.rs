// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bq_core::{Clock, ConfiguredTestEntry};
use bq_queue::{BucketSplitInfo, SplitStrategy};
use bq_wire::Response;

use super::{queue_error_response, ListenCtx};

pub(super) fn handle_schedule_tests<C: Clock>(
    ctx: &ListenCtx<C>,
    entries: &[ConfiguredTestEntry],
    split_strategy: SplitStrategy,
    split_info: Option<BucketSplitInfo>,
) -> Response {
    let info = split_info.unwrap_or(ctx.split_info);
    match ctx.queue.schedule_tests(entries, split_strategy, &info) {
        Ok(enqueued) => Response::TestsScheduled {
            bucket_ids: enqueued.iter().map(|e| e.bucket_id().clone()).collect(),
        },
        Err(e) => queue_error_response(e),
    }
}

pub(super) fn handle_queue_state<C: Clock>(ctx: &ListenCtx<C>) -> Response {
    Response::QueueState { state: ctx.queue.running_queue_state() }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
