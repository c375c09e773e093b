// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures for listener tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use bq_core::{FakeClock, PayloadSignature, RequestId, WorkerAddress, WorkerId};
use bq_wire::{Request, Response};

use super::{dispatch, ListenCtx};
use crate::config::QueueServerConfig;

pub const SIGNATURE: &str = "sig";

const CONFIG: &str = r#"
payload_signature = "sig"
check_again_after_secs = 7

[default_worker]
number_of_simulators = 1

[workers.w1]
number_of_simulators = 3

[workers.w2]
"#;

pub fn test_ctx(clock: &FakeClock) -> ListenCtx<FakeClock> {
    let config = QueueServerConfig::parse(CONFIG).unwrap();
    ListenCtx::new(Arc::new(config), clock.clone()).unwrap()
}

/// Like [`test_ctx`], with `disallowed` kept from receiving buckets.
pub fn test_ctx_disallowing(clock: &FakeClock, disallowed: &[&str]) -> ListenCtx<FakeClock> {
    let text = format!("disallowed_workers = {disallowed:?}\n{CONFIG}");
    let config = QueueServerConfig::parse(&text).unwrap();
    ListenCtx::new(Arc::new(config), clock.clone()).unwrap()
}

pub fn signature() -> PayloadSignature {
    PayloadSignature::new(SIGNATURE)
}

pub fn register(ctx: &ListenCtx<FakeClock>, worker_id: &str) -> Response {
    dispatch(
        Request::RegisterWorker {
            signature: signature(),
            worker_id: WorkerId::new(worker_id),
            worker_address: WorkerAddress { host: "localhost".to_string(), port: 40000 },
        },
        ctx,
    )
}

pub fn dequeue(ctx: &ListenCtx<FakeClock>, worker_id: &str, request_id: &str) -> Response {
    dispatch(
        Request::DequeueBucket {
            signature: signature(),
            worker_id: WorkerId::new(worker_id),
            request_id: RequestId::from_string(request_id),
            worker_capabilities: BTreeSet::new(),
        },
        ctx,
    )
}
