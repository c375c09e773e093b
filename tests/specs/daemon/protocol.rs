// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon protocol specs
//!
//! Drive a real daemon over TCP through one job: schedule, dequeue,
//! submit, collect.

use bq_core::{PayloadSignature, RequestId, WorkerAddress, WorkerId};
use bq_daemon::{startup, QueueServerConfig};
use bq_queue::SplitStrategy;
use bq_wire::{Request, Response};
use similar_asserts::assert_eq;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

const TIMEOUT: Duration = Duration::from_secs(5);

const CONFIG: &str = r#"
listen_addr = "127.0.0.1:0"
payload_signature = "job-signature"
termination = "stay_alive"

[workers.mac-01]
number_of_simulators = 2
"#;

fn signature() -> PayloadSignature {
    PayloadSignature::new("job-signature")
}

struct Client {
    stream: TcpStream,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        Self { stream: TcpStream::connect(addr).await.unwrap() }
    }

    async fn send(&mut self, request: Request) -> Response {
        bq_wire::write_request(&mut self.stream, &request, TIMEOUT).await.unwrap();
        bq_wire::read_response(&mut self.stream, TIMEOUT).await.unwrap()
    }

    async fn dequeue(&mut self, request_id: &str) -> Response {
        self.send(Request::DequeueBucket {
            signature: signature(),
            worker_id: WorkerId::new("mac-01"),
            request_id: RequestId::from_string(request_id),
            worker_capabilities: BTreeSet::new(),
        })
        .await
    }
}

#[tokio::test]
async fn job_runs_end_to_end_over_tcp() {
    let daemon = startup(QueueServerConfig::parse(CONFIG).unwrap()).await.unwrap();
    let addr = daemon.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(daemon.run(shutdown.clone()));
    let mut client = Client::connect(addr).await;

    let response = client
        .send(Request::RegisterWorker {
            signature: signature(),
            worker_id: WorkerId::new("mac-01"),
            worker_address: WorkerAddress { host: "10.0.0.5".to_string(), port: 41001 },
        })
        .await;
    let Response::WorkerRegistered { worker_configuration } = response else {
        panic!("expected WorkerRegistered, got {response:?}");
    };
    assert_eq!(worker_configuration.number_of_simulators, 2);

    let response = client
        .send(Request::ScheduleTests {
            signature: signature(),
            configured_test_entries: configured_entries(&["A", "B"], &configuration_with_retries(0)),
            split_strategy: SplitStrategy::Unsplit,
            split_info: None,
        })
        .await;
    assert!(matches!(response, Response::TestsScheduled { ref bucket_ids } if bucket_ids.len() == 1));

    let Response::BucketDequeued { bucket } = client.dequeue("r-1").await else {
        panic!("expected a bucket");
    };
    assert_eq!(client.dequeue("r-1").await, Response::BucketDequeued { bucket: bucket.clone() });

    let response = client
        .send(Request::SubmitResult {
            signature: signature(),
            worker_id: WorkerId::new("mac-01"),
            bucket_id: bucket.bucket_id().clone(),
            testing_result: testing_result_for(bucket.bucket(), true),
        })
        .await;
    assert_eq!(response, Response::BucketResultAccepted { bucket_id: bucket.bucket_id().clone() });

    assert_eq!(client.dequeue("r-2").await, Response::QueueIsEmpty);
    let Response::JobResults { results } =
        client.send(Request::JobResults { signature: signature() }).await
    else {
        panic!("expected JobResults");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].unfiltered_results.len(), 2);

    shutdown.cancel();
    tokio::time::timeout(TIMEOUT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn foreign_signature_never_reaches_the_queue() {
    let daemon = startup(QueueServerConfig::parse(CONFIG).unwrap()).await.unwrap();
    let addr = daemon.local_addr().unwrap();
    let queue = daemon.queue().clone();
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(daemon.run(shutdown.clone()));
    let mut client = Client::connect(addr).await;

    let response = client
        .send(Request::ScheduleTests {
            signature: PayloadSignature::new("other-job"),
            configured_test_entries: configured_entries(&["A"], &configuration_with_retries(0)),
            split_strategy: SplitStrategy::Individual,
            split_info: None,
        })
        .await;

    assert!(matches!(response, Response::Error { .. }));
    assert!(queue.is_depleted());
    assert_eq!(client.send(Request::Ping).await, Response::Pong);

    shutdown.cancel();
    tokio::time::timeout(TIMEOUT, server).await.unwrap().unwrap();
}
