// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling TCP I/O.
//!
//! Each accepted connection gets its own task. A connection may carry any
//! number of request/response exchanges; every handler goes through the
//! shared queue handle, so ordering between connections is decided by the
//! queue lock.

mod results;
mod schedule;
mod workers;

use std::sync::Arc;

use bq_core::{Clock, PayloadSignature, WorkerUtilizationPermission};
use bq_queue::{BucketSplitInfo, DefaultBucketQueue, QueueError};
use bq_wire::{ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::activity::ActivityTracker;
use crate::config::{ConfigError, QueueServerConfig};
use crate::env::ipc_timeout;

/// Shared daemon context for all request handlers.
pub struct ListenCtx<C: Clock> {
    pub queue: DefaultBucketQueue<C>,
    pub config: Arc<QueueServerConfig>,
    /// Every request except `Ping` must carry this.
    pub signature: PayloadSignature,
    pub activity: ActivityTracker<C>,
    /// Used by `ScheduleTests` requests without their own split info.
    pub split_info: BucketSplitInfo,
}

impl<C: Clock> ListenCtx<C> {
    /// Build the queue for the workers `config` knows about.
    pub fn new(config: Arc<QueueServerConfig>, clock: C) -> Result<Self, ConfigError> {
        let signature = config.signature()?.clone();
        let queue = DefaultBucketQueue::with_workers(
            clock.clone(),
            config.known_worker_ids(),
            config.maximum_not_reporting_duration(),
            config.queue.clone(),
        );
        for worker_id in &config.disallowed_workers {
            queue
                .set_utilization_permission(worker_id, WorkerUtilizationPermission::Disallowed)
                .map_err(|_| ConfigError::UnknownDisallowedWorker(worker_id.clone()))?;
        }
        let activity = ActivityTracker::new(clock, config.termination);
        let split_info = config.default_split_info();
        Ok(Self { queue, config, signature, activity, split_info })
    }
}

/// Listener task for accepting TCP connections.
pub struct Listener<C: Clock> {
    tcp: TcpListener,
    ctx: Arc<ListenCtx<C>>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl<C: Clock> Listener<C> {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx<C>>) -> Self {
        Self { tcp, ctx }
    }

    /// Accept connections until `shutdown` fires. Open connections finish
    /// their current exchange on their own.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("listener stopped");
                    return;
                }
                result = self.tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("TCP connection from {}", addr);
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                    log_connection_error(e);
                                }
                            });
                        }
                        Err(e) => error!("TCP accept error: {}", e),
                    }
                }
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Serve requests on one connection until the client closes it.
///
/// The first request must arrive within the IPC timeout. Later ones may take
/// longer: an idle keep-alive connection is closed quietly.
async fn handle_connection<R, W, C>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx<C>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    C: Clock,
{
    let mut served = 0usize;
    loop {
        let request = match bq_wire::read_request(&mut reader, ipc_timeout()).await {
            Ok(request) => request,
            Err(ProtocolError::ConnectionClosed) if served > 0 => return Ok(()),
            Err(ProtocolError::Timeout) if served > 0 => {
                debug!(served, "closing idle connection");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        // Polling and heartbeats are frequent, log them at debug
        if matches!(request, Request::DequeueBucket { .. } | Request::ReportAlive { .. }) {
            debug!(request = request.name(), worker_id = ?request.worker_id(), "received request");
        } else {
            info!(request = request.name(), worker_id = ?request.worker_id(), "received request");
        }

        let response = dispatch(request, ctx);
        debug!("Sending response: {:?}", response);
        bq_wire::write_response(&mut writer, &response, ipc_timeout()).await?;
        served += 1;
    }
}

/// Verify the signature, run the handler, then record activity if the
/// request moved the job forward.
pub(crate) fn dispatch<C: Clock>(request: Request, ctx: &ListenCtx<C>) -> Response {
    if let Some(signature) = request.signature() {
        if !signature.matches(&ctx.signature) {
            warn!(request = request.name(), worker_id = ?request.worker_id(), "payload signature mismatch");
            return Response::error("payload signature mismatch");
        }
    }

    let indicates_activity = request.indicates_activity();
    let response = handle_request(request, ctx);
    if indicates_activity && !matches!(response, Response::Error { .. }) {
        ctx.activity.record_activity();
    }
    response
}

fn handle_request<C: Clock>(request: Request, ctx: &ListenCtx<C>) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::RegisterWorker { worker_id, worker_address, .. } => {
            workers::handle_register(ctx, worker_id, &worker_address)
        }

        Request::DequeueBucket { worker_id, request_id, worker_capabilities, .. } => {
            workers::handle_dequeue(ctx, &worker_id, request_id, worker_capabilities)
        }

        Request::ReportAlive { worker_id, bucket_ids_being_processed, .. } => {
            workers::handle_report_alive(ctx, &worker_id, bucket_ids_being_processed)
        }

        Request::DisableWorker { worker_id, .. } => workers::handle_disable(ctx, worker_id),

        Request::EnableWorker { worker_id, .. } => workers::handle_enable(ctx, worker_id),

        Request::WorkerStatus { .. } => workers::handle_worker_status(ctx),

        Request::SubmitResult { worker_id, bucket_id, testing_result, .. } => {
            results::handle_submit(ctx, &worker_id, &bucket_id, testing_result)
        }

        Request::JobResults { .. } => results::handle_job_results(ctx),

        Request::ScheduleTests { configured_test_entries, split_strategy, split_info, .. } => {
            schedule::handle_schedule_tests(ctx, &configured_test_entries, split_strategy, split_info)
        }

        Request::QueueState { .. } => schedule::handle_queue_state(ctx),
    }
}

/// Worker-facing refusals get their own responses; anything else is an error.
pub(crate) fn queue_error_response(e: QueueError) -> Response {
    match e {
        QueueError::WorkerNotRegistered(worker_id) => Response::WorkerNotRegistered { worker_id },
        QueueError::WorkerBlocked(worker_id) => Response::WorkerBlocked { worker_id },
        QueueError::UnknownWorker(worker_id) => Response::WorkerNotFound { worker_id },
        other => Response::error(other.to_string()),
    }
}

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
