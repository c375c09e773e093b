// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, run, shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use bq_core::{Clock, SystemClock};
use bq_queue::DefaultBucketQueue;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{ConfigError, QueueServerConfig};
use crate::listener::{ListenCtx, Listener};
use crate::poller::spawn_stuck_bucket_poller;

/// A started queue server. Accepts no connections until [`Daemon::run`].
pub struct Daemon<C: Clock> {
    config: Arc<QueueServerConfig>,
    ctx: Arc<ListenCtx<C>>,
    tcp: TcpListener,
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate `config`, bind the listening socket and build an empty queue.
pub async fn startup(config: QueueServerConfig) -> Result<Daemon<SystemClock>, LifecycleError> {
    startup_with_clock(config, SystemClock).await
}

pub async fn startup_with_clock<C: Clock>(
    config: QueueServerConfig,
    clock: C,
) -> Result<Daemon<C>, LifecycleError> {
    config.validate()?;
    let config = Arc::new(config);
    let tcp = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen_addr, e))?;
    let ctx = Arc::new(ListenCtx::new(Arc::clone(&config), clock)?);

    info!(
        addr = %tcp.local_addr()?,
        version = crate::env::PROTOCOL_VERSION,
        workers = config.workers.len(),
        worst_case_stuck_secs = config.worst_case_stuck_duration().as_secs(),
        "queue server started"
    );
    Ok(Daemon { config, ctx, tcp })
}

impl<C: Clock> Daemon<C> {
    pub fn local_addr(&self) -> Result<SocketAddr, LifecycleError> {
        Ok(self.tcp.local_addr()?)
    }

    pub fn queue(&self) -> &DefaultBucketQueue<C> {
        &self.ctx.queue
    }

    /// Serve until `shutdown` is cancelled, by a signal or by idle termination.
    pub async fn run(self, shutdown: CancellationToken) {
        let poller = spawn_stuck_bucket_poller(
            self.ctx.queue.clone(),
            self.config.stuck_poll_interval(),
            shutdown.clone(),
        );
        let watch =
            self.ctx.activity.clone().spawn_watch(self.config.stuck_poll_interval(), shutdown.clone());

        Listener::new(self.tcp, Arc::clone(&self.ctx)).run(shutdown).await;

        for (name, task) in [("stuck bucket poller", poller), ("idle watch", watch)] {
            if let Err(e) = task.await {
                warn!("{} task failed: {}", name, e);
            }
        }

        let state = self.ctx.queue.running_queue_state();
        info!(
            enqueued = state.enqueued_bucket_count,
            dequeued = state.dequeued_bucket_count,
            results = self.ctx.queue.job_results().len(),
            "queue server stopped"
        );
    }
}

/// Cancel `shutdown` on SIGTERM or SIGINT.
pub fn install_shutdown_handler(
    shutdown: CancellationToken,
) -> Result<JoinHandle<()>, LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate()).map_err(LifecycleError::Signal)?;
    let mut sigint = signal(SignalKind::interrupt()).map_err(LifecycleError::Signal)?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        }
        shutdown.cancel();
    }))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
