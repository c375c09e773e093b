// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! bq-daemon: TCP queue server for distributed test runs
//!
//! One daemon serves one job. Workers register, poll for buckets, heartbeat
//! and submit results; the job's owner schedules tests and reads results.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod activity;
pub mod config;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod logging;
pub mod poller;

pub use activity::ActivityTracker;
pub use config::{AutomaticTermination, ConfigError, EnvOverrides, QueueServerConfig};
pub use lifecycle::{
    install_shutdown_handler, startup, startup_with_clock, Daemon, LifecycleError,
};
pub use listener::{ConnectionError, ListenCtx, Listener};
pub use poller::spawn_stuck_bucket_poller;
