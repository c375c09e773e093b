// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Listen address override (`BQ_LISTEN_ADDR`), as written.
pub fn listen_addr() -> Option<String> {
    non_empty("BQ_LISTEN_ADDR")
}

/// Payload signature override (`BQ_PAYLOAD_SIGNATURE`).
pub fn payload_signature() -> Option<String> {
    non_empty("BQ_PAYLOAD_SIGNATURE")
}

/// Log file override (`BQ_LOG_FILE`). Logs go to stderr when unset.
pub fn log_file() -> Option<PathBuf> {
    non_empty("BQ_LOG_FILE").map(PathBuf::from)
}

/// Per-frame read/write timeout
pub fn ipc_timeout() -> Duration {
    std::env::var("BQ_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
