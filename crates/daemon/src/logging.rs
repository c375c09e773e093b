// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the daemon binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, or to `log_file` when set. The returned guard flushes the
/// file writer on drop and must outlive the daemon.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).init();
        return None;
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "bqd.log".into());
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt().with_env_filter(env_filter()).with_ansi(false).with_writer(writer).init();
    Some(guard)
}
