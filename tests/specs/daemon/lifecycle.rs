// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle specs

use std::io::Write;

use bq_daemon::{startup_with_clock, QueueServerConfig};
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

#[tokio::test]
async fn config_file_drives_startup_and_idle_exit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "listen_addr = \"127.0.0.1:0\"\npayload_signature = \"s\"\ntermination = {{ after_idle_secs = 30 }}\n[workers.w1]"
    )
    .unwrap();
    let config = QueueServerConfig::load(file.path()).unwrap();

    let clock = FakeClock::new();
    let daemon = startup_with_clock(config, clock.clone()).await.unwrap();
    clock.advance(Duration::from_secs(31));

    let shutdown = CancellationToken::new();
    tokio::time::timeout(Duration::from_secs(5), daemon.run(shutdown.clone())).await.unwrap();
    assert!(shutdown.is_cancelled());
}
