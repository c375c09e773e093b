// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bqd`: bucket queue daemon for one distributed test job.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;

use bq_daemon::{install_shutdown_handler, logging, startup, QueueServerConfig};

#[derive(Parser, Debug)]
#[command(name = "bqd")]
#[command(version)]
#[command(about = "Distributes test buckets to registered workers")]
struct Args {
    /// Path to the TOML queue server config
    #[arg(long, short)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match QueueServerConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bqd: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(config.log_file.as_deref());

    let daemon = match startup(config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    if let Err(e) = install_shutdown_handler(shutdown.clone()) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    daemon.run(shutdown).await;
    ExitCode::SUCCESS
}
