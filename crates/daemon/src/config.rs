// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue server configuration: a TOML file plus `BQ_*` overrides.

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bq_core::{PayloadSignature, WorkerConfiguration, WorkerId, WorkerSpecificConfig};
use bq_queue::{BucketSplitInfo, QueueConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env;

/// When an idle queue server stops by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomaticTermination {
    StayAlive,
    /// Stop once no activity-indicating request arrived for this long.
    AfterIdleSecs(u64),
}

impl Default for AutomaticTermination {
    fn default() -> Self {
        AutomaticTermination::AfterIdleSecs(3600)
    }
}

impl AutomaticTermination {
    pub fn idle_limit(self) -> Option<Duration> {
        match self {
            AutomaticTermination::StayAlive => None,
            AutomaticTermination::AfterIdleSecs(secs) => Some(Duration::from_secs(secs)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("payload_signature is required (set it in the config or BQ_PAYLOAD_SIGNATURE)")]
    MissingSignature,

    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("disallowed worker {0} is not listed under [workers]")]
    UnknownDisallowedWorker(WorkerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Required once overrides are applied.
    #[serde(default)]
    pub payload_signature: Option<PayloadSignature>,
    #[serde(default = "default_thirty")]
    pub check_again_after_secs: u64,
    #[serde(default = "default_thirty")]
    pub report_alive_interval_secs: u64,
    #[serde(default = "default_thirty")]
    pub report_alive_slack_secs: u64,
    #[serde(default = "default_stuck_poll_interval_secs")]
    pub stuck_poll_interval_secs: u64,
    #[serde(default)]
    pub termination: AutomaticTermination,
    #[serde(default)]
    pub default_worker: WorkerSpecificConfig,
    /// Known workers; their ids are the only ones allowed to register.
    #[serde(default)]
    pub workers: BTreeMap<WorkerId, WorkerSpecificConfig>,
    /// Known workers this queue must not hand buckets to, e.g. while another
    /// queue is using them.
    #[serde(default)]
    pub disallowed_workers: BTreeSet<WorkerId>,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 41000))
}

fn default_thirty() -> u64 {
    30
}

fn default_stuck_poll_interval_secs() -> u64 {
    5
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub listen_addr: Option<String>,
    pub payload_signature: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::listen_addr(),
            payload_signature: env::payload_signature(),
            log_file: env::log_file(),
        }
    }
}

impl QueueServerConfig {
    /// Read `path`, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut config = Self::parse(&text)?;
        config.apply_overrides(EnvOverrides::from_env())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, overrides: EnvOverrides) -> Result<(), ConfigError> {
        if let Some(addr) = overrides.listen_addr {
            self.listen_addr = addr.parse().map_err(|_| ConfigError::InvalidListenAddr(addr))?;
        }
        if let Some(signature) = overrides.payload_signature {
            self.payload_signature = Some(PayloadSignature::new(signature));
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = Some(log_file);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.payload_signature {
            Some(signature) if !signature.0.is_empty() => {}
            _ => return Err(ConfigError::MissingSignature),
        }
        if self.report_alive_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("report_alive_interval_secs"));
        }
        if self.stuck_poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("stuck_poll_interval_secs"));
        }
        let unknown = self.disallowed_workers.iter().find(|w| !self.workers.contains_key(*w));
        if let Some(unknown) = unknown {
            return Err(ConfigError::UnknownDisallowedWorker(unknown.clone()));
        }
        Ok(())
    }

    pub fn signature(&self) -> Result<&PayloadSignature, ConfigError> {
        self.payload_signature.as_ref().ok_or(ConfigError::MissingSignature)
    }

    pub fn known_worker_ids(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.workers.keys().cloned()
    }

    /// Configuration handed to `worker_id` on registration.
    pub fn worker_configuration(
        &self,
        worker_id: &WorkerId,
        payload_signature: &PayloadSignature,
    ) -> WorkerConfiguration {
        let specific = self.workers.get(worker_id).unwrap_or(&self.default_worker);
        WorkerConfiguration::new(
            specific,
            self.report_alive_interval_secs,
            payload_signature.clone(),
        )
    }

    /// Silence after which a worker is considered gone.
    pub fn maximum_not_reporting_duration(&self) -> Duration {
        Duration::from_secs(self.report_alive_interval_secs + self.report_alive_slack_secs)
    }

    pub fn stuck_poll_interval(&self) -> Duration {
        Duration::from_secs(self.stuck_poll_interval_secs)
    }

    /// Longest a bucket can stay with a vanished worker before it is reclaimed.
    pub fn worst_case_stuck_duration(&self) -> Duration {
        self.maximum_not_reporting_duration() + self.stuck_poll_interval()
    }

    /// Split info for `ScheduleTests` requests that do not bring their own.
    pub fn default_split_info(&self) -> BucketSplitInfo {
        let parallel_buckets: u32 = self.workers.values().map(|w| w.number_of_simulators).sum();
        BucketSplitInfo::new(self.workers.len(), parallel_buckets as usize)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
