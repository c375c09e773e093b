// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and the static configuration handed to a worker on registration.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::signature::PayloadSignature;

/// Opaque worker identity, known in advance from the queue's worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for WorkerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Address a worker listens on for callbacks from the queue (`host:port`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for WorkerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Per-worker tunables from the queue's configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSpecificConfig {
    #[serde(default = "default_number_of_simulators")]
    pub number_of_simulators: u32,
    #[serde(default)]
    pub maximum_cache_size: Option<u64>,
    #[serde(default)]
    pub maximum_cache_ttl_secs: Option<u64>,
}

fn default_number_of_simulators() -> u32 {
    1
}

impl Default for WorkerSpecificConfig {
    fn default() -> Self {
        Self {
            number_of_simulators: default_number_of_simulators(),
            maximum_cache_size: None,
            maximum_cache_ttl_secs: None,
        }
    }
}

/// Everything a worker needs after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfiguration {
    pub number_of_simulators: u32,
    pub maximum_cache_size: Option<u64>,
    pub maximum_cache_ttl_secs: Option<u64>,
    /// How often the worker must send `ReportAlive`.
    pub report_alive_interval_secs: u64,
    /// Signature the worker must attach to every subsequent request.
    pub payload_signature: PayloadSignature,
}

impl WorkerConfiguration {
    pub fn new(
        specific: &WorkerSpecificConfig,
        report_alive_interval_secs: u64,
        payload_signature: PayloadSignature,
    ) -> Self {
        Self {
            number_of_simulators: specific.number_of_simulators,
            maximum_cache_size: specific.maximum_cache_size,
            maximum_cache_ttl_secs: specific.maximum_cache_ttl_secs,
            report_alive_interval_secs,
            payload_signature,
        }
    }
}
