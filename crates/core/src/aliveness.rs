// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time view of a worker's liveness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::bucket::BucketId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WorkerStatus {
    NotRegistered,
    Alive,
    Silent { last_alive_epoch_ms: u64 },
}

crate::simple_display! {
    WorkerStatus {
        NotRegistered => "notRegistered",
        Alive => "alive",
        Silent { .. } => "silent",
    }
}

/// Whether this queue may hand work to the worker (shared fleets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerUtilizationPermission {
    #[default]
    Allowed,
    Disallowed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAliveness {
    pub status: WorkerStatus,
    /// Buckets the worker last claimed to be running.
    pub bucket_ids_being_processed: BTreeSet<BucketId>,
    pub disabled: bool,
    pub utilization_permission: WorkerUtilizationPermission,
}

impl WorkerAliveness {
    pub fn not_registered() -> Self {
        Self {
            status: WorkerStatus::NotRegistered,
            bucket_ids_being_processed: BTreeSet::new(),
            disabled: false,
            utilization_permission: WorkerUtilizationPermission::Allowed,
        }
    }

    pub fn registered(&self) -> bool {
        !matches!(self.status, WorkerStatus::NotRegistered)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.status, WorkerStatus::Alive)
    }

    pub fn is_silent(&self) -> bool {
        matches!(self.status, WorkerStatus::Silent { .. })
    }

    /// Registered, enabled and reporting.
    pub fn is_in_working_condition(&self) -> bool {
        self.is_alive() && !self.disabled
    }

    pub fn may_be_utilized(&self) -> bool {
        self.utilization_permission == WorkerUtilizationPermission::Allowed
    }
}

#[cfg(test)]
#[path = "aliveness_tests.rs"]
mod tests;
