// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registration, heartbeats and administrative toggles.

use std::collections::{BTreeMap, BTreeSet};

use bq_core::{BucketId, Clock, IdGen, WorkerAliveness, WorkerId, WorkerUtilizationPermission};

use crate::aliveness::WorkerAlivenessProvider;
use crate::error::QueueError;
use crate::history::TestHistoryTracker;
use crate::results::ResultsCollector;
use crate::state::QueueState;

impl<A, H, R, C, G> QueueState<A, H, R, C, G>
where
    A: WorkerAlivenessProvider,
    H: TestHistoryTracker,
    R: ResultsCollector,
    C: Clock,
    G: IdGen,
{
    /// Allowed for known workers that never registered or went silent.
    pub fn register_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        if !self.aliveness.is_known(worker_id) {
            return Err(QueueError::UnknownWorker(worker_id.clone()));
        }
        let aliveness = self.aliveness.aliveness(worker_id);
        if aliveness.disabled {
            return Err(QueueError::WorkerBlocked(worker_id.clone()));
        }
        if aliveness.is_alive() {
            return Err(QueueError::WorkerAlreadyRegistered(worker_id.clone()));
        }
        self.aliveness.did_register_worker(worker_id)
    }

    pub fn report_alive(
        &mut self,
        worker_id: &WorkerId,
        bucket_ids_being_processed: BTreeSet<BucketId>,
    ) -> Result<(), QueueError> {
        self.aliveness.set_bucket_ids_being_processed(worker_id, bucket_ids_being_processed)
    }

    pub fn disable_worker(&mut self, worker_id: &WorkerId) -> Result<WorkerAliveness, QueueError> {
        self.aliveness.disable_worker(worker_id)?;
        Ok(self.aliveness.aliveness(worker_id))
    }

    pub fn enable_worker(&mut self, worker_id: &WorkerId) -> Result<WorkerAliveness, QueueError> {
        self.aliveness.enable_worker(worker_id)?;
        Ok(self.aliveness.aliveness(worker_id))
    }

    /// Whether this queue may hand buckets to `worker_id` at all.
    pub fn set_utilization_permission(
        &mut self,
        worker_id: &WorkerId,
        permission: WorkerUtilizationPermission,
    ) -> Result<WorkerAliveness, QueueError> {
        self.aliveness.set_utilization_permission(worker_id, permission)?;
        Ok(self.aliveness.aliveness(worker_id))
    }

    pub fn workers_aliveness(&self) -> BTreeMap<WorkerId, WorkerAliveness> {
        self.aliveness.workers_aliveness()
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
