// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker liveness state machine.
//!
//! Silence is computed lazily on read by comparing the last report against
//! `maximum_not_reporting_duration`; no background task is involved.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use bq_core::{
    BucketId, Clock, WorkerAliveness, WorkerId, WorkerStatus, WorkerUtilizationPermission,
};

use crate::error::QueueError;

/// Per-worker liveness, registration, and in-flight tracking.
pub trait WorkerAlivenessProvider: Send + 'static {
    /// Aliveness of every known worker.
    fn workers_aliveness(&self) -> BTreeMap<WorkerId, WorkerAliveness>;

    /// `NotRegistered` for workers that never registered or are unknown.
    fn aliveness(&self, worker_id: &WorkerId) -> WorkerAliveness;

    fn is_known(&self, worker_id: &WorkerId) -> bool;

    /// Registered and alive. Resets the in-flight set.
    fn did_register_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError>;

    /// Refresh the last-seen timestamp.
    fn worker_is_alive(&mut self, worker_id: &WorkerId);

    /// Heartbeat: refresh last-seen and replace the self-reported in-flight set.
    fn set_bucket_ids_being_processed(
        &mut self,
        worker_id: &WorkerId,
        bucket_ids: BTreeSet<BucketId>,
    ) -> Result<(), QueueError>;

    /// Record that `bucket_id` was just handed to the worker.
    fn did_dequeue_bucket(&mut self, worker_id: &WorkerId, bucket_id: &BucketId);

    fn disable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError>;

    fn enable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError>;

    fn set_utilization_permission(
        &mut self,
        worker_id: &WorkerId,
        permission: WorkerUtilizationPermission,
    ) -> Result<(), QueueError>;

    fn worker_ids_in_working_condition(&self) -> Vec<WorkerId> {
        self.workers_aliveness()
            .into_iter()
            .filter(|(_, a)| a.is_in_working_condition())
            .map(|(id, _)| id)
            .collect()
    }
}

#[derive(Debug, Default)]
struct WorkerRecord {
    /// `None` until the worker registers.
    last_alive_epoch_ms: Option<u64>,
    disabled: bool,
    permission: WorkerUtilizationPermission,
    reported: BTreeSet<BucketId>,
    /// Dequeued bucket ids with the time they were handed out.
    recently_dequeued: BTreeMap<BucketId, u64>,
}

pub struct WorkerAlivenessProviderImpl<C: Clock> {
    clock: C,
    workers: BTreeMap<WorkerId, WorkerRecord>,
    maximum_not_reporting_ms: u64,
}

impl<C: Clock> WorkerAlivenessProviderImpl<C> {
    /// `maximum_not_reporting_duration` is the report-alive interval plus slack.
    pub fn new(
        clock: C,
        known_worker_ids: impl IntoIterator<Item = WorkerId>,
        maximum_not_reporting_duration: Duration,
    ) -> Self {
        Self {
            clock,
            workers: known_worker_ids.into_iter().map(|id| (id, WorkerRecord::default())).collect(),
            maximum_not_reporting_ms: maximum_not_reporting_duration.as_millis() as u64,
        }
    }

    fn record_mut(&mut self, worker_id: &WorkerId) -> Result<&mut WorkerRecord, QueueError> {
        self.workers
            .get_mut(worker_id)
            .ok_or_else(|| QueueError::UnknownWorker(worker_id.clone()))
    }

    fn registered_record_mut(
        &mut self,
        worker_id: &WorkerId,
    ) -> Result<&mut WorkerRecord, QueueError> {
        match self.workers.get_mut(worker_id) {
            Some(record) if record.last_alive_epoch_ms.is_some() => Ok(record),
            _ => Err(QueueError::WorkerNotRegistered(worker_id.clone())),
        }
    }

    fn view(&self, record: &WorkerRecord, now: u64) -> WorkerAliveness {
        let Some(last_alive) = record.last_alive_epoch_ms else {
            return WorkerAliveness {
                disabled: record.disabled,
                utilization_permission: record.permission,
                ..WorkerAliveness::not_registered()
            };
        };
        let status = if now.saturating_sub(last_alive) > self.maximum_not_reporting_ms {
            WorkerStatus::Silent { last_alive_epoch_ms: last_alive }
        } else {
            WorkerStatus::Alive
        };
        let mut bucket_ids_being_processed = record.reported.clone();
        bucket_ids_being_processed.extend(
            record
                .recently_dequeued
                .iter()
                .filter(|(_, at)| now.saturating_sub(**at) <= self.maximum_not_reporting_ms)
                .map(|(id, _)| id.clone()),
        );
        WorkerAliveness {
            status,
            bucket_ids_being_processed,
            disabled: record.disabled,
            utilization_permission: record.permission,
        }
    }
}

impl<C: Clock> WorkerAlivenessProvider for WorkerAlivenessProviderImpl<C> {
    fn workers_aliveness(&self) -> BTreeMap<WorkerId, WorkerAliveness> {
        let now = self.clock.epoch_ms();
        self.workers.iter().map(|(id, record)| (id.clone(), self.view(record, now))).collect()
    }

    fn aliveness(&self, worker_id: &WorkerId) -> WorkerAliveness {
        match self.workers.get(worker_id) {
            Some(record) => self.view(record, self.clock.epoch_ms()),
            None => WorkerAliveness::not_registered(),
        }
    }

    fn is_known(&self, worker_id: &WorkerId) -> bool {
        self.workers.contains_key(worker_id)
    }

    fn did_register_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        let now = self.clock.epoch_ms();
        let record = self.record_mut(worker_id)?;
        record.last_alive_epoch_ms = Some(now);
        record.reported.clear();
        record.recently_dequeued.clear();
        tracing::debug!(worker_id = %worker_id, "worker registered");
        Ok(())
    }

    fn worker_is_alive(&mut self, worker_id: &WorkerId) {
        let now = self.clock.epoch_ms();
        if let Ok(record) = self.registered_record_mut(worker_id) {
            record.last_alive_epoch_ms = Some(now);
        }
    }

    fn set_bucket_ids_being_processed(
        &mut self,
        worker_id: &WorkerId,
        bucket_ids: BTreeSet<BucketId>,
    ) -> Result<(), QueueError> {
        let now = self.clock.epoch_ms();
        let grace = self.maximum_not_reporting_ms;
        let record = self.registered_record_mut(worker_id)?;
        if record.disabled {
            return Err(QueueError::WorkerBlocked(worker_id.clone()));
        }
        record.last_alive_epoch_ms = Some(now);
        record.recently_dequeued.retain(|id, at| {
            !bucket_ids.contains(id) && now.saturating_sub(*at) <= grace
        });
        record.reported = bucket_ids;
        Ok(())
    }

    fn did_dequeue_bucket(&mut self, worker_id: &WorkerId, bucket_id: &BucketId) {
        let now = self.clock.epoch_ms();
        if let Ok(record) = self.registered_record_mut(worker_id) {
            record.last_alive_epoch_ms = Some(now);
            record.recently_dequeued.insert(bucket_id.clone(), now);
        }
    }

    fn disable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        let record = self.record_mut(worker_id)?;
        if record.disabled {
            return Err(QueueError::WorkerAlreadyDisabled(worker_id.clone()));
        }
        record.disabled = true;
        record.reported.clear();
        record.recently_dequeued.clear();
        tracing::warn!(worker_id = %worker_id, "worker disabled");
        Ok(())
    }

    fn enable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        let record = self.record_mut(worker_id)?;
        if !record.disabled {
            return Err(QueueError::WorkerAlreadyEnabled(worker_id.clone()));
        }
        record.disabled = false;
        tracing::info!(worker_id = %worker_id, "worker enabled");
        Ok(())
    }

    fn set_utilization_permission(
        &mut self,
        worker_id: &WorkerId,
        permission: WorkerUtilizationPermission,
    ) -> Result<(), QueueError> {
        self.record_mut(worker_id)?.permission = permission;
        Ok(())
    }
}

/// In-memory provider with directly settable aliveness.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct FakeAlivenessProvider {
    pub workers: BTreeMap<WorkerId, WorkerAliveness>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeAlivenessProvider {
    /// All `worker_ids` registered and alive.
    pub fn alive(worker_ids: &[&str]) -> Self {
        let workers = worker_ids
            .iter()
            .map(|id| {
                let aliveness =
                    WorkerAliveness { status: WorkerStatus::Alive, ..WorkerAliveness::not_registered() };
                (WorkerId::new(*id), aliveness)
            })
            .collect();
        Self { workers }
    }

    pub fn set(&mut self, worker_id: &str, aliveness: WorkerAliveness) {
        self.workers.insert(WorkerId::new(worker_id), aliveness);
    }

    fn entry(&mut self, worker_id: &WorkerId) -> Result<&mut WorkerAliveness, QueueError> {
        self.workers.get_mut(worker_id).ok_or_else(|| QueueError::UnknownWorker(worker_id.clone()))
    }
}

#[cfg(any(test, feature = "test-support"))]
impl WorkerAlivenessProvider for FakeAlivenessProvider {
    fn workers_aliveness(&self) -> BTreeMap<WorkerId, WorkerAliveness> {
        self.workers.clone()
    }

    fn aliveness(&self, worker_id: &WorkerId) -> WorkerAliveness {
        self.workers.get(worker_id).cloned().unwrap_or_else(WorkerAliveness::not_registered)
    }

    fn is_known(&self, worker_id: &WorkerId) -> bool {
        self.workers.contains_key(worker_id)
    }

    fn did_register_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        let entry = self.entry(worker_id)?;
        entry.status = WorkerStatus::Alive;
        entry.bucket_ids_being_processed.clear();
        Ok(())
    }

    fn worker_is_alive(&mut self, worker_id: &WorkerId) {
        if let Some(entry) = self.workers.get_mut(worker_id) {
            if entry.registered() {
                entry.status = WorkerStatus::Alive;
            }
        }
    }

    fn set_bucket_ids_being_processed(
        &mut self,
        worker_id: &WorkerId,
        bucket_ids: BTreeSet<BucketId>,
    ) -> Result<(), QueueError> {
        let entry = self.entry(worker_id)?;
        entry.bucket_ids_being_processed = bucket_ids;
        Ok(())
    }

    fn did_dequeue_bucket(&mut self, worker_id: &WorkerId, bucket_id: &BucketId) {
        if let Some(entry) = self.workers.get_mut(worker_id) {
            entry.bucket_ids_being_processed.insert(bucket_id.clone());
        }
    }

    fn disable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        self.entry(worker_id)?.disabled = true;
        Ok(())
    }

    fn enable_worker(&mut self, worker_id: &WorkerId) -> Result<(), QueueError> {
        self.entry(worker_id)?.disabled = false;
        Ok(())
    }

    fn set_utilization_permission(
        &mut self,
        worker_id: &WorkerId,
        permission: WorkerUtilizationPermission,
    ) -> Result<(), QueueError> {
        self.entry(worker_id)?.utilization_permission = permission;
        Ok(())
    }
}

#[cfg(test)]
#[path = "aliveness_tests.rs"]
mod tests;
