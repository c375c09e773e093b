// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{BTreeSet, HashMap};

use bq_core::{requirements_satisfied, WorkerCapability, WorkerCapabilityRequirement, WorkerId};

/// Last capability set each worker advertised.
#[derive(Debug, Default)]
pub struct WorkerCapabilitiesStorage {
    capabilities: HashMap<WorkerId, BTreeSet<WorkerCapability>>,
}

impl WorkerCapabilitiesStorage {
    pub fn set(&mut self, worker_id: &WorkerId, capabilities: BTreeSet<WorkerCapability>) {
        self.capabilities.insert(worker_id.clone(), capabilities);
    }

    /// Empty for workers that never advertised anything.
    pub fn get(&self, worker_id: &WorkerId) -> BTreeSet<WorkerCapability> {
        self.capabilities.get(worker_id).cloned().unwrap_or_default()
    }

    pub fn satisfies(
        &self,
        worker_id: &WorkerId,
        requirements: &BTreeSet<WorkerCapabilityRequirement>,
    ) -> bool {
        match self.capabilities.get(worker_id) {
            Some(caps) => requirements_satisfied(requirements, caps),
            None => requirements_satisfied(requirements, &BTreeSet::new()),
        }
    }
}
