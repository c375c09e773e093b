// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker capabilities and the constraint language buckets use to gate them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A named attribute a worker advertises on every dequeue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerCapability {
    pub name: String,
    pub value: String,
}

impl WorkerCapability {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

impl fmt::Display for WorkerCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Predicate over the value of one capability (or its absence).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum WorkerCapabilityConstraint {
    Absent,
    Equal(String),
    LessThan(String),
    GreaterThan(String),
    Not(Box<WorkerCapabilityConstraint>),
    All(Vec<WorkerCapabilityConstraint>),
    Any(Vec<WorkerCapabilityConstraint>),
}

impl WorkerCapabilityConstraint {
    pub fn present() -> Self {
        Self::Not(Box::new(Self::Absent))
    }

    pub fn equal(value: impl Into<String>) -> Self {
        Self::Equal(value.into())
    }

    pub fn less_than(value: impl Into<String>) -> Self {
        Self::LessThan(value.into())
    }

    pub fn greater_than(value: impl Into<String>) -> Self {
        Self::GreaterThan(value.into())
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluate against the worker's value for the capability, `None` if the
    /// worker does not advertise it.
    pub fn is_satisfied_by(&self, value: Option<&str>) -> bool {
        match self {
            Self::Absent => value.is_none(),
            Self::Equal(expected) => value == Some(expected.as_str()),
            Self::LessThan(bound) => {
                value.is_some_and(|v| compare_values(v, bound) == Ordering::Less)
            }
            Self::GreaterThan(bound) => {
                value.is_some_and(|v| compare_values(v, bound) == Ordering::Greater)
            }
            Self::Not(inner) => !inner.is_satisfied_by(value),
            Self::All(all) => all.iter().all(|c| c.is_satisfied_by(value)),
            Self::Any(any) => any.iter().any(|c| c.is_satisfied_by(value)),
        }
    }
}

/// Numeric when both sides parse as numbers, lexicographic otherwise.
fn compare_values(lhs: &str, rhs: &str) -> Ordering {
    match (lhs.trim().parse::<f64>(), rhs.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => lhs.cmp(rhs),
    }
}

/// `(capability name, constraint)` a bucket places on the worker running it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerCapabilityRequirement {
    pub capability_name: String,
    pub constraint: WorkerCapabilityConstraint,
}

impl WorkerCapabilityRequirement {
    pub fn new(capability_name: impl Into<String>, constraint: WorkerCapabilityConstraint) -> Self {
        Self { capability_name: capability_name.into(), constraint }
    }

    pub fn is_satisfied_by(&self, capabilities: &BTreeSet<WorkerCapability>) -> bool {
        let value = capabilities
            .iter()
            .find(|c| c.name == self.capability_name)
            .map(|c| c.value.as_str());
        self.constraint.is_satisfied_by(value)
    }
}

/// True when every requirement holds for `capabilities`. An empty requirement
/// set is satisfied by any worker.
pub fn requirements_satisfied<'a>(
    requirements: impl IntoIterator<Item = &'a WorkerCapabilityRequirement>,
    capabilities: &BTreeSet<WorkerCapability>,
) -> bool {
    requirements.into_iter().all(|r| r.is_satisfied_by(capabilities))
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
