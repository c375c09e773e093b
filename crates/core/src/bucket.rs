// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buckets: the schedulable unit of work, and the records of where each one is.
//!
//! A [`Bucket`]'s id is a content hash: identical work always maps to the same
//! id regardless of the order its test entries were listed in. Whether a given
//! enqueue of that work is waiting, claimed, or done is tracked by the
//! [`EnqueuedBucketId`] carried on [`EnqueuedBucket`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use crate::capability::WorkerCapabilityRequirement;
use crate::configuration::TestEntryConfiguration;
use crate::id::{EnqueuedBucketId, RequestId};
use crate::test_entry::TestEntry;
use crate::worker::WorkerId;

/// Hex SHA-256 over a bucket's normalized content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(pub SmolStr);

impl BucketId {
    pub fn from_string(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self, n: usize) -> &str {
        &self.0[..n.min(self.0.len())]
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BucketId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl Borrow<str> for BucketId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Fingerprint of a [`TestEntryConfiguration`], used to key test history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationFingerprint(pub SmolStr);

impl ConfigurationFingerprint {
    pub fn of(configuration: &TestEntryConfiguration) -> Self {
        Self(content_hash(configuration))
    }
}

/// Hex SHA-256 of the JSON encoding of `content`.
///
/// Every hashed type serializes to JSON with string map keys and ordered
/// collections, so the encoding is total and stable across builds.
fn content_hash(content: &impl Serialize) -> SmolStr {
    let mut hasher = Sha256::new();
    match serde_json::to_vec(content) {
        Ok(bytes) => hasher.update(&bytes),
        Err(_) => hasher.update(std::any::type_name_of_val(content).as_bytes()),
    }
    SmolStr::new(format!("{:x}", hasher.finalize()))
}

/// What a bucket id is computed over: entries sorted with duplicates kept.
#[derive(Serialize)]
struct NormalizedBucket<'a> {
    kind: &'static str,
    test_entries: Vec<&'a TestEntry>,
    configuration: &'a TestEntryConfiguration,
    worker_capability_requirements: &'a BTreeSet<WorkerCapabilityRequirement>,
}

/// Run a set of iOS tests sharing one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIosTestsPayload {
    pub test_entries: Vec<TestEntry>,
    pub configuration: TestEntryConfiguration,
}

/// What a bucket asks a worker to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BucketPayload {
    RunIosTests(RunIosTestsPayload),
}

impl BucketPayload {
    pub fn test_entries(&self) -> &[TestEntry] {
        match self {
            Self::RunIosTests(p) => &p.test_entries,
        }
    }

    pub fn configuration(&self) -> &TestEntryConfiguration {
        match self {
            Self::RunIosTests(p) => &p.configuration,
        }
    }

    pub fn number_of_retries(&self) -> u32 {
        self.configuration().test_execution_behavior.number_of_retries
    }

    /// Same payload kind and context, carrying `test_entries` instead.
    pub fn with_test_entries(&self, test_entries: Vec<TestEntry>) -> Self {
        match self {
            Self::RunIosTests(p) => Self::RunIosTests(RunIosTestsPayload {
                test_entries,
                configuration: p.configuration.clone(),
            }),
        }
    }
}

/// Immutable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    bucket_id: BucketId,
    payload: BucketPayload,
    worker_capability_requirements: BTreeSet<WorkerCapabilityRequirement>,
}

impl Bucket {
    pub fn new(
        payload: BucketPayload,
        worker_capability_requirements: BTreeSet<WorkerCapabilityRequirement>,
    ) -> Self {
        let bucket_id = BucketId(Self::compute_id(&payload, &worker_capability_requirements));
        Self { bucket_id, payload, worker_capability_requirements }
    }

    fn compute_id(
        payload: &BucketPayload,
        worker_capability_requirements: &BTreeSet<WorkerCapabilityRequirement>,
    ) -> SmolStr {
        let (kind, configuration) = match payload {
            BucketPayload::RunIosTests(p) => ("runIosTests", &p.configuration),
        };
        let mut test_entries: Vec<&TestEntry> = payload.test_entries().iter().collect();
        test_entries.sort();
        content_hash(&NormalizedBucket {
            kind,
            test_entries,
            configuration,
            worker_capability_requirements,
        })
    }

    pub fn bucket_id(&self) -> &BucketId {
        &self.bucket_id
    }

    pub fn payload(&self) -> &BucketPayload {
        &self.payload
    }

    pub fn worker_capability_requirements(&self) -> &BTreeSet<WorkerCapabilityRequirement> {
        &self.worker_capability_requirements
    }

    pub fn test_entries(&self) -> &[TestEntry] {
        self.payload.test_entries()
    }

    /// A new bucket (with its own id) running only `test_entries`.
    pub fn with_test_entries(&self, test_entries: Vec<TestEntry>) -> Self {
        Self::new(
            self.payload.with_test_entries(test_entries),
            self.worker_capability_requirements.clone(),
        )
    }

    /// One single-entry bucket per test entry, in order.
    pub fn split_into_single_entry_buckets(&self) -> Vec<Bucket> {
        self.test_entries().iter().map(|e| self.with_test_entries(vec![e.clone()])).collect()
    }

    pub fn configuration_fingerprint(&self) -> ConfigurationFingerprint {
        ConfigurationFingerprint::of(self.payload.configuration())
    }
}

/// A bucket admitted to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueuedBucket {
    pub bucket: Bucket,
    pub enqueue_timestamp_ms: u64,
    pub unique_id: EnqueuedBucketId,
}

impl EnqueuedBucket {
    pub fn new(bucket: Bucket, enqueue_timestamp_ms: u64, unique_id: EnqueuedBucketId) -> Self {
        Self { bucket, enqueue_timestamp_ms, unique_id }
    }

    pub fn bucket_id(&self) -> &BucketId {
        self.bucket.bucket_id()
    }
}

/// An enqueued bucket claimed by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DequeuedBucket {
    pub enqueued_bucket: EnqueuedBucket,
    pub worker_id: WorkerId,
    /// The dequeue call that claimed it, when the worker supplied one.
    pub request_id: Option<RequestId>,
}

impl DequeuedBucket {
    pub fn bucket(&self) -> &Bucket {
        &self.enqueued_bucket.bucket
    }

    pub fn bucket_id(&self) -> &BucketId {
        self.enqueued_bucket.bucket_id()
    }

    pub fn unique_id(&self) -> &EnqueuedBucketId {
        &self.enqueued_bucket.unique_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StuckReason {
    /// The worker is alive but no longer reports the bucket as in flight.
    BucketLost,
    WorkerIsSilent,
    WorkerIsBlocked,
}

crate::simple_display! {
    StuckReason {
        BucketLost => "bucketLost",
        WorkerIsSilent => "workerIsSilent",
        WorkerIsBlocked => "workerIsBlocked",
    }
}

/// A dequeued bucket whose worker can no longer be trusted to finish it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuckBucket {
    pub bucket: DequeuedBucket,
    pub reason: StuckReason,
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
