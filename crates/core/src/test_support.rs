// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use std::collections::BTreeSet;

use crate::{
    Bucket, BucketPayload, ConfiguredTestEntry, RunIosTestsPayload, TestDestination, TestEntry,
    TestEntryConfiguration, TestEntryResult, TestExecutionBehavior, TestName, TestRunResult,
    TestingResult, WorkerCapability, WorkerCapabilityConstraint, WorkerCapabilityRequirement,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core value types.
pub mod strategies {
    use crate::{TestEntry, TestName};
    use proptest::prelude::*;

    /// Test entries drawn from a small name space so duplicates are common.
    pub fn arb_test_entry() -> impl Strategy<Value = TestEntry> {
        (0u8..4, 0u8..6).prop_map(|(class, method)| {
            TestEntry::new(TestName::new(format!("Class{class}"), format!("test{method}")))
        })
    }

    pub fn arb_test_entries(max: usize) -> impl Strategy<Value = Vec<TestEntry>> {
        prop::collection::vec(arb_test_entry(), 1..=max)
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

pub fn test_entry(method: &str) -> TestEntry {
    TestEntry::new(TestName::new("SmokeTests", method))
}

pub fn test_entries(methods: &[&str]) -> Vec<TestEntry> {
    methods.iter().map(|m| test_entry(m)).collect()
}

pub fn configuration_with_retries(number_of_retries: u32) -> TestEntryConfiguration {
    TestEntryConfiguration::builder()
        .test_execution_behavior(TestExecutionBehavior::with_retries(number_of_retries))
        .build()
}

pub fn configured_entries(
    methods: &[&str],
    configuration: &TestEntryConfiguration,
) -> Vec<ConfiguredTestEntry> {
    test_entries(methods)
        .into_iter()
        .map(|e| ConfiguredTestEntry::new(e, configuration.clone()))
        .collect()
}

pub fn bucket_for(entries: Vec<TestEntry>, configuration: TestEntryConfiguration) -> Bucket {
    let requirements = configuration.worker_capability_requirements.clone();
    Bucket::new(
        BucketPayload::RunIosTests(RunIosTestsPayload { test_entries: entries, configuration }),
        requirements,
    )
}

/// Bucket of `methods` with no retries and no requirements.
pub fn bucket(methods: &[&str]) -> Bucket {
    bucket_with_retries(methods, 0)
}

pub fn bucket_with_retries(methods: &[&str], number_of_retries: u32) -> Bucket {
    bucket_for(test_entries(methods), configuration_with_retries(number_of_retries))
}

pub fn bucket_requiring(methods: &[&str], requirements: &[WorkerCapabilityRequirement]) -> Bucket {
    let configuration = TestEntryConfiguration::builder()
        .worker_capability_requirements(requirements.iter().cloned().collect())
        .build();
    bucket_for(test_entries(methods), configuration)
}

pub fn gpu_required() -> WorkerCapabilityRequirement {
    WorkerCapabilityRequirement::new("gpu", WorkerCapabilityConstraint::present())
}

pub fn capabilities(pairs: &[(&str, &str)]) -> BTreeSet<WorkerCapability> {
    pairs.iter().map(|(n, v)| WorkerCapability::new(*n, *v)).collect()
}

pub fn destination() -> TestDestination {
    TestDestination::new("iPhone 15", "17.0")
}

/// Result reporting each `(method, succeeded)` pair once.
pub fn testing_result(outcomes: &[(&str, bool)]) -> TestingResult {
    let results = outcomes
        .iter()
        .map(|(method, ok)| {
            let run = if *ok {
                TestRunResult::success("host")
            } else {
                TestRunResult::failure("host", "assertion failed")
            };
            TestEntryResult::with_runs(test_entry(method), vec![run])
        })
        .collect();
    TestingResult::new(destination(), results)
}

/// Result in which every test entry of `bucket` has the same outcome.
pub fn testing_result_for(bucket: &Bucket, succeeded: bool) -> TestingResult {
    let results = bucket
        .test_entries()
        .iter()
        .map(|e| {
            let run = if succeeded {
                TestRunResult::success("host")
            } else {
                TestRunResult::failure("host", "assertion failed")
            };
            TestEntryResult::with_runs(e.clone(), vec![run])
        })
        .collect();
    TestingResult::new(destination(), results)
}
