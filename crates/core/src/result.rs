// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Results a worker reports for the tests of one bucket.

use serde::{Deserialize, Serialize};

use crate::configuration::TestDestination;
use crate::test_entry::TestEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestException {
    pub reason: String,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
}

impl TestException {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into(), file_path: None, line_number: None }
    }
}

/// One execution of one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResult {
    pub succeeded: bool,
    #[serde(default)]
    pub exceptions: Vec<TestException>,
    pub duration_ms: u64,
    pub start_epoch_ms: u64,
    pub host_name: String,
}

impl TestRunResult {
    pub fn success(host_name: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            exceptions: Vec::new(),
            duration_ms: 0,
            start_epoch_ms: 0,
            host_name: host_name.into(),
        }
    }

    pub fn failure(host_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            exceptions: vec![TestException::new(reason)],
            duration_ms: 0,
            start_epoch_ms: 0,
            host_name: host_name.into(),
        }
    }
}

/// All runs of one test entry within a submitted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntryResult {
    pub test_entry: TestEntry,
    pub test_run_results: Vec<TestRunResult>,
}

impl TestEntryResult {
    pub fn with_runs(test_entry: TestEntry, test_run_results: Vec<TestRunResult>) -> Self {
        Self { test_entry, test_run_results }
    }

    /// Result for an entry the worker never reported on.
    pub fn lost(test_entry: TestEntry) -> Self {
        Self { test_entry, test_run_results: Vec::new() }
    }

    pub fn is_lost(&self) -> bool {
        self.test_run_results.is_empty()
    }

    /// Any successful run counts; a lost entry has not succeeded.
    pub fn succeeded(&self) -> bool {
        self.test_run_results.iter().any(|r| r.succeeded)
    }
}

/// What a worker submits for a dequeued bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestingResult {
    pub test_destination: TestDestination,
    pub unfiltered_results: Vec<TestEntryResult>,
}

impl TestingResult {
    pub fn new(test_destination: TestDestination, unfiltered_results: Vec<TestEntryResult>) -> Self {
        Self { test_destination, unfiltered_results }
    }

    pub fn successful_tests(&self) -> impl Iterator<Item = &TestEntryResult> {
        self.unfiltered_results.iter().filter(|r| r.succeeded())
    }

    pub fn failed_tests(&self) -> impl Iterator<Item = &TestEntryResult> {
        self.unfiltered_results.iter().filter(|r| !r.succeeded())
    }
}
