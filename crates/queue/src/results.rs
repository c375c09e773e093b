// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bq_core::TestingResult;

/// Receives the finalized part of every accepted result.
pub trait ResultsCollector: Send + 'static {
    fn append(&mut self, result: TestingResult);

    fn collected(&self) -> Vec<TestingResult>;

    /// Number of test entries across every collected result.
    fn finalized_test_count(&self) -> usize {
        self.collected().iter().map(|r| r.unfiltered_results.len()).sum()
    }
}

/// Keeps every collected result in memory for the lifetime of the queue.
#[derive(Debug, Default)]
pub struct InMemoryResultsCollector {
    results: Vec<TestingResult>,
}

impl ResultsCollector for InMemoryResultsCollector {
    fn append(&mut self, result: TestingResult) {
        self.results.push(result);
    }

    fn collected(&self) -> Vec<TestingResult> {
        self.results.clone()
    }

    fn finalized_test_count(&self) -> usize {
        self.results.iter().map(|r| r.unfiltered_results.len()).sum()
    }
}
