// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bq_core::{Bucket, BucketPayload, ConfiguredTestEntry, RunIosTestsPayload};

use crate::grouping::group_by_configuration;
use crate::splitter::{BucketSplitInfo, SplitStrategy};

/// Turn configured test entries into homogeneous buckets.
pub fn generate_buckets(
    entries: &[ConfiguredTestEntry],
    strategy: SplitStrategy,
    info: &BucketSplitInfo,
) -> Vec<Bucket> {
    group_by_configuration(entries)
        .into_iter()
        .flat_map(|group| strategy.split(&group, info))
        .filter_map(|chunk| bucket_from_chunk(chunk))
        .collect()
}

fn bucket_from_chunk(chunk: Vec<ConfiguredTestEntry>) -> Option<Bucket> {
    let configuration = chunk.first()?.configuration.clone();
    let requirements = configuration.worker_capability_requirements.clone();
    let test_entries = chunk.into_iter().map(|e| e.test_entry).collect();
    Some(Bucket::new(
        BucketPayload::RunIosTests(RunIosTestsPayload { test_entries, configuration }),
        requirements,
    ))
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
