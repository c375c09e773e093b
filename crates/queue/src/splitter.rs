// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policies for cutting a homogeneous group of test entries into chunks.
//!
//! All splitters are pure: the same input and [`BucketSplitInfo`] always
//! produce the same chunks, in input order.

use serde::{Deserialize, Serialize};

/// Fleet shape the split is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSplitInfo {
    pub number_of_workers: usize,
    /// Buckets the fleet can run at once (workers times simulators).
    #[serde(default)]
    pub number_of_parallel_buckets: usize,
}

impl BucketSplitInfo {
    pub fn new(number_of_workers: usize, number_of_parallel_buckets: usize) -> Self {
        Self { number_of_workers, number_of_parallel_buckets }
    }

    pub fn number_of_destinations(&self) -> usize {
        self.number_of_parallel_buckets.max(self.number_of_workers).max(1)
    }
}

impl Default for BucketSplitInfo {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitStrategy {
    /// One test per bucket.
    Individual,
    /// Chunks of `size`; the last may be smaller. Zero means unsplit.
    FixedBucketSize { size: usize },
    /// One nearly-equal contiguous chunk per destination.
    EquallyDivided,
    /// Large chunks first, shrinking towards the tail.
    Progressive,
    /// Everything in a single chunk.
    Unsplit,
}

bq_core::simple_display! {
    SplitStrategy {
        Individual => "individual",
        FixedBucketSize { .. } => "fixed_bucket_size",
        EquallyDivided => "equally_divided",
        Progressive => "progressive",
        Unsplit => "unsplit",
    }
}

const PROGRESSIVE_START: f64 = 0.4;
const PROGRESSIVE_CHANGE: f64 = 0.6;

impl SplitStrategy {
    pub fn split<T: Clone>(&self, inputs: &[T], info: &BucketSplitInfo) -> Vec<Vec<T>> {
        match self {
            Self::Individual => split_to_chunks(inputs, 1),
            Self::FixedBucketSize { size } => split_to_chunks(inputs, *size),
            Self::EquallyDivided => split_equally(inputs, info.number_of_destinations()),
            Self::Progressive => split_to_variable_chunks(
                inputs,
                PROGRESSIVE_START / info.number_of_destinations() as f64,
                PROGRESSIVE_CHANGE,
                0.0,
            ),
            Self::Unsplit => split_to_chunks(inputs, 0),
        }
    }
}

/// Chunks of `size` in order; `size == 0` yields one chunk with everything.
pub fn split_to_chunks<T: Clone>(inputs: &[T], size: usize) -> Vec<Vec<T>> {
    if inputs.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![inputs.to_vec()];
    }
    inputs.chunks(size).map(<[T]>::to_vec).collect()
}

/// `parts` contiguous chunks whose sizes differ by at most one; empty chunks
/// are omitted.
pub fn split_equally<T: Clone>(inputs: &[T], parts: usize) -> Vec<Vec<T>> {
    let parts = parts.max(1);
    let base = inputs.len() / parts;
    let remainder = inputs.len() % parts;
    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = base + usize::from(i < remainder);
        if len == 0 {
            break;
        }
        chunks.push(inputs[start..start + len].to_vec());
        start += len;
    }
    chunks
}

/// Each chunk takes `ceil(total * relative)` entries (at least one), after
/// which `relative` is multiplied by `change`, never dropping below `minimum`.
pub fn split_to_variable_chunks<T: Clone>(
    inputs: &[T],
    starting_relative_size: f64,
    change: f64,
    minimum_relative_size: f64,
) -> Vec<Vec<T>> {
    let total = inputs.len() as f64;
    let mut relative = starting_relative_size;
    let mut chunks = Vec::new();
    let mut rest = inputs;
    while !rest.is_empty() {
        let wanted = ((total * relative).ceil() as usize).max(1);
        let (chunk, tail) = rest.split_at(wanted.min(rest.len()));
        chunks.push(chunk.to_vec());
        rest = tail;
        relative = (relative * change).max(minimum_relative_size);
    }
    chunks
}

#[cfg(test)]
#[path = "splitter_tests.rs"]
mod tests;
