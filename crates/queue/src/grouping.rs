// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use indexmap::IndexMap;

use bq_core::{ConfiguredTestEntry, TestEntryConfiguration};

/// Group entries that share every configuration field, then split each group
/// so no test entry appears twice within one group. Largest groups first;
/// groups of equal size keep first-seen order.
pub fn group_by_configuration(entries: &[ConfiguredTestEntry]) -> Vec<Vec<ConfiguredTestEntry>> {
    let mut by_configuration: IndexMap<&TestEntryConfiguration, Vec<ConfiguredTestEntry>> =
        IndexMap::new();
    for entry in entries {
        by_configuration.entry(&entry.configuration).or_default().push(entry.clone());
    }

    let mut groups: Vec<Vec<ConfiguredTestEntry>> =
        by_configuration.into_values().flat_map(split_to_unique_entries).collect();
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups
}

/// The n-th occurrence of a test entry lands in the n-th group.
fn split_to_unique_entries(group: Vec<ConfiguredTestEntry>) -> Vec<Vec<ConfiguredTestEntry>> {
    let mut split: Vec<Vec<ConfiguredTestEntry>> = Vec::new();
    for entry in group {
        match split.iter_mut().find(|g| !g.iter().any(|e| e.test_entry == entry.test_entry)) {
            Some(target) => target.push(entry),
            None => split.push(vec![entry]),
        }
    }
    split
}

#[cfg(test)]
#[path = "grouping_tests.rs"]
mod tests;
