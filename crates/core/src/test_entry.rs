// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::configuration::TestEntryConfiguration;

/// `ClassName/methodName` of a single test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestName {
    pub class_name: String,
    pub method_name: String,
}

impl TestName {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self { class_name: class_name.into(), method_name: method_name.into() }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class_name, self.method_name)
    }
}

/// One test: its name plus tags and an optional external case id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestEntry {
    pub test_name: TestName,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub case_id: Option<u64>,
}

impl TestEntry {
    pub fn new(test_name: TestName) -> Self {
        Self { test_name, tags: Vec::new(), case_id: None }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_case_id(mut self, case_id: u64) -> Self {
        self.case_id = Some(case_id);
        self
    }
}

impl fmt::Display for TestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.case_id {
            Some(id) => write!(f, "{} ({})", self.test_name, id),
            None => write!(f, "{}", self.test_name),
        }
    }
}

/// A test entry bound to the full context it must run in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfiguredTestEntry {
    pub test_entry: TestEntry,
    pub configuration: TestEntryConfiguration,
}

impl ConfiguredTestEntry {
    pub fn new(test_entry: TestEntry, configuration: TestEntryConfiguration) -> Self {
        Self { test_entry, configuration }
    }
}
