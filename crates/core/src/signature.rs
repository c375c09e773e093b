// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared opaque request signature.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque value every request must carry; compared against the server-wide
/// expected signature before a request reaches the queue.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadSignature(pub String);

impl PayloadSignature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn matches(&self, expected: &PayloadSignature) -> bool {
        let a = self.0.as_bytes();
        let b = expected.0.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

// Never print the value itself.
impl fmt::Debug for PayloadSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PayloadSignature(..)")
    }
}

impl From<&str> for PayloadSignature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
