// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes and ID generation abstractions.

use parking_lot::Mutex;
use std::sync::Arc;

/// Source of process-unique identifier strings.
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Random identifiers (nanoid).
#[derive(Clone, Default)]
pub struct NanoIdGen;

impl IdGen for NanoIdGen {
    fn next(&self) -> String {
        nanoid::nanoid!(19)
    }
}

/// Predictable identifiers for tests: `{prefix}-1`, `{prefix}-2`, ...
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<Mutex<u64>>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: Arc::new(Mutex::new(0)) }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let mut counter = self.counter.lock();
        *counter += 1;
        format!("{}-{}", self.prefix, *counter)
    }
}

/// Define a newtype ID wrapper around `SmolStr` with a type prefix.
///
/// Generates `new()` for random ID generation, `from_string()` for parsing,
/// `as_str()`, `short()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `Borrow<str>`, and `Deref` implementations.
///
/// The ID format is `{prefix}{nanoid}` where:
/// - `prefix`: 4 character type indicator (e.g., "enq-", "req-")
/// - `nanoid`: 19 character random ID
/// - Total: 23 characters (exactly fits SmolStr inline capacity)
///
/// IDs received from the outside (e.g. a worker's request id) are accepted
/// verbatim through `from_string()` and need not carry the prefix.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct EnqueuedBucketId("enq-");
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($prefix:literal);
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new random ID with the type prefix
            pub fn new() -> Self {
                Self(smol_str::SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19))))
            }

            /// Create ID from existing string (for parsing/deserialization)
            pub fn from_string(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the id without its prefix, truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                let suffix = self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0);
                let end = std::cmp::min(n, suffix.len());
                &suffix[..end]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Distinguishes two enqueues of an otherwise identical bucket.
    ///
    /// The same [`crate::Bucket`] may legitimately be admitted more than once
    /// (retries, reclaimed fragments, duplicate test entries), so the holder
    /// keys its collections on this id rather than on the bucket's content id.
    pub struct EnqueuedBucketId("enq-");
}

define_id! {
    /// Worker-chosen identifier of a single dequeue call.
    ///
    /// Re-sending a dequeue with the same request id returns the bucket that
    /// was already handed out for it.
    pub struct RequestId("req-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
