// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bq-core: value types shared by the bucket queue and its request layer

pub mod macros;

pub mod aliveness;
pub mod bucket;
pub mod capability;
pub mod clock;
pub mod configuration;
pub mod id;
pub mod result;
pub mod signature;
pub mod test_entry;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use aliveness::{WorkerAliveness, WorkerStatus, WorkerUtilizationPermission};
pub use bucket::{
    Bucket, BucketId, BucketPayload, ConfigurationFingerprint, DequeuedBucket, EnqueuedBucket,
    RunIosTestsPayload, StuckBucket, StuckReason,
};
pub use capability::{
    requirements_satisfied, WorkerCapability, WorkerCapabilityConstraint,
    WorkerCapabilityRequirement,
};
pub use clock::{Clock, FakeClock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use configuration::TestEntryConfigurationBuilder;
pub use configuration::{
    BuildArtifacts, SimulatorOperationTimeouts, SimulatorSettings, TestDestination,
    TestEntryConfiguration, TestExecutionBehavior, TestTimeoutConfiguration, TestType,
};
pub use id::{EnqueuedBucketId, IdGen, NanoIdGen, RequestId, SequentialIdGen};
pub use result::{TestEntryResult, TestException, TestRunResult, TestingResult};
pub use signature::PayloadSignature;
pub use test_entry::{ConfiguredTestEntry, TestEntry, TestName};
pub use worker::{WorkerAddress, WorkerConfiguration, WorkerId, WorkerSpecificConfig};
