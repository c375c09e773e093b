// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context shared by the test entries of one bucket.
//!
//! Two configured entries may share a bucket only when every field here is
//! equal, so all types derive `Eq + Hash` and keep their collections ordered.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::capability::WorkerCapabilityRequirement;

/// Simulator model plus OS runtime a test runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestDestination {
    pub device_type: String,
    pub runtime: String,
}

impl TestDestination {
    pub fn new(device_type: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self { device_type: device_type.into(), runtime: runtime.into() }
    }
}

/// Locations of the build products a test needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildArtifacts {
    pub app_bundle: Option<String>,
    pub runner: Option<String>,
    pub xc_test_bundle: String,
    #[serde(default)]
    pub additional_application_bundles: Vec<String>,
}

impl BuildArtifacts {
    pub fn only_with_xctest_bundle(xc_test_bundle: impl Into<String>) -> Self {
        Self {
            app_bundle: None,
            runner: None,
            xc_test_bundle: xc_test_bundle.into(),
            additional_application_bundles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestType {
    LogicTest,
    AppTest,
    UiTest,
}

crate::simple_display! {
    TestType {
        LogicTest => "logicTest",
        AppTest => "appTest",
        UiTest => "uiTest",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestExecutionBehavior {
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// How many additional attempts a failing test gets.
    pub number_of_retries: u32,
}

impl TestExecutionBehavior {
    pub fn with_retries(number_of_retries: u32) -> Self {
        Self { environment: BTreeMap::new(), number_of_retries }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestTimeoutConfiguration {
    pub single_test_maximum_duration_secs: u64,
    pub test_runner_maximum_silence_duration_secs: u64,
}

impl Default for TestTimeoutConfiguration {
    fn default() -> Self {
        Self { single_test_maximum_duration_secs: 180, test_runner_maximum_silence_duration_secs: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SimulatorSettings {
    #[serde(default)]
    pub localization: Option<String>,
    #[serde(default)]
    pub keyboard_languages: Vec<String>,
    #[serde(default)]
    pub watchdog_bundle_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulatorOperationTimeouts {
    pub create_secs: u64,
    pub boot_secs: u64,
    pub delete_secs: u64,
    pub shutdown_secs: u64,
}

impl Default for SimulatorOperationTimeouts {
    fn default() -> Self {
        Self { create_secs: 30, boot_secs: 180, delete_secs: 20, shutdown_secs: 20 }
    }
}

/// Everything besides the test itself that determines how it runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestEntryConfiguration {
    pub build_artifacts: BuildArtifacts,
    pub developer_dir: String,
    #[serde(default)]
    pub plugin_locations: BTreeSet<String>,
    #[serde(default)]
    pub simulator_operation_timeouts: SimulatorOperationTimeouts,
    #[serde(default)]
    pub simulator_settings: SimulatorSettings,
    pub test_destination: TestDestination,
    pub test_execution_behavior: TestExecutionBehavior,
    #[serde(default)]
    pub test_timeout_configuration: TestTimeoutConfiguration,
    pub test_type: TestType,
    #[serde(default)]
    pub worker_capability_requirements: BTreeSet<WorkerCapabilityRequirement>,
}

crate::builder! {
    pub struct TestEntryConfigurationBuilder => TestEntryConfiguration {
        into {
            developer_dir: String = "/Applications/Xcode.app/Contents/Developer",
        }
        set {
            build_artifacts: BuildArtifacts = BuildArtifacts::only_with_xctest_bundle("/build/Tests.xctest"),
            plugin_locations: BTreeSet<String> = BTreeSet::new(),
            simulator_operation_timeouts: SimulatorOperationTimeouts = SimulatorOperationTimeouts::default(),
            simulator_settings: SimulatorSettings = SimulatorSettings::default(),
            test_destination: TestDestination = TestDestination::new("iPhone 15", "17.0"),
            test_execution_behavior: TestExecutionBehavior = TestExecutionBehavior::with_retries(0),
            test_timeout_configuration: TestTimeoutConfiguration = TestTimeoutConfiguration::default(),
            test_type: TestType = TestType::UiTest,
            worker_capability_requirements: BTreeSet<WorkerCapabilityRequirement> = BTreeSet::new(),
        }
    }
}
