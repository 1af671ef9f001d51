/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Shared types for the servicing controller.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Firmware settings as currently reported by the node (name -> value).
pub type SettingsMap = BTreeMap<String, String>;

/// Firmware settings requested by the user (name -> value).
pub type DesiredSettingsMap = BTreeMap<String, SettingValue>;

/// Minimum API minor version of the provisioning service that supports servicing.
pub const SERVICING_API_VERSION: u32 = 87;

/// A desired firmware setting value. Users may write either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    String(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

/// Vendor-neutral firmware configuration profile.
///
/// Each field maps to one vendor-specific BIOS attribute, see
/// [`crate::bmc::BmcAccess::build_bios_settings`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareConfig {
    pub virtualization_enabled: Option<bool>,
    pub simultaneous_multithreading_enabled: Option<bool>,
    pub sriov_enabled: Option<bool>,
}

/// A single vendor-specific BIOS setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiosSetting {
    pub name: String,
    pub value: String,
}

impl BiosSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A firmware component update requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareComponentUpdate {
    /// Component name (e.g. "bios", "bmc", "nic:NIC.Slot.1").
    pub component: String,
    /// Location of the firmware image.
    pub url: String,
}

/// Desired servicing state for one node, supplied by the reconciler on every pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicingData {
    /// Firmware settings as last reported by the node.
    pub actual_firmware_settings: SettingsMap,
    /// Firmware settings the user asked for.
    pub target_firmware_settings: DesiredSettingsMap,
    /// Optional vendor-neutral profile.
    pub firmware_config: Option<FirmwareConfig>,
    /// Firmware component updates the user asked for.
    pub target_firmware_components: Vec<FirmwareComponentUpdate>,

    /// Whether a firmware settings spec currently exists.
    pub has_firmware_settings_spec: bool,
    /// Whether a firmware components spec currently exists.
    pub has_firmware_components_spec: bool,
    /// Whether the running operation was started because of settings.
    /// Set once by the caller when servicing starts.
    pub servicing_triggered_by_settings: bool,
    /// Whether the running operation was started because of component updates.
    /// Set once by the caller when servicing starts.
    pub servicing_triggered_by_components: bool,
}

/// Remote interface a service step is executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepInterface {
    Bios,
    Firmware,
}

/// A single service step sent to the provisioning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStep {
    pub interface: StepInterface,
    pub step: String,
    #[serde(default)]
    pub args: BTreeMap<String, serde_json::Value>,
}

/// Provisioning phase reported by the remote system.
///
/// Only the phases servicing acts on get their own variant. Everything else
/// is kept verbatim in `Other` so the vocabulary can grow remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionState {
    /// Node is deployed and idle.
    Active,
    /// Service steps are executing.
    Servicing,
    /// A service step is waiting on the node (e.g. a reboot).
    ServiceWait,
    /// The last servicing operation failed.
    ServiceFailed,
    Other(String),
}

impl AsRef<str> for ProvisionState {
    fn as_ref(&self) -> &str {
        match self {
            ProvisionState::Active => "active",
            ProvisionState::Servicing => "servicing",
            ProvisionState::ServiceWait => "service wait",
            ProvisionState::ServiceFailed => "service failed",
            ProvisionState::Other(state) => state.as_str(),
        }
    }
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<&str> for ProvisionState {
    fn from(state: &str) -> Self {
        match state {
            "active" => ProvisionState::Active,
            "servicing" => ProvisionState::Servicing,
            "service wait" => ProvisionState::ServiceWait,
            "service failed" => ProvisionState::ServiceFailed,
            other => ProvisionState::Other(other.to_string()),
        }
    }
}

/// Target of a provision state change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionTarget {
    Service,
    Abort,
}

impl fmt::Display for ProvisionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProvisionTarget::Service => "service",
            ProvisionTarget::Abort => "abort",
        })
    }
}

/// Body of a provision state change request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionStateOpts {
    pub target: ProvisionTarget,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_steps: Vec<ServiceStep>,
}

impl ProvisionStateOpts {
    pub fn service(service_steps: Vec<ServiceStep>) -> Self {
        Self {
            target: ProvisionTarget::Service,
            service_steps,
        }
    }

    pub fn abort() -> Self {
        Self {
            target: ProvisionTarget::Abort,
            service_steps: Vec::new(),
        }
    }
}

/// Node as reported by the provisioning service. Read fresh on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub uuid: String,
    pub provision_state: String,
    pub maintenance: bool,
    pub maintenance_reason: Option<String>,
    pub last_error: Option<String>,
    /// Step currently executing. Only used for logging.
    pub service_step: Option<serde_json::Value>,
}

impl Node {
    pub fn provision_state(&self) -> ProvisionState {
        ProvisionState::from(self.provision_state.as_str())
    }

    /// Error recorded by the last failed operation, empty if none.
    pub fn last_error(&self) -> &str {
        self.last_error.as_deref().unwrap_or_default()
    }
}

/// Result of a single servicing pass, interpreted by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing left to do.
    Complete,
    /// Work is in flight. Call again no sooner than `requeue_after`.
    Continuing { requeue_after: Duration },
    /// The operation failed. `message` is shown to the user.
    Failed { message: String },
}

impl Outcome {
    pub fn complete() -> Self {
        Outcome::Complete
    }

    pub fn continuing(requeue_after: Duration) -> Self {
        Outcome::Continuing { requeue_after }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome::Failed {
            message: message.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete)
    }

    /// Whether the caller has to come back later.
    pub fn is_dirty(&self) -> bool {
        matches!(self, Outcome::Continuing { .. })
    }
}

/// Outcome of a pass plus whether this pass issued a new remote mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResult {
    pub outcome: Outcome,
    /// `true` when this pass started a provision state change.
    pub started: bool,
}

impl ServiceResult {
    pub fn new(outcome: Outcome, started: bool) -> Self {
        Self { outcome, started }
    }

    pub fn not_started(outcome: Outcome) -> Self {
        Self::new(outcome, false)
    }
}

/// Features advertised by the provisioning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableFeatures {
    /// Highest supported API minor version (the `87` in "1.87").
    pub max_version: u32,
}

impl AvailableFeatures {
    pub fn new(max_version: u32) -> Self {
        Self { max_version }
    }

    pub fn has_servicing(&self) -> bool {
        self.max_version >= SERVICING_API_VERSION
    }
}
