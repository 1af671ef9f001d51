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

//! Service step planning.
//!
//! Decides which service steps a node needs to converge on the desired
//! servicing data. The BIOS step always carries the full desired mapping;
//! the delta against the actual settings only decides whether it is needed.

use std::collections::BTreeMap;

use serde_json::json;

use crate::bmc::BmcAccess;
use crate::error::BmcError;
use crate::types::{
    BiosSetting, DesiredSettingsMap, FirmwareComponentUpdate, ServiceStep, ServicingData,
    SettingsMap, StepInterface,
};

pub const APPLY_CONFIGURATION_STEP: &str = "apply_configuration";
pub const FIRMWARE_UPDATE_STEP: &str = "update";

/// Build the ordered service steps for `data`.
///
/// An empty result means the node already matches the desired state.
/// Errors only come from translating the firmware profile.
pub fn plan_service_steps(
    bmc: &dyn BmcAccess,
    data: &ServicingData,
) -> Result<Vec<ServiceStep>, BmcError> {
    let profile_settings = bmc.build_bios_settings(data.firmware_config.as_ref())?;

    let mut steps = Vec::new();

    if let Some(settings) = changed_firmware_settings(
        &data.actual_firmware_settings,
        &data.target_firmware_settings,
        &profile_settings,
    ) {
        tracing::info!(driver = bmc.driver(), ?settings, "applying BIOS config service step");
        steps.push(bios_step(&settings));
    }

    if !data.target_firmware_components.is_empty() {
        tracing::info!(updates = ?data.target_firmware_components, "applying firmware update service step");
        steps.push(firmware_update_step(&data.target_firmware_components));
    }

    Ok(steps)
}

/// Returns the full desired settings if any of them differs from `actual`.
///
/// Profile settings win over explicit targets of the same name.
fn changed_firmware_settings(
    actual: &SettingsMap,
    target: &DesiredSettingsMap,
    profile: &[BiosSetting],
) -> Option<Vec<BiosSetting>> {
    let mut desired: BTreeMap<&str, String> = target
        .iter()
        .map(|(name, value)| (name.as_str(), value.to_string()))
        .collect();
    for setting in profile {
        desired.insert(setting.name.as_str(), setting.value.clone());
    }

    let changed = desired
        .iter()
        .any(|(name, value)| actual.get(*name) != Some(value));

    changed.then(|| {
        desired
            .into_iter()
            .map(|(name, value)| BiosSetting::new(name, value))
            .collect()
    })
}

fn bios_step(settings: &[BiosSetting]) -> ServiceStep {
    let settings = settings
        .iter()
        .map(|s| json!({ "name": s.name, "value": s.value }))
        .collect();
    ServiceStep {
        interface: StepInterface::Bios,
        step: APPLY_CONFIGURATION_STEP.to_string(),
        args: BTreeMap::from([("settings".to_string(), serde_json::Value::Array(settings))]),
    }
}

fn firmware_update_step(updates: &[FirmwareComponentUpdate]) -> ServiceStep {
    let settings = updates
        .iter()
        .map(|u| json!({ "component": u.component, "url": u.url }))
        .collect();
    ServiceStep {
        interface: StepInterface::Firmware,
        step: FIRMWARE_UPDATE_STEP.to_string(),
        args: BTreeMap::from([("settings".to_string(), serde_json::Value::Array(settings))]),
    }
}
