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

//! Shared test infrastructure for servicing tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::controller::{ServicingContext, ServicingController};
use crate::error::{RemoteError, ServicingError};
use crate::repository::NodeRepository;
use crate::types::*;

pub(crate) const NODE_ID: &str = "4e41bc3d-8f2a-4b0f-a1c6-8f4d2a9e7b10";
pub(crate) const REDFISH_BMC: &str = "redfish+https://10.217.0.10/redfish/v1/Systems/1";
pub(crate) const IDRAC_BMC: &str =
    "idrac-virtualmedia://10.217.0.11/redfish/v1/Systems/System.Embedded.1";

/// Calls received by [`NodeMock`], in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetNode,
    ChangeProvisionState(ProvisionStateOpts),
    SetMaintenance(String),
    UnsetMaintenance,
}

impl Call {
    fn is_mutation(&self) -> bool {
        !matches!(self, Call::GetNode)
    }
}

/// In-memory NodeRepository that records every call.
///
/// Accepted service requests move the node to `servicing`, maintenance
/// requests flip the flag. Abort requests are only recorded.
#[derive(Clone, Default)]
pub(crate) struct NodeMock {
    node: Arc<RwLock<Node>>,
    calls: Arc<Mutex<Vec<Call>>>,
    get_error: Arc<Mutex<Option<RemoteError>>>,
    mutation_error: Arc<Mutex<Option<RemoteError>>>,
}

impl NodeMock {
    pub fn with_state(state: &str) -> Self {
        let mock = Self::default();
        *mock.node.write().unwrap() = Node {
            uuid: NODE_ID.to_string(),
            provision_state: state.to_string(),
            ..Default::default()
        };
        mock
    }

    pub fn with_maintenance(self, reason: &str) -> Self {
        {
            let mut node = self.node.write().unwrap();
            node.maintenance = true;
            node.maintenance_reason = Some(reason.to_string());
        }
        self
    }

    pub fn with_last_error(self, last_error: &str) -> Self {
        self.node.write().unwrap().last_error = Some(last_error.to_string());
        self
    }

    pub fn set_state(&self, state: &str) {
        self.node.write().unwrap().provision_state = state.to_string();
    }

    pub fn fail_get(&self, err: RemoteError) {
        *self.get_error.lock().unwrap() = Some(err);
    }

    pub fn fail_mutations(&self, err: RemoteError) {
        *self.mutation_error.lock().unwrap() = Some(err);
    }

    pub fn node(&self) -> Node {
        self.node.read().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn record(&self, call: Call) -> Result<(), RemoteError> {
        let is_mutation = call.is_mutation();
        self.calls.lock().unwrap().push(call);
        if is_mutation && let Some(err) = self.mutation_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl NodeRepository for NodeMock {
    async fn get_node(&self, node_id: &str) -> Result<Node, RemoteError> {
        self.record(Call::GetNode)?;
        if let Some(err) = self.get_error.lock().unwrap().clone() {
            return Err(err);
        }
        let node = self.node();
        if node.uuid != node_id {
            return Err(RemoteError::not_found(node_id));
        }
        Ok(node)
    }

    async fn change_provision_state(
        &self,
        _node_id: &str,
        opts: &ProvisionStateOpts,
    ) -> Result<(), RemoteError> {
        self.record(Call::ChangeProvisionState(opts.clone()))?;
        if opts.target == ProvisionTarget::Service {
            self.set_state("servicing");
        }
        Ok(())
    }

    async fn set_maintenance(&self, _node_id: &str, reason: &str) -> Result<(), RemoteError> {
        self.record(Call::SetMaintenance(reason.to_string()))?;
        let mut node = self.node.write().unwrap();
        node.maintenance = true;
        node.maintenance_reason = Some(reason.to_string());
        Ok(())
    }

    async fn unset_maintenance(&self, _node_id: &str) -> Result<(), RemoteError> {
        self.record(Call::UnsetMaintenance)?;
        let mut node = self.node.write().unwrap();
        node.maintenance = false;
        node.maintenance_reason = None;
        Ok(())
    }
}

pub(crate) fn context<'a>(
    mock: &'a NodeMock,
    bmc_address: &'a str,
) -> ServicingContext<'a, NodeMock> {
    ServicingContext {
        repo: mock,
        node_id: NODE_ID,
        bmc_address,
        features: AvailableFeatures::new(89),
    }
}

/// Run one pass with the default configuration against a redfish BMC.
pub(crate) async fn run_pass(
    mock: &NodeMock,
    data: &ServicingData,
    unprepared: bool,
    restart_on_failure: bool,
) -> Result<ServiceResult, ServicingError> {
    ServicingController::default()
        .service(&context(mock, REDFISH_BMC), data, unprepared, restart_on_failure)
        .await
}

/// Desired state with one BIOS setting that differs from the node.
pub(crate) fn settings_change() -> ServicingData {
    ServicingData {
        actual_firmware_settings: BTreeMap::from([("NumLock".to_string(), "On".to_string())]),
        target_firmware_settings: BTreeMap::from([("NumLock".to_string(), "Off".into())]),
        has_firmware_settings_spec: true,
        servicing_triggered_by_settings: true,
        ..Default::default()
    }
}

/// Desired state with one firmware component update.
pub(crate) fn component_update() -> ServicingData {
    ServicingData {
        target_firmware_components: vec![FirmwareComponentUpdate {
            component: "bmc".to_string(),
            url: "http://fw.example.com/bmc-2.1.0.bin".to_string(),
        }],
        has_firmware_components_spec: true,
        servicing_triggered_by_components: true,
        ..Default::default()
    }
}

/// Desired state whose settings already match the node.
pub(crate) fn settled() -> ServicingData {
    ServicingData {
        actual_firmware_settings: BTreeMap::from([("NumLock".to_string(), "On".to_string())]),
        target_firmware_settings: BTreeMap::from([("NumLock".to_string(), "On".into())]),
        has_firmware_settings_spec: true,
        ..Default::default()
    }
}
