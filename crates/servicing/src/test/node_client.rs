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

//! Tests for the node access layer and the wire format of its requests.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::json;

use super::helpers::*;
use crate::error::{RemoteError, ServicingError};
use crate::node::NodeClient;
use crate::types::*;

const BUSY_DELAY: Duration = Duration::from_secs(7);

#[tokio::test]
async fn test_set_maintenance_flag() {
    let mock = NodeMock::with_state("active");
    let client = NodeClient::new(&mock, NODE_ID, BUSY_DELAY);
    let node = client.get_node().await.unwrap();

    let outcome = client
        .set_maintenance_flag(&node, true, "firmware inspection")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::continuing(Duration::ZERO));
    assert_eq!(
        mock.mutations(),
        vec![Call::SetMaintenance("firmware inspection".to_string())]
    );
    assert_eq!(
        mock.node().maintenance_reason.as_deref(),
        Some("firmware inspection")
    );
}

#[tokio::test]
async fn test_maintenance_flag_already_cleared_sends_nothing() {
    let mock = NodeMock::with_state("service failed");
    let client = NodeClient::new(&mock, NODE_ID, BUSY_DELAY);
    let node = client.get_node().await.unwrap();

    let outcome = client.set_maintenance_flag(&node, false, "").await.unwrap();

    assert_eq!(outcome, Outcome::continuing(Duration::ZERO));
    assert!(mock.mutations().is_empty());
}

#[tokio::test]
async fn test_maintenance_flag_on_busy_node() {
    let mock = NodeMock::with_state("service failed").with_maintenance("step failed");
    mock.fail_mutations(RemoteError::Conflict("node is locked".to_string()));
    let client = NodeClient::new(&mock, NODE_ID, BUSY_DELAY);
    let node = client.get_node().await.unwrap();

    let outcome = client.set_maintenance_flag(&node, false, "").await.unwrap();

    assert_eq!(outcome, Outcome::continuing(BUSY_DELAY));
    assert!(mock.node().maintenance);
}

#[tokio::test]
async fn test_maintenance_flag_remote_failure() {
    let mock = NodeMock::with_state("service failed").with_maintenance("step failed");
    mock.fail_mutations(RemoteError::Transport("connection reset".to_string()));
    let client = NodeClient::new(&mock, NODE_ID, BUSY_DELAY);
    let node = client.get_node().await.unwrap();

    let err = client
        .set_maintenance_flag(&node, false, "")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServicingError::Remote {
            operation: "update maintenance flag",
            ..
        }
    ));
}

#[tokio::test]
async fn test_unknown_node() {
    let mock = NodeMock::with_state("active");
    let client = NodeClient::new(&mock, "missing-node", BUSY_DELAY);

    let err = client.get_node().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to get node: Node not found: missing-node"
    );
}

#[test]
fn test_service_request_wire_format() {
    let opts = ProvisionStateOpts::service(vec![
        ServiceStep {
            interface: StepInterface::Bios,
            step: "apply_configuration".to_string(),
            args: BTreeMap::from([(
                "settings".to_string(),
                json!([{"name": "LogicalProc", "value": "Disabled"}]),
            )]),
        },
        ServiceStep {
            interface: StepInterface::Firmware,
            step: "update".to_string(),
            args: BTreeMap::from([(
                "settings".to_string(),
                json!([{"component": "bmc", "url": "http://fw.example.com/bmc.bin"}]),
            )]),
        },
    ]);

    assert_eq!(
        serde_json::to_value(&opts).unwrap(),
        json!({
            "target": "service",
            "service_steps": [
                {
                    "interface": "bios",
                    "step": "apply_configuration",
                    "args": {"settings": [{"name": "LogicalProc", "value": "Disabled"}]}
                },
                {
                    "interface": "firmware",
                    "step": "update",
                    "args": {"settings": [{"component": "bmc", "url": "http://fw.example.com/bmc.bin"}]}
                }
            ]
        })
    );
    assert_eq!(
        serde_json::to_value(ProvisionStateOpts::abort()).unwrap(),
        json!({"target": "abort"})
    );
}

#[test]
fn test_node_from_api_response() {
    let node: Node = serde_json::from_value(json!({
        "uuid": NODE_ID,
        "provision_state": "service wait",
        "maintenance": true,
        "maintenance_reason": null,
        "last_error": null,
        "service_step": {"interface": "firmware", "step": "update"},
        "power_state": "power on"
    }))
    .unwrap();

    assert_eq!(node.provision_state(), ProvisionState::ServiceWait);
    assert!(node.maintenance);
    assert_eq!(node.maintenance_reason, None);
    assert_eq!(node.last_error(), "");
    assert_eq!(ProvisionState::from("enroll").to_string(), "enroll");
}
