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

//! Repository traits for node operations.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{Node, ProvisionStateOpts};

/// Raw access to nodes of the provisioning service.
///
/// Implementations return [`RemoteError::Conflict`] when the node is locked by
/// another operation; every other error is treated as transient.
#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// Fetch the current state of a node.
    async fn get_node(&self, node_id: &str) -> Result<Node, RemoteError>;

    /// Request a provision state change.
    async fn change_provision_state(
        &self,
        node_id: &str,
        opts: &ProvisionStateOpts,
    ) -> Result<(), RemoteError>;

    /// Put the node into maintenance mode.
    async fn set_maintenance(&self, node_id: &str, reason: &str) -> Result<(), RemoteError>;

    /// Take the node out of maintenance mode.
    async fn unset_maintenance(&self, node_id: &str) -> Result<(), RemoteError>;
}
