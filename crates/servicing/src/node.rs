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

//! Remote access layer for a single node.
//!
//! [`NodeClient`] turns raw [`NodeRepository`] results into servicing
//! outcomes: a locked node is a reason to come back later, any other
//! failure is transient.

use std::time::Duration;

use crate::error::ServicingError;
use crate::repository::NodeRepository;
use crate::types::{Node, Outcome, ProvisionStateOpts, ServiceResult};

/// Access to one node of the provisioning service.
pub struct NodeClient<'a, R: ?Sized> {
    repo: &'a R,
    node_id: &'a str,
    busy_requeue_delay: Duration,
}

impl<'a, R: NodeRepository + ?Sized> NodeClient<'a, R> {
    pub fn new(repo: &'a R, node_id: &'a str, busy_requeue_delay: Duration) -> Self {
        Self {
            repo,
            node_id,
            busy_requeue_delay,
        }
    }

    pub async fn get_node(&self) -> Result<Node, ServicingError> {
        self.repo
            .get_node(self.node_id)
            .await
            .map_err(|e| ServicingError::remote("get node", e))
    }

    /// Request a provision state change.
    ///
    /// `started` is only set when the request was accepted. A locked node is
    /// reported as `Continuing` so the caller retries after the busy delay.
    pub async fn try_change_provision_state(
        &self,
        node: &Node,
        opts: ProvisionStateOpts,
    ) -> Result<ServiceResult, ServicingError> {
        tracing::info!(
            node_id = %self.node_id,
            current_state = %node.provision_state,
            target = %opts.target,
            steps = opts.service_steps.len(),
            "changing provision state"
        );

        match self.repo.change_provision_state(self.node_id, &opts).await {
            Ok(()) => Ok(ServiceResult::new(Outcome::continuing(Duration::ZERO), true)),
            Err(e) if e.is_conflict() => {
                tracing::info!(node_id = %self.node_id, error = %e, "could not change state of host, busy");
                Ok(ServiceResult::not_started(Outcome::continuing(
                    self.busy_requeue_delay,
                )))
            }
            Err(e) => Err(ServicingError::remote("change provision state", e)),
        }
    }

    /// Set or clear the maintenance flag.
    ///
    /// Returns `Continuing` with no delay once the flag has been changed, so
    /// the caller re-reads the node on its next pass.
    pub async fn set_maintenance_flag(
        &self,
        node: &Node,
        value: bool,
        reason: &str,
    ) -> Result<Outcome, ServicingError> {
        if node.maintenance == value {
            tracing::debug!(node_id = %self.node_id, value, "maintenance flag already set");
            return Ok(Outcome::continuing(Duration::ZERO));
        }

        let res = if value {
            self.repo.set_maintenance(self.node_id, reason).await
        } else {
            self.repo.unset_maintenance(self.node_id).await
        };

        match res {
            Ok(()) => {
                tracing::info!(node_id = %self.node_id, new_value = value, reason, "updated maintenance flag");
                Ok(Outcome::continuing(Duration::ZERO))
            }
            Err(e) if e.is_conflict() => {
                tracing::info!(node_id = %self.node_id, error = %e, "could not update maintenance flag, busy");
                Ok(Outcome::continuing(self.busy_requeue_delay))
            }
            Err(e) => Err(ServicingError::remote("update maintenance flag", e)),
        }
    }
}
