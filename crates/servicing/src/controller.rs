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

//! Servicing controller.
//!
//! [`ServicingController::service`] runs one reconciliation pass for a node.
//! It is called again on every poll, mid-operation, after failures and after
//! the desired spec changed, and issues at most one mutating request per
//! pass. Everything it knows about a running operation comes from the node's
//! provision state and the trigger flags in [`ServicingData`].

use crate::abort::should_abort_servicing;
use crate::bmc;
use crate::config::ServicingConfig;
use crate::error::ServicingError;
use crate::node::NodeClient;
use crate::planner::plan_service_steps;
use crate::repository::NodeRepository;
use crate::types::{
    AvailableFeatures, Node, Outcome, ProvisionState, ProvisionStateOpts, SERVICING_API_VERSION,
    ServiceResult, ServiceStep, ServicingData,
};

/// Everything a single pass needs to reach the node.
pub struct ServicingContext<'a, R: ?Sized> {
    pub repo: &'a R,
    pub node_id: &'a str,
    pub bmc_address: &'a str,
    pub features: AvailableFeatures,
}

/// Phase the controller acts on once a failed operation has been triaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectivePhase {
    /// Node is idle. `restart` requests new service steps.
    Active { restart: bool },
    /// Service steps are running or waiting.
    InProgress,
}

#[derive(Debug, Clone, Default)]
pub struct ServicingController {
    config: ServicingConfig,
}

impl ServicingController {
    pub fn new(config: ServicingConfig) -> Self {
        Self { config }
    }

    /// Run one servicing pass.
    ///
    /// `unprepared` asks for servicing to be started when the node is idle.
    /// `restart_on_failure` allows a failed operation to be started again.
    /// Errors are transient; failures the user has to act on are returned as
    /// [`Outcome::Failed`].
    #[tracing::instrument(
        skip_all,
        fields(node_id = %ctx.node_id, unprepared = unprepared, restart_on_failure = restart_on_failure)
    )]
    pub async fn service<R: NodeRepository + ?Sized>(
        &self,
        ctx: &ServicingContext<'_, R>,
        data: &ServicingData,
        unprepared: bool,
        restart_on_failure: bool,
    ) -> Result<ServiceResult, ServicingError> {
        if !ctx.features.has_servicing() {
            return Ok(ServiceResult::not_started(Outcome::failed(format!(
                "servicing not supported: requires API version 1.{SERVICING_API_VERSION}, available is 1.{}",
                ctx.features.max_version
            ))));
        }

        let bmc = bmc::access_details(ctx.bmc_address)?;
        let client = NodeClient::new(ctx.repo, ctx.node_id, self.config.busy_requeue_delay);
        let node = client.get_node().await?;

        let steps = match plan_service_steps(&bmc, data) {
            Ok(steps) => steps,
            Err(e) => return Ok(ServiceResult::not_started(Outcome::failed(e.to_string()))),
        };

        let state = node.provision_state();
        let should_abort = should_abort_servicing(data);
        tracing::info!(
            has_settings_spec = data.has_firmware_settings_spec,
            has_components_spec = data.has_firmware_components_spec,
            triggered_by_settings = data.servicing_triggered_by_settings,
            triggered_by_components = data.servicing_triggered_by_components,
            service_steps = steps.len(),
            node_state = %state,
            "servicing state check"
        );

        let phase = match &state {
            ProvisionState::ServiceFailed => {
                if should_abort {
                    tracing::info!("aborting servicing because the user cleared the spec that started it");
                    return abort_servicing(&client, &node).await;
                }

                // The failure stays visible until the caller allows a restart.
                if !restart_on_failure {
                    return Ok(ServiceResult::not_started(Outcome::failed(
                        node.last_error(),
                    )));
                }

                if node.maintenance {
                    tracing::info!("clearing maintenance flag after a servicing failure");
                    let outcome = client.set_maintenance_flag(&node, false, "").await?;
                    return Ok(ServiceResult::not_started(outcome));
                }

                tracing::info!("restarting servicing because of a previous failure");
                EffectivePhase::Active { restart: true }
            }
            ProvisionState::Active => EffectivePhase::Active {
                restart: unprepared,
            },
            ProvisionState::Servicing | ProvisionState::ServiceWait => EffectivePhase::InProgress,
            ProvisionState::Other(other) => {
                return Err(ServicingError::UnexpectedState(other.clone()));
            }
        };

        match phase {
            EffectivePhase::Active { restart } => {
                if restart
                    && let Some(result) = start_servicing(&client, &node, steps).await?
                    && (result.started || !result.outcome.is_complete())
                {
                    return Ok(result);
                }
                tracing::info!("servicing finished on the host");
                // Deliberately `started = false` even on a restart: no mutation
                // was issued on this pass.
                Ok(ServiceResult::not_started(Outcome::complete()))
            }
            EffectivePhase::InProgress => {
                if should_abort {
                    tracing::info!("aborting in-progress servicing because the user cleared the spec that started it");
                    return abort_servicing(&client, &node).await;
                }

                tracing::info!(
                    state = %state,
                    service_step = ?node.service_step,
                    "waiting for host to become active"
                );
                Ok(ServiceResult::not_started(Outcome::continuing(
                    self.config.provision_requeue_delay,
                )))
            }
        }
    }
}

/// Request servicing with the planned steps. `None` means there is nothing to do.
async fn start_servicing<R: NodeRepository + ?Sized>(
    client: &NodeClient<'_, R>,
    node: &Node,
    steps: Vec<ServiceStep>,
) -> Result<Option<ServiceResult>, ServicingError> {
    if steps.is_empty() {
        return Ok(None);
    }

    tracing::info!(service_steps = ?steps, "starting servicing with new configuration");
    client
        .try_change_provision_state(node, ProvisionStateOpts::service(steps))
        .await
        .map(Some)
}

/// Abort servicing. Takes two passes when the node is in maintenance, since
/// the abort request is rejected until the flag is cleared.
async fn abort_servicing<R: NodeRepository + ?Sized>(
    client: &NodeClient<'_, R>,
    node: &Node,
) -> Result<ServiceResult, ServicingError> {
    if node.maintenance {
        tracing::info!("clearing maintenance flag before aborting servicing");
        let outcome = client.set_maintenance_flag(node, false, "").await?;
        return Ok(ServiceResult::not_started(outcome));
    }

    tracing::info!("aborting servicing due to removal of the firmware settings or updates spec");
    client
        .try_change_provision_state(node, ProvisionStateOpts::abort())
        .await
}
