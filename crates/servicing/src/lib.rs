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

//! # Carbide servicing controller
//!
//! This crate drives BIOS settings changes and firmware component updates on
//! already deployed bare-metal nodes through the servicing flow of the remote
//! provisioning service.
//!
//! ## Overview
//!
//! The reconciler calls [`ServicingController::service`] once per pass with the
//! current desired state. Each pass:
//!
//! - plans the service steps needed to converge the node ([`planner`])
//! - decides whether the user cancelled the running operation ([`abort`])
//! - issues at most one state-changing request to the node and reports an
//!   [`Outcome`]
//!
//! Nothing is kept between passes. The node's provision state, its maintenance
//! flag and the trigger flags in [`ServicingData`] carry all the state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use servicing::{AvailableFeatures, ServicingConfig, ServicingContext, ServicingController};
//!
//! let controller = ServicingController::new(ServicingConfig::load(None)?);
//! let ctx = ServicingContext {
//!     repo: &repo,
//!     node_id: "2f9c3b1e-5d0c-4c6e-9a57-0c1d2e3f4a5b",
//!     bmc_address: "idrac-virtualmedia://10.0.0.5/redfish/v1/Systems/System.Embedded.1",
//!     features: AvailableFeatures::new(89),
//! };
//!
//! let result = controller.service(&ctx, &data, true, false).await?;
//! if result.started {
//!     // record that servicing started for the current spec
//! }
//! ```
#![warn(clippy::all)]
#![deny(warnings, unsafe_code)]

pub mod abort;
pub mod bmc;
pub mod config;
pub mod controller;
pub mod error;
pub mod node;
pub mod planner;
pub mod repository;
pub mod types;

#[cfg(test)]
mod test;

pub use abort::should_abort_servicing;
pub use bmc::{AccessDetails, BmcAccess, Driver, access_details};
pub use config::ServicingConfig;
pub use controller::{ServicingContext, ServicingController};
pub use error::{BmcError, RemoteError, ServicingError};
pub use node::NodeClient;
pub use planner::plan_service_steps;
pub use repository::NodeRepository;
pub use types::{
    AvailableFeatures, BiosSetting, DesiredSettingsMap, FirmwareComponentUpdate, FirmwareConfig,
    Node, Outcome, ProvisionState, ProvisionStateOpts, ProvisionTarget, SERVICING_API_VERSION,
    ServiceResult, ServiceStep, ServicingData, SettingValue, SettingsMap, StepInterface,
};
