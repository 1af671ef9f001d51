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

//! Error types for the servicing controller.
//!
//! Only transient conditions are reported as [`ServicingError`]. Failures the
//! end user has to act on (unsupported API version, planning errors, the
//! node's own `last_error`) are returned as [`crate::Outcome::Failed`].

use thiserror::Error;

/// Errors returned by a [`crate::NodeRepository`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Node not found: {node}")]
    NotFound { node: String },

    /// The node is locked by another operation.
    #[error("Node is busy: {0}")]
    Conflict(String),

    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn not_found(node: impl Into<String>) -> Self {
        Self::NotFound { node: node.into() }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Errors resolving BMC access or translating firmware settings for a driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BmcError {
    #[error("failed to parse BMC address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Unknown BMC type '{driver}' for address {address}")]
    UnknownDriver { driver: String, address: String },

    #[error("firmware settings for {driver} are not supported")]
    FirmwareSettingsUnsupported { driver: String },
}

impl BmcError {
    pub fn invalid_address(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

/// Transient servicing errors. The caller retries on its normal schedule.
#[derive(Error, Debug)]
pub enum ServicingError {
    #[error("BMC access error: {0}")]
    BmcAccess(#[from] BmcError),

    #[error("Failed to {operation}: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    #[error("have unexpected node state {0}")]
    UnexpectedState(String),
}

impl ServicingError {
    pub fn remote(operation: &'static str, source: RemoteError) -> Self {
        Self::Remote { operation, source }
    }
}
