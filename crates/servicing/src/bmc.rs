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

//! BMC access details and vendor BIOS vocabularies.
//!
//! A BMC address such as `idrac-virtualmedia://10.0.0.5/redfish/v1/Systems/System.Embedded.1`
//! selects the driver, and the driver decides how the vendor-neutral
//! [`FirmwareConfig`] is spelled in the vendor's BIOS attribute registry.

use std::fmt;

use url::Url;

use crate::error::BmcError;
use crate::types::{BiosSetting, FirmwareConfig};

/// Capability to translate a vendor-neutral profile into vendor BIOS settings.
pub trait BmcAccess: Send + Sync {
    /// Driver name, used in log and error messages.
    fn driver(&self) -> &str;

    /// Translate `config` into BIOS settings for this vendor.
    ///
    /// Returns an empty list when `config` is `None`.
    fn build_bios_settings(
        &self,
        config: Option<&FirmwareConfig>,
    ) -> Result<Vec<BiosSetting>, BmcError>;
}

/// Supported BMC drivers, keyed by the scheme of the BMC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Ipmi,
    Libvirt,
    Redfish,
    RedfishVirtualMedia,
    Idrac,
    IdracRedfish,
    IdracVirtualMedia,
    Ilo4,
    Ilo4VirtualMedia,
    Ilo5,
    Ilo5Redfish,
    Ilo5VirtualMedia,
    Irmc,
}

impl Driver {
    pub fn from_name(name: &str) -> Option<Self> {
        let driver = match name {
            "ipmi" => Driver::Ipmi,
            "libvirt" => Driver::Libvirt,
            "redfish" => Driver::Redfish,
            "redfish-virtualmedia" => Driver::RedfishVirtualMedia,
            "idrac" => Driver::Idrac,
            "idrac-redfish" => Driver::IdracRedfish,
            "idrac-virtualmedia" => Driver::IdracVirtualMedia,
            "ilo4" => Driver::Ilo4,
            "ilo4-virtualmedia" => Driver::Ilo4VirtualMedia,
            "ilo5" => Driver::Ilo5,
            "ilo5-redfish" => Driver::Ilo5Redfish,
            "ilo5-virtualmedia" => Driver::Ilo5VirtualMedia,
            "irmc" => Driver::Irmc,
            _ => return None,
        };
        Some(driver)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Driver::Ipmi => "ipmi",
            Driver::Libvirt => "libvirt",
            Driver::Redfish => "redfish",
            Driver::RedfishVirtualMedia => "redfish-virtualmedia",
            Driver::Idrac => "idrac",
            Driver::IdracRedfish => "idrac-redfish",
            Driver::IdracVirtualMedia => "idrac-virtualmedia",
            Driver::Ilo4 => "ilo4",
            Driver::Ilo4VirtualMedia => "ilo4-virtualmedia",
            Driver::Ilo5 => "ilo5",
            Driver::Ilo5Redfish => "ilo5-redfish",
            Driver::Ilo5VirtualMedia => "ilo5-virtualmedia",
            Driver::Irmc => "irmc",
        }
    }

    fn vocabulary(&self) -> Option<BiosVocabulary> {
        match self {
            Driver::Idrac | Driver::IdracRedfish | Driver::IdracVirtualMedia => {
                Some(BiosVocabulary::IDRAC)
            }
            Driver::Ilo4
            | Driver::Ilo4VirtualMedia
            | Driver::Ilo5
            | Driver::Ilo5Redfish
            | Driver::Ilo5VirtualMedia => Some(BiosVocabulary::ILO),
            Driver::Irmc => Some(BiosVocabulary::IRMC),
            Driver::Ipmi | Driver::Libvirt | Driver::Redfish | Driver::RedfishVirtualMedia => None,
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vendor spelling of the three [`FirmwareConfig`] knobs.
struct BiosVocabulary {
    virtualization: &'static str,
    simultaneous_multithreading: &'static str,
    sriov: &'static str,
    enabled: &'static str,
    disabled: &'static str,
}

impl BiosVocabulary {
    const IDRAC: Self = Self {
        virtualization: "ProcVirtualization",
        simultaneous_multithreading: "LogicalProc",
        sriov: "SriovGlobalEnable",
        enabled: "Enabled",
        disabled: "Disabled",
    };

    const ILO: Self = Self {
        virtualization: "ProcVirtualization",
        simultaneous_multithreading: "ProcHyperthreading",
        sriov: "Sriov",
        enabled: "Enabled",
        disabled: "Disabled",
    };

    const IRMC: Self = Self {
        virtualization: "cpu_vt_enabled",
        simultaneous_multithreading: "hyper_threading_enabled",
        sriov: "single_root_io_virtualization_support_enabled",
        enabled: "True",
        disabled: "False",
    };

    fn translate(&self, config: &FirmwareConfig) -> Vec<BiosSetting> {
        [
            (self.virtualization, config.virtualization_enabled),
            (
                self.simultaneous_multithreading,
                config.simultaneous_multithreading_enabled,
            ),
            (self.sriov, config.sriov_enabled),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value.map(|on| BiosSetting::new(name, if on { self.enabled } else { self.disabled }))
        })
        .collect()
    }
}

/// Parsed BMC address.
#[derive(Debug, Clone)]
pub struct AccessDetails {
    driver: Driver,
    url: Url,
}

impl AccessDetails {
    pub fn driver_kind(&self) -> Driver {
        self.driver
    }

    /// Host part of the BMC address.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }
}

impl BmcAccess for AccessDetails {
    fn driver(&self) -> &str {
        self.driver.name()
    }

    fn build_bios_settings(
        &self,
        config: Option<&FirmwareConfig>,
    ) -> Result<Vec<BiosSetting>, BmcError> {
        let Some(config) = config else {
            return Ok(Vec::new());
        };
        match self.driver.vocabulary() {
            Some(vocabulary) => Ok(vocabulary.translate(config)),
            None => Err(BmcError::FirmwareSettingsUnsupported {
                driver: self.driver.name().to_string(),
            }),
        }
    }
}

/// Parse a BMC address into [`AccessDetails`].
///
/// Addresses without a scheme (`host` or `host:port`) are treated as IPMI.
/// A `+transport` suffix on the scheme (e.g. `redfish+https`) is accepted and
/// ignored for driver selection.
pub fn access_details(address: &str) -> Result<AccessDetails, BmcError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(BmcError::invalid_address(address, "address is empty"));
    }

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("ipmi://{trimmed}"))
    }
    .map_err(|e| BmcError::invalid_address(address, e))?;

    let scheme = url.scheme();
    let driver_name = scheme.split_once('+').map_or(scheme, |(driver, _)| driver);
    let driver = Driver::from_name(driver_name).ok_or_else(|| BmcError::UnknownDriver {
        driver: driver_name.to_string(),
        address: address.to_string(),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(BmcError::invalid_address(address, "missing host"));
    }

    Ok(AccessDetails { driver, url })
}
