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

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicingConfig {
    /// Delay before polling again while service steps are running
    #[serde(with = "humantime_serde")]
    pub provision_requeue_delay: Duration,

    /// Delay before retrying when the node is locked by another operation
    #[serde(with = "humantime_serde")]
    pub busy_requeue_delay: Duration,
}

impl Default for ServicingConfig {
    fn default() -> Self {
        Self {
            provision_requeue_delay: Duration::from_secs(10),
            busy_requeue_delay: Duration::from_secs(10),
        }
    }
}

impl ServicingConfig {
    /// Load configuration from optional path
    pub fn load(config_path: Option<&Path>) -> Result<Self, String> {
        let mut figment = Figment::new().merge(Serialized::defaults(ServicingConfig::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CARBIDE_SERVICING__").split("__"));

        let config: ServicingConfig = figment
            .extract()
            .map_err(|e| format!("Failed to load configuration: {e}"))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provision_requeue_delay.is_zero() {
            return Err("provision_requeue_delay must be greater than 0".to_string());
        }
        Ok(())
    }
}
