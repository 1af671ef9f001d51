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

//! Detection of user-requested servicing cancellation.

use crate::types::ServicingData;

/// Whether the user withdrew the spec that started the running operation.
///
/// Servicing is only aborted once every category that triggered it has been
/// removed from the desired spec.
pub fn should_abort_servicing(data: &ServicingData) -> bool {
    match (
        data.servicing_triggered_by_settings,
        data.servicing_triggered_by_components,
    ) {
        (true, true) => !data.has_firmware_settings_spec && !data.has_firmware_components_spec,
        (true, false) => !data.has_firmware_settings_spec,
        (false, true) => !data.has_firmware_components_spec,
        // Nothing triggered servicing, so nothing can cancel it.
        (false, false) => false,
    }
}
