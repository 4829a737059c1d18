// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;

/// A point-in-time summary of a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    /// Started frames.
    pub frame_count: u64,
    /// Completed sub-steps.
    pub iteration_count: u64,
    /// Accumulated simulated seconds.
    pub sim_time: f64,
    /// Seconds per sub-step.
    pub time_step: f64,
    /// Registered entities.
    pub entity_count: usize,
    /// Bodies owned by the physics engine.
    pub body_count: usize,
    /// Geometries owned by the collision engine.
    pub geometry_count: usize,
    /// Step callbacks queued or in flight.
    pub pending_callbacks: usize,
    /// Contacts generated during the last frame, summed over its sub-steps.
    pub last_frame_contacts: usize,
    /// Listener failures suppressed since construction.
    pub listener_faults: u64,
    /// Actor refresh failures suppressed since construction.
    pub actor_faults: u64,
    /// Whether the pause flag is set.
    pub paused: bool,
}
