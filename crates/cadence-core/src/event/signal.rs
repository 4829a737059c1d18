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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The points in a frame at which the scheduler notifies listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleSignal {
    /// Before any sub-step of a frame.
    PreFrame,
    /// After the last sub-step of a frame.
    PostFrame,
    /// Before callbacks and collision detection of a sub-step.
    PreStep,
    /// After the contacts of a sub-step have been released.
    PostStep,
}

impl LifecycleSignal {
    /// All signals, in the order they first occur within a frame.
    pub const ALL: [LifecycleSignal; 4] = [
        LifecycleSignal::PreFrame,
        LifecycleSignal::PreStep,
        LifecycleSignal::PostStep,
        LifecycleSignal::PostFrame,
    ];

    /// The stable signal name.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleSignal::PreFrame => "pre-frame",
            LifecycleSignal::PostFrame => "post-frame",
            LifecycleSignal::PreStep => "pre-step",
            LifecycleSignal::PostStep => "post-step",
        }
    }
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A published signal together with the clock reading at the time it fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    /// Which lifecycle point fired.
    pub signal: LifecycleSignal,
    /// Frame counter at publication.
    pub frame: u64,
    /// Sub-step counter at publication.
    pub iteration: u64,
    /// Simulated seconds at publication.
    pub sim_time: f64,
}

impl SignalEvent {
    /// Creates an event for `signal` at the given clock reading.
    pub fn new(signal: LifecycleSignal, frame: u64, iteration: u64, sim_time: f64) -> Self {
        Self {
            signal,
            frame,
            iteration,
            sim_time,
        }
    }
}
