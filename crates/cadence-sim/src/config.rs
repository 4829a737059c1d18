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

//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::SchedulerError;

/// Rate settings for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Rendered frames per simulated second. Must be positive and finite.
    pub frames_per_second: f64,
    /// Physics sub-steps per frame. Must be at least 1.
    pub steps_per_frame: u32,
    /// Emits per-frame and per-step diagnostics at `debug`/`trace` level.
    pub debug: bool,
}

impl SchedulerConfig {
    /// Creates a configuration with debugging disabled.
    pub fn new(frames_per_second: f64, steps_per_frame: u32) -> Self {
        Self {
            frames_per_second,
            steps_per_frame,
            debug: false,
        }
    }

    /// Enables or disables debug diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Checks the rate settings.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !self.frames_per_second.is_finite() || self.frames_per_second <= 0.0 {
            return Err(SchedulerError::InvalidConfig(format!(
                "frames_per_second must be positive and finite, got {}",
                self.frames_per_second
            )));
        }
        if self.steps_per_frame == 0 {
            return Err(SchedulerError::InvalidConfig(
                "steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(60.0, 2)
    }
}
