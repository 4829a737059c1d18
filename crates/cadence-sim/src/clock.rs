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

//! Simulated-time bookkeeping.

use crate::{SchedulerConfig, SchedulerError};

/// Tracks simulated time and the frame/sub-step counters.
///
/// Only the scheduler advances the clock; there is no reset.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    frames_per_second: f64,
    steps_per_frame: u32,
    sim_time: f64,
    iteration_count: u64,
    frame_count: u64,
}

impl SimulationClock {
    /// Creates a clock at time zero after validating `config`.
    pub fn new(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            frames_per_second: config.frames_per_second,
            steps_per_frame: config.steps_per_frame,
            sim_time: 0.0,
            iteration_count: 0,
            frame_count: 0,
        })
    }

    /// Seconds simulated by one sub-step: `(1 / fps) / steps_per_frame`.
    #[inline]
    pub fn time_step(&self) -> f64 {
        (1.0 / self.frames_per_second) / f64::from(self.steps_per_frame)
    }

    /// Rendered frames per simulated second.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Sub-steps per frame.
    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    /// Accumulated simulated seconds.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Completed sub-steps.
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    /// Started frames.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub(crate) fn begin_frame(&mut self) {
        self.frame_count += 1;
    }

    pub(crate) fn complete_step(&mut self, time_step: f64) {
        self.sim_time += time_step;
        self.iteration_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_step_formula() {
        for (fps, steps) in [(60.0, 1), (60.0, 2), (30.0, 4), (144.0, 3), (0.5, 7)] {
            let clock = SimulationClock::new(&SchedulerConfig::new(fps, steps)).unwrap();
            assert_relative_eq!(clock.time_step(), (1.0 / fps) / f64::from(steps));
        }
    }

    #[test]
    fn test_counters_start_at_zero() {
        let clock = SimulationClock::new(&SchedulerConfig::default()).unwrap();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.iteration_count(), 0);
        assert_eq!(clock.sim_time(), 0.0);
    }

    #[test]
    fn test_complete_step_accumulates() {
        let mut clock = SimulationClock::new(&SchedulerConfig::new(100.0, 2)).unwrap();
        clock.begin_frame();
        let dt = clock.time_step();
        clock.complete_step(dt);
        clock.complete_step(dt);
        assert_eq!(clock.frame_count(), 1);
        assert_eq!(clock.iteration_count(), 2);
        assert_relative_eq!(clock.sim_time(), 0.01);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            SimulationClock::new(&SchedulerConfig::new(60.0, 0)),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }
}
