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

//! # Cadence Sim
//!
//! The fixed-timestep simulation scheduler. It divides each rendered frame
//! into a fixed number of physics sub-steps, drives the collision and physics
//! engines through them, publishes lifecycle signals around each frame and
//! sub-step, and keeps the visual actors of registered entities in sync with
//! their bodies.

#![warn(missing_docs)]

mod callbacks;
mod clock;
mod config;
mod entity;
mod error;
mod scheduler;
mod stats;

pub use self::callbacks::{StepCallback, StepCallbackRegistrar};
pub use self::clock::SimulationClock;
pub use self::config::SchedulerConfig;
pub use self::entity::{EntityHandle, SimulatedEntity};
pub use self::error::{RefreshError, SchedulerError};
pub use self::scheduler::Scheduler;
pub use self::stats::SimulationStats;
