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

use cadence_core::actor::ActorError;
use cadence_core::physics::{BodyHandle, EngineError};

/// Errors returned by [`Scheduler`](crate::Scheduler) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    /// The frame rate or step count is unusable.
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),
    /// `initialize_world` was called a second time.
    #[error("simulation world is already initialized")]
    AlreadyInitialized,
    /// An operation needs the world but `initialize_world` has not run.
    #[error("simulation world has not been initialized")]
    NotInitialized,
    /// A convenience constructor needs an actor factory and none is attached.
    #[error("no actor factory attached to the scheduler")]
    MissingActorFactory,
    /// The actor factory could not build a visual proxy.
    #[error("failed to create actor: {0}")]
    Actor(#[from] ActorError),
    /// The collision or physics engine failed. Always fatal to the frame.
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}

/// Why a single entity's actor could not be refreshed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefreshError {
    /// The entity lacks a body or an actor.
    #[error("entity has no body/actor pair")]
    NotUpdatable,
    /// The physics engine no longer knows the entity's body.
    #[error("no pose available for {0}")]
    MissingBodyPose(BodyHandle),
    /// The actor rejected the pose.
    #[error(transparent)]
    Actor(#[from] ActorError),
}
