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

//! Visual actor contracts.
//!
//! Actors belong to a rendering subsystem that lives outside this workspace.
//! The scheduler only creates them through an [`ActorFactory`] and pushes a
//! body's pose into them once per frame.

use serde::{Deserialize, Serialize};

use crate::math::{Pose, Vec3};

/// The visual proxy to build for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    /// A flat ground plane.
    Plane,
    /// A triangle mesh.
    TriMesh {
        /// Vertex positions.
        vertices: Vec<Vec3>,
        /// Triangle vertex indices.
        indices: Vec<[u32; 3]>,
    },
    /// A box with full side lengths `size`.
    Box {
        /// Full side lengths.
        size: Vec3,
    },
    /// A sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// An XYZ axes gizmo.
    Axes {
        /// Length of each axis.
        length: f32,
    },
}

impl ActorKind {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ActorKind::Plane => "plane",
            ActorKind::TriMesh { .. } => "trimesh",
            ActorKind::Box { .. } => "box",
            ActorKind::Sphere { .. } => "sphere",
            ActorKind::Axes { .. } => "axes",
        }
    }
}

/// Failures raised by the rendering side.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActorError {
    /// The actor's backing resource is gone.
    #[error("actor has been detached from its renderer")]
    Detached,
    /// The factory cannot build this kind of actor.
    #[error("unsupported actor kind `{0}`")]
    Unsupported(&'static str),
    /// Backend-specific failure.
    #[error("actor backend failure: {0}")]
    Backend(String),
}

/// A visual representation of a simulated entity.
pub trait Actor {
    /// Moves the actor to `pose`.
    fn set_pose(&mut self, pose: Pose) -> Result<(), ActorError>;
}

/// Creates actors on behalf of the scheduler's convenience constructors.
pub trait ActorFactory {
    /// Builds the visual proxy described by `kind`.
    fn create_actor(&mut self, kind: &ActorKind) -> Result<Box<dyn Actor>, ActorError>;
}
