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

//! # Physics Abstractions
//!
//! Interface contracts for the two engines the scheduler drives each sub-step,
//! plus the handle and descriptor types they exchange.

mod collision;
mod contact;
mod error;
mod solver;

pub use self::collision::{ContactManifold, NarrowPhase};
pub use self::contact::{Contact, ContactConstraintSet};
pub use self::error::EngineError;
pub use self::solver::{ImpulseSolver, SolverBody};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::{Pose, Quat, Vec3};

/// Opaque handle to a rigid body owned by a [`PhysicsEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Opaque handle to a geometry owned by a [`CollisionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeomHandle(pub u64);

/// Identifies the spatial partition created by [`CollisionEngine::create_space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub u32);

/// Identifies the world created by [`PhysicsEngine::create_world`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Identifies a group of temporary contact joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactGroupId(pub u32);

impl fmt::Display for ContactGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contact-group#{}", self.0)
    }
}

/// Defines how a rigid body responds to forces and contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Responds to forces and collisions.
    #[default]
    Dynamic,
    /// Fixed in place, does not move.
    Static,
    /// Moves with its own velocity, ignores forces and contacts.
    Kinematic,
}

/// Description for creating a rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Initial position.
    pub position: Vec3,
    /// Initial rotation.
    pub rotation: Quat,
    /// Body type.
    pub body_type: BodyType,
    /// Linear velocity.
    pub linear_velocity: Vec3,
    /// Angular velocity.
    pub angular_velocity: Vec3,
    /// Mass of the body in kg (dynamic only).
    pub mass: f32,
}

impl RigidBodyDesc {
    /// A dynamic body of `mass` kg resting at `position`.
    pub fn dynamic(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            mass,
            ..Default::default()
        }
    }
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            body_type: BodyType::Dynamic,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

/// Snapshot of a body's dynamic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Current pose.
    pub pose: Pose,
    /// Linear velocity.
    pub linear_velocity: Vec3,
    /// Angular velocity.
    pub angular_velocity: Vec3,
    /// Body type.
    pub body_type: BodyType,
    /// Mass in kg.
    pub mass: f32,
}

/// Collision shapes understood by the native collision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryShape {
    /// Infinite plane `normal · p = offset` in the geometry's local frame.
    Plane {
        /// Unit normal of the plane.
        normal: Vec3,
        /// Signed distance from the origin along `normal`.
        offset: f32,
    },
    /// Sphere with radius.
    Sphere(f32),
    /// Box with half-extents.
    Box(Vec3),
    /// Triangle mesh.
    TriMesh {
        /// Vertex positions in the geometry's local frame.
        vertices: Vec<Vec3>,
        /// Triangle vertex indices.
        indices: Vec<[u32; 3]>,
    },
}

impl GeometryShape {
    /// The horizontal ground plane through the origin.
    pub fn ground() -> Self {
        GeometryShape::Plane {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }
}

/// Description for creating a geometry inside the collision space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDesc {
    /// Shape of the geometry.
    pub shape: GeometryShape,
    /// Body the geometry follows, if any. Body-less geometry is static.
    pub body: Option<BodyHandle>,
    /// Pose relative to the body, or world pose when `body` is `None`.
    pub offset: Pose,
}

impl GeometryDesc {
    /// Static geometry placed at `pose`.
    pub fn fixed(shape: GeometryShape, pose: Pose) -> Self {
        Self {
            shape,
            body: None,
            offset: pose,
        }
    }

    /// Geometry centred on `body`.
    pub fn attached(shape: GeometryShape, body: BodyHandle) -> Self {
        Self {
            shape,
            body: Some(body),
            offset: Pose::IDENTITY,
        }
    }
}

/// Interface contract for the rigid-body dynamics collaborator.
///
/// The engine owns every body. The scheduler only asks it to create its
/// world and contact group once, then to integrate once per sub-step.
pub trait PhysicsEngine {
    /// Creates the group that holds the temporary contact joints of a sub-step.
    fn create_contact_group(&mut self) -> Result<ContactGroupId, EngineError>;

    /// Creates the dynamics world.
    fn create_world(&mut self) -> Result<WorldId, EngineError>;

    /// Advances the world by `dt` seconds, honouring `contacts`.
    fn integrate(&mut self, contacts: &ContactConstraintSet, dt: f64) -> Result<(), EngineError>;

    /// Releases every contact joint held in `group`.
    fn empty_contact_group(&mut self, group: ContactGroupId);

    /// Adds a rigid body to the world.
    fn add_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, EngineError>;

    /// Returns the full dynamic state of a body.
    fn body_state(&self, handle: BodyHandle) -> Option<BodyState>;

    /// Returns the pose of a body.
    fn body_pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.body_state(handle).map(|state| state.pose)
    }

    /// Number of bodies in the world.
    fn body_count(&self) -> usize;
}

/// Interface contract for the collision-detection collaborator.
pub trait CollisionEngine {
    /// Creates the spatial partition geometries are inserted into.
    fn create_space(&mut self) -> Result<SpaceId, EngineError>;

    /// Inserts a geometry into the space.
    fn add_geometry(&mut self, desc: GeometryDesc) -> Result<GeomHandle, EngineError>;

    /// Finds intersecting geometries given the current body poses and returns
    /// the contact constraints for this sub-step, tagged with `group`.
    fn detect_collisions(
        &mut self,
        world: &dyn PhysicsEngine,
        group: ContactGroupId,
    ) -> Result<ContactConstraintSet, EngineError>;

    /// Number of geometries in the space.
    fn geometry_count(&self) -> usize;
}
