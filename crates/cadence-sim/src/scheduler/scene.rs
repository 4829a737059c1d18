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

//! Convenience constructors for common scene entities.
//!
//! Each one needs an initialized world and an attached actor factory. The
//! actor is built and placed at the entity's starting pose before any body
//! or geometry is created, so a rejected actor leaves the engines untouched.

use cadence_core::actor::{Actor, ActorKind};
use cadence_core::math::{Pose, Vec3};
use cadence_core::physics::{GeometryDesc, GeometryShape, RigidBodyDesc};

use super::Scheduler;
use crate::entity::{EntityHandle, SimulatedEntity};
use crate::SchedulerError;

impl Scheduler {
    /// Adds the ground plane as entity `"floor"`.
    pub fn add_floor(&mut self) -> Result<EntityHandle, SchedulerError> {
        self.ensure_scene_ready()?;
        let actor = self.build_actor(&ActorKind::Plane, Pose::IDENTITY)?;
        let geometry = self
            .collision
            .add_geometry(GeometryDesc::fixed(GeometryShape::ground(), Pose::IDENTITY))?;

        Ok(self.insert_entity(
            SimulatedEntity::new("floor")
                .with_geometry(geometry)
                .with_actor(actor),
        ))
    }

    /// Adds a static triangle-mesh floor as entity `"floor"`.
    pub fn add_trimesh_floor(
        &mut self,
        vertices: Vec<Vec3>,
        indices: Vec<[u32; 3]>,
    ) -> Result<EntityHandle, SchedulerError> {
        self.ensure_scene_ready()?;
        let actor = self.build_actor(
            &ActorKind::TriMesh {
                vertices: vertices.clone(),
                indices: indices.clone(),
            },
            Pose::IDENTITY,
        )?;
        let geometry = self.collision.add_geometry(GeometryDesc::fixed(
            GeometryShape::TriMesh { vertices, indices },
            Pose::IDENTITY,
        ))?;

        Ok(self.insert_entity(
            SimulatedEntity::new("floor")
                .with_geometry(geometry)
                .with_actor(actor),
        ))
    }

    /// Adds a static box of full side lengths `size` centred on `position`.
    pub fn add_obstacle(
        &mut self,
        name: impl Into<String>,
        size: Vec3,
        position: Vec3,
    ) -> Result<EntityHandle, SchedulerError> {
        self.ensure_scene_ready()?;
        let pose = Pose::at(position);
        let actor = self.build_actor(&ActorKind::Box { size }, pose)?;
        let geometry = self
            .collision
            .add_geometry(GeometryDesc::fixed(GeometryShape::Box(size * 0.5), pose))?;

        Ok(self.insert_entity(
            SimulatedEntity::new(name)
                .with_geometry(geometry)
                .with_actor(actor),
        ))
    }

    /// Adds an axes gizmo at the origin as entity `"axes"`. Visual only.
    pub fn add_axes_gizmo(&mut self, length: f32) -> Result<EntityHandle, SchedulerError> {
        self.ensure_scene_ready()?;
        let actor = self.build_actor(&ActorKind::Axes { length }, Pose::IDENTITY)?;
        Ok(self.insert_entity(SimulatedEntity::new("axes").with_actor(actor)))
    }

    /// Adds a dynamic sphere whose actor follows its body.
    pub fn add_sphere(
        &mut self,
        name: impl Into<String>,
        radius: f32,
        position: Vec3,
        mass: f32,
    ) -> Result<EntityHandle, SchedulerError> {
        self.add_dynamic(
            name.into(),
            GeometryShape::Sphere(radius),
            ActorKind::Sphere { radius },
            position,
            mass,
        )
    }

    /// Adds a dynamic box of full side lengths `size` whose actor follows its body.
    pub fn add_box(
        &mut self,
        name: impl Into<String>,
        size: Vec3,
        position: Vec3,
        mass: f32,
    ) -> Result<EntityHandle, SchedulerError> {
        self.add_dynamic(
            name.into(),
            GeometryShape::Box(size * 0.5),
            ActorKind::Box { size },
            position,
            mass,
        )
    }

    fn add_dynamic(
        &mut self,
        name: String,
        shape: GeometryShape,
        kind: ActorKind,
        position: Vec3,
        mass: f32,
    ) -> Result<EntityHandle, SchedulerError> {
        self.ensure_scene_ready()?;
        let actor = self.build_actor(&kind, Pose::at(position))?;
        let body = self
            .physics
            .add_body(RigidBodyDesc::dynamic(position, mass))?;
        let geometry = self
            .collision
            .add_geometry(GeometryDesc::attached(shape, body))?;

        log::debug!("Added dynamic {} '{name}' as {body}.", kind.label());
        Ok(self.insert_entity(
            SimulatedEntity::new(name)
                .with_body(body)
                .with_geometry(geometry)
                .with_actor(actor),
        ))
    }

    fn ensure_scene_ready(&self) -> Result<(), SchedulerError> {
        if !self.is_initialized() {
            return Err(SchedulerError::NotInitialized);
        }
        if self.actor_factory.is_none() {
            return Err(SchedulerError::MissingActorFactory);
        }
        Ok(())
    }

    fn build_actor(
        &mut self,
        kind: &ActorKind,
        pose: Pose,
    ) -> Result<Box<dyn Actor>, SchedulerError> {
        let factory = self
            .actor_factory
            .as_mut()
            .ok_or(SchedulerError::MissingActorFactory)?;
        let mut actor = factory.create_actor(kind)?;
        actor.set_pose(pose)?;
        Ok(actor)
    }
}
