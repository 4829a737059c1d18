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

//! Named simulated entities.

use std::collections::HashMap;
use std::fmt;

use cadence_core::actor::Actor;
use cadence_core::physics::{BodyHandle, GeomHandle, PhysicsEngine};

use crate::error::RefreshError;

/// A reference to a registered entity, returned by every `add_*` operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    name: String,
}

impl EntityHandle {
    /// The registry key of the entity.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One object in the simulated world.
pub struct SimulatedEntity {
    name: String,
    body: Option<BodyHandle>,
    geometry: Option<GeomHandle>,
    actor: Option<Box<dyn Actor>>,
}

impl SimulatedEntity {
    /// Creates an entity with neither body, geometry nor actor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            geometry: None,
            actor: None,
        }
    }

    /// Attaches a physical body.
    pub fn with_body(mut self, body: BodyHandle) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a collision geometry.
    pub fn with_geometry(mut self, geometry: GeomHandle) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Attaches a visual actor.
    pub fn with_actor(mut self, actor: Box<dyn Actor>) -> Self {
        self.actor = Some(actor);
        self
    }

    /// The entity's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The physical body, if any.
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// The collision geometry, if any.
    pub fn geometry(&self) -> Option<GeomHandle> {
        self.geometry
    }

    /// Returns `true` if a visual actor is attached.
    pub fn has_actor(&self) -> bool {
        self.actor.is_some()
    }

    /// An entity is updatable when it has both a body and an actor.
    pub fn is_updatable(&self) -> bool {
        self.body.is_some() && self.actor.is_some()
    }

    /// Copies the body's current pose into the actor.
    pub(crate) fn refresh(&mut self, physics: &dyn PhysicsEngine) -> Result<(), RefreshError> {
        let (Some(body), Some(actor)) = (self.body, self.actor.as_mut()) else {
            return Err(RefreshError::NotUpdatable);
        };
        let pose = physics
            .body_pose(body)
            .ok_or(RefreshError::MissingBodyPose(body))?;
        actor.set_pose(pose)?;
        Ok(())
    }
}

impl fmt::Debug for SimulatedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedEntity")
            .field("name", &self.name)
            .field("body", &self.body)
            .field("geometry", &self.geometry)
            .field("has_actor", &self.actor.is_some())
            .finish()
    }
}

/// Entities keyed by name.
#[derive(Debug, Default)]
pub(crate) struct EntityRegistry {
    entities: HashMap<String, SimulatedEntity>,
}

impl EntityRegistry {
    /// Stores `entity` under its name, replacing any previous entry.
    pub(crate) fn insert(
        &mut self,
        entity: SimulatedEntity,
    ) -> (EntityHandle, Option<SimulatedEntity>) {
        let handle = EntityHandle {
            name: entity.name.clone(),
        };
        let previous = self.entities.insert(entity.name.clone(), entity);
        (handle, previous)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&SimulatedEntity> {
        self.entities.get(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SimulatedEntity> {
        self.entities.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SimulatedEntity> {
        self.entities.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updatable_requires_body_and_actor() {
        struct Inert;
        impl Actor for Inert {
            fn set_pose(
                &mut self,
                _: cadence_core::math::Pose,
            ) -> Result<(), cadence_core::actor::ActorError> {
                Ok(())
            }
        }

        assert!(!SimulatedEntity::new("a").is_updatable());
        assert!(!SimulatedEntity::new("b").with_body(BodyHandle(1)).is_updatable());
        assert!(!SimulatedEntity::new("c").with_actor(Box::new(Inert)).is_updatable());
        assert!(SimulatedEntity::new("d")
            .with_body(BodyHandle(1))
            .with_actor(Box::new(Inert))
            .is_updatable());
    }

    #[test]
    fn test_insert_overwrites_same_name() {
        let mut registry = EntityRegistry::default();
        let (first, previous) =
            registry.insert(SimulatedEntity::new("ball").with_body(BodyHandle(1)));
        assert!(previous.is_none());

        let (second, previous) =
            registry.insert(SimulatedEntity::new("ball").with_body(BodyHandle(2)));
        assert_eq!(first, second);
        assert_eq!(previous.and_then(|e| e.body()), Some(BodyHandle(1)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ball").and_then(|e| e.body()), Some(BodyHandle(2)));
    }
}
