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

//! Native rigid-body dynamics.
//!
//! Each call to `integrate` runs one semi-implicit Euler step:
//! 1. gravity is applied to the velocity of dynamic bodies,
//! 2. every contact is resolved by the [`ImpulseSolver`],
//! 3. positions and orientations are advanced by the new velocities.

use cadence_core::math::{Pose, Vec3};
use cadence_core::physics::{
    BodyHandle, BodyState, BodyType, ContactConstraintSet, ContactGroupId, ContactManifold,
    EngineError, ImpulseSolver, PhysicsEngine, RigidBodyDesc, SolverBody, WorldId,
};

/// Standard gravity, pointing down the Y axis.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// A single-world rigid-body integrator with impulse-based contacts.
#[derive(Debug)]
pub struct NativePhysicsEngine {
    world: Option<WorldId>,
    contact_group: Option<ContactGroupId>,
    bodies: Vec<BodyState>,
    gravity: Vec3,
    solver: ImpulseSolver,
    held_contacts: usize,
}

impl Default for NativePhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativePhysicsEngine {
    /// Creates an engine with standard gravity.
    pub fn new() -> Self {
        Self {
            world: None,
            contact_group: None,
            bodies: Vec::new(),
            gravity: DEFAULT_GRAVITY,
            solver: ImpulseSolver::new(),
            held_contacts: 0,
        }
    }

    /// Replaces the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Replaces the contact solver parameters.
    pub fn with_solver(mut self, solver: ImpulseSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Current gravity.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Contacts taken in by the last integration and not yet released.
    pub fn held_contacts(&self) -> usize {
        self.held_contacts
    }

    fn solver_body(&self, handle: Option<BodyHandle>) -> Result<SolverBody, EngineError> {
        let Some(handle) = handle else {
            return Ok(SolverBody::FIXED);
        };
        let body = self
            .bodies
            .get(handle.0 as usize)
            .ok_or(EngineError::UnknownBody(handle))?;
        Ok(SolverBody {
            position: body.pose.position,
            linear_velocity: body.linear_velocity,
            inverse_mass: match body.body_type {
                BodyType::Dynamic => 1.0 / body.mass,
                BodyType::Static | BodyType::Kinematic => 0.0,
            },
        })
    }

    fn check_contact_bodies(&self, contacts: &ContactConstraintSet) -> Result<(), EngineError> {
        let known = |handle: BodyHandle| (handle.0 as usize) < self.bodies.len();
        for contact in contacts {
            for handle in [contact.body_a, contact.body_b].into_iter().flatten() {
                if !known(handle) {
                    return Err(EngineError::UnknownBody(handle));
                }
            }
        }
        Ok(())
    }

    fn write_back(&mut self, handle: Option<BodyHandle>, solved: SolverBody) {
        if let Some(body) = handle.and_then(|h| self.bodies.get_mut(h.0 as usize)) {
            if body.body_type == BodyType::Dynamic {
                body.pose.position = solved.position;
                body.linear_velocity = solved.linear_velocity;
            }
        }
    }

    fn resolve_contacts(&mut self, contacts: &ContactConstraintSet) -> Result<(), EngineError> {
        for contact in contacts {
            let a = self.solver_body(contact.body_a)?;
            let b = self.solver_body(contact.body_b)?;
            let manifold = ContactManifold {
                normal: contact.normal,
                depth: contact.depth,
                point: contact.point,
            };
            let (a, b) = self.solver.resolve(a, b, &manifold);
            self.write_back(contact.body_a, a);
            self.write_back(contact.body_b, b);
        }
        Ok(())
    }
}

impl PhysicsEngine for NativePhysicsEngine {
    fn create_contact_group(&mut self) -> Result<ContactGroupId, EngineError> {
        if self.contact_group.is_some() {
            return Err(EngineError::AlreadyCreated("contact group"));
        }
        let group = ContactGroupId(0);
        self.contact_group = Some(group);
        Ok(group)
    }

    fn create_world(&mut self) -> Result<WorldId, EngineError> {
        if self.world.is_some() {
            return Err(EngineError::AlreadyCreated("physics world"));
        }
        let world = WorldId(0);
        self.world = Some(world);
        Ok(world)
    }

    fn integrate(&mut self, contacts: &ContactConstraintSet, dt: f64) -> Result<(), EngineError> {
        if self.world.is_none() {
            return Err(EngineError::NoWorld);
        }
        if let Some(expected) = self.contact_group {
            if contacts.group() != expected {
                return Err(EngineError::ForeignContactGroup {
                    expected,
                    found: contacts.group(),
                });
            }
        }
        // No body may change when the step is rejected.
        self.check_contact_bodies(contacts)?;
        let dt = dt as f32;

        for body in self.bodies.iter_mut().filter(|b| b.body_type == BodyType::Dynamic) {
            body.linear_velocity += self.gravity * dt;
        }

        self.resolve_contacts(contacts)?;
        self.held_contacts = contacts.len();

        for body in self.bodies.iter_mut().filter(|b| b.body_type != BodyType::Static) {
            body.pose.position += body.linear_velocity * dt;
            body.pose.rotation = body.pose.rotation.integrate(body.angular_velocity, dt);
        }
        Ok(())
    }

    fn empty_contact_group(&mut self, group: ContactGroupId) {
        if self.contact_group == Some(group) {
            self.held_contacts = 0;
        } else {
            log::warn!("Asked to empty {group}, which this engine does not own.");
        }
    }

    fn add_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, EngineError> {
        if self.world.is_none() {
            return Err(EngineError::NoWorld);
        }
        if desc.body_type == BodyType::Dynamic && !(desc.mass > 0.0 && desc.mass.is_finite()) {
            return Err(EngineError::InvalidBody(format!(
                "dynamic body mass must be positive and finite, got {}",
                desc.mass
            )));
        }

        let handle = BodyHandle(self.bodies.len() as u64);
        self.bodies.push(BodyState {
            pose: Pose::new(desc.position, desc.rotation.normalize()),
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            body_type: desc.body_type,
            mass: desc.mass,
        });
        log::trace!("Added {:?} {handle} at {:?}.", desc.body_type, desc.position);
        Ok(handle)
    }

    fn body_state(&self, handle: BodyHandle) -> Option<BodyState> {
        self.bodies.get(handle.0 as usize).copied()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
