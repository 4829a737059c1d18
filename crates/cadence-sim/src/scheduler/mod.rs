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

//! The fixed-timestep scheduler.
//!
//! One call to [`Scheduler::advance_frame`] runs a whole frame:
//!
//! ```text
//! frame_count += 1
//! publish pre-frame
//! repeat steps_per_frame times:
//!     publish pre-step
//!     run step callbacks
//!     detect collisions        (engine error -> abort frame)
//!     integrate by time_step   (engine error -> abort frame)
//!     sim_time += time_step, iteration_count += 1
//!     release contacts
//!     publish post-step
//! publish post-frame
//! clear step callbacks
//! refresh actors
//! ```
//!
//! Listener and actor failures are logged and counted, never returned.

mod scene;

use std::time::Instant;

use cadence_core::actor::{Actor, ActorFactory};
use cadence_core::event::{LifecycleSignal, NotificationChannel, SignalEvent};
use cadence_core::physics::{
    BodyHandle, CollisionEngine, ContactConstraintSet, ContactGroupId, PhysicsEngine, SpaceId,
    WorldId,
};

use crate::callbacks::{StepCallbackQueue, StepCallbackRegistrar};
use crate::entity::{EntityHandle, EntityRegistry, SimulatedEntity};
use crate::{SchedulerConfig, SchedulerError, SimulationClock, SimulationStats};

/// Engine objects created by [`Scheduler::initialize_world`].
#[derive(Debug)]
struct WorldState {
    world: WorldId,
    space: SpaceId,
    contact_group: ContactGroupId,
    contacts: ContactConstraintSet,
}

/// Handles already obtained by an `initialize_world` call that failed later on.
#[derive(Debug, Default, Clone, Copy)]
struct PartialWorld {
    contact_group: Option<ContactGroupId>,
    world: Option<WorldId>,
}

#[derive(Debug, Default, Clone, Copy)]
struct FaultCounters {
    listener: u64,
    actor: u64,
}

/// Drives a physics world in fixed sub-steps per rendered frame.
///
/// The scheduler is single-threaded: it owns its collaborators, its entity
/// registry and its callback queue, and every operation runs to completion
/// before returning.
pub struct Scheduler {
    config: SchedulerConfig,
    clock: SimulationClock,
    paused: bool,
    collision: Box<dyn CollisionEngine>,
    physics: Box<dyn PhysicsEngine>,
    channel: Box<dyn NotificationChannel>,
    actor_factory: Option<Box<dyn ActorFactory>>,
    world: Option<WorldState>,
    partial: PartialWorld,
    callbacks: StepCallbackQueue,
    entities: EntityRegistry,
    faults: FaultCounters,
    frame_contacts: usize,
}

impl Scheduler {
    /// Creates a scheduler. No engine state is created until
    /// [`initialize_world`](Self::initialize_world).
    pub fn new(
        config: SchedulerConfig,
        collision: Box<dyn CollisionEngine>,
        physics: Box<dyn PhysicsEngine>,
        channel: Box<dyn NotificationChannel>,
    ) -> Result<Self, SchedulerError> {
        let clock = SimulationClock::new(&config)?;
        log::debug!(
            "Scheduler created: {} fps, {} steps/frame, time step {:.6}s.",
            clock.frames_per_second(),
            clock.steps_per_frame(),
            clock.time_step()
        );
        Ok(Self {
            config,
            clock,
            paused: false,
            collision,
            physics,
            channel,
            actor_factory: None,
            world: None,
            partial: PartialWorld::default(),
            callbacks: StepCallbackQueue::new(),
            entities: EntityRegistry::default(),
            faults: FaultCounters::default(),
            frame_contacts: 0,
        })
    }

    /// Attaches the factory used by the convenience constructors.
    pub fn with_actor_factory(mut self, factory: Box<dyn ActorFactory>) -> Self {
        self.actor_factory = Some(factory);
        self
    }

    /// Creates the contact group and world in the physics engine and the
    /// space in the collision engine. Must succeed once, before the first
    /// frame.
    ///
    /// A failed call may be retried: handles created before the failure are
    /// kept and not requested again.
    pub fn initialize_world(&mut self) -> Result<(), SchedulerError> {
        if self.world.is_some() {
            return Err(SchedulerError::AlreadyInitialized);
        }

        let contact_group = match self.partial.contact_group {
            Some(group) => group,
            None => {
                let group = self.physics.create_contact_group()?;
                self.partial.contact_group = Some(group);
                group
            }
        };
        let world = match self.partial.world {
            Some(world) => world,
            None => {
                let world = self.physics.create_world()?;
                self.partial.world = Some(world);
                world
            }
        };
        let space = self.collision.create_space()?;
        self.partial = PartialWorld::default();
        self.world = Some(WorldState {
            world,
            space,
            contact_group,
            contacts: ContactConstraintSet::empty(contact_group),
        });

        log::info!("Simulation world initialized ({world:?}, {space:?}, {contact_group}).");
        Ok(())
    }

    /// Runs one frame. Expected once per rendered frame.
    ///
    /// A collision or physics failure aborts the frame and is returned; the
    /// clock then reflects only the sub-steps that completed, and the
    /// post-frame signal, callback clear and actor refresh are skipped.
    pub fn advance_frame(&mut self) -> Result<(), SchedulerError> {
        if self.world.is_none() {
            return Err(SchedulerError::NotInitialized);
        }

        let started = Instant::now();
        self.clock.begin_frame();
        self.frame_contacts = 0;

        self.publish(LifecycleSignal::PreFrame);
        self.perform_steps_per_frame()?;
        self.publish(LifecycleSignal::PostFrame);

        let discarded = self.callbacks.clear();
        let refreshed = self.refresh_actors();

        if self.config.debug {
            log::debug!(
                "Frame {} done in {:.3} ms: t={:.4}s, {} contacts, {} actors refreshed, {} callbacks dropped.",
                self.clock.frame_count(),
                started.elapsed().as_secs_f64() * 1000.0,
                self.clock.sim_time(),
                self.frame_contacts,
                refreshed,
                discarded
            );
        }
        Ok(())
    }

    fn perform_steps_per_frame(&mut self) -> Result<(), SchedulerError> {
        for _ in 0..self.clock.steps_per_frame() {
            self.publish(LifecycleSignal::PreStep);
            let callbacks_run = self.callbacks.run_all();

            let outcome = self.collide_and_integrate();
            self.release_contacts();
            let contacts = outcome?;

            if self.config.debug {
                log::trace!(
                    "Step {}: {} callbacks, {} contacts, t={:.5}s.",
                    self.clock.iteration_count(),
                    callbacks_run,
                    contacts,
                    self.clock.sim_time()
                );
            }
            self.publish(LifecycleSignal::PostStep);
        }
        Ok(())
    }

    /// Collision pass plus integration; returns the number of contacts.
    fn collide_and_integrate(&mut self) -> Result<usize, SchedulerError> {
        let state = self.world.as_mut().ok_or(SchedulerError::NotInitialized)?;

        state.contacts = self
            .collision
            .detect_collisions(self.physics.as_ref(), state.contact_group)?;

        // Recomputed every sub-step rather than cached.
        let time_step = self.clock.time_step();
        self.physics.integrate(&state.contacts, time_step)?;
        self.clock.complete_step(time_step);

        let count = state.contacts.len();
        self.frame_contacts += count;
        Ok(count)
    }

    /// Contacts must never survive into the next sub-step.
    fn release_contacts(&mut self) {
        if let Some(state) = self.world.as_mut() {
            state.contacts.clear();
            self.physics.empty_contact_group(state.contact_group);
        }
    }

    fn publish(&mut self, signal: LifecycleSignal) {
        let event = SignalEvent::new(
            signal,
            self.clock.frame_count(),
            self.clock.iteration_count(),
            self.clock.sim_time(),
        );
        if let Err(e) = self.channel.publish(&event) {
            self.faults.listener += e.failures.len().max(1) as u64;
            if e.failures.is_empty() {
                log::error!("Publishing `{signal}` failed (frame {}): {e}", event.frame);
            }
            for (listener, cause) in &e.failures {
                log::error!(
                    "Listener '{listener}' failed on `{signal}` (frame {}): {cause}",
                    event.frame
                );
            }
        }
    }

    /// Copies body poses into the actors of every updatable entity.
    ///
    /// Failures are logged per entity and do not stop the others. Returns
    /// the number of actors refreshed.
    pub fn refresh_actors(&mut self) -> usize {
        let mut refreshed = 0;
        for entity in self.entities.iter_mut().filter(|e| e.is_updatable()) {
            match entity.refresh(self.physics.as_ref()) {
                Ok(()) => refreshed += 1,
                Err(e) => {
                    self.faults.actor += 1;
                    log::warn!("Failed to refresh actor of '{}': {e}", entity.name());
                }
            }
        }
        refreshed
    }

    /// Queues `callback` to run before collision detection on every
    /// remaining sub-step of the current (or next) frame.
    pub fn register_step_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Returns a handle that can queue callbacks while a frame is running.
    pub fn step_callback_registrar(&self) -> StepCallbackRegistrar {
        self.callbacks.registrar()
    }

    /// Registers an entity under `name`.
    ///
    /// Names are not validated: an existing entry with the same name is
    /// replaced.
    pub fn add_entity(
        &mut self,
        name: impl Into<String>,
        body: Option<BodyHandle>,
        actor: Option<Box<dyn Actor>>,
    ) -> EntityHandle {
        let mut entity = SimulatedEntity::new(name);
        if let Some(body) = body {
            entity = entity.with_body(body);
        }
        if let Some(actor) = actor {
            entity = entity.with_actor(actor);
        }
        self.insert_entity(entity)
    }

    /// Registers a fully built entity, with the same overwrite rule as
    /// [`add_entity`](Self::add_entity).
    pub fn insert_entity(&mut self, entity: SimulatedEntity) -> EntityHandle {
        let (handle, previous) = self.entities.insert(entity);
        if previous.is_some() {
            log::warn!("Entity '{}' was already registered; replacing it.", handle.name());
        }
        handle
    }

    /// Flips the pause flag and returns the new value.
    ///
    /// Stepping does not consult the flag; drivers decide what pausing means.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Simulation {}.", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Whether the pause flag is set.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether [`initialize_world`](Self::initialize_world) has run.
    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    /// The configuration the scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Seconds per sub-step.
    pub fn time_step(&self) -> f64 {
        self.clock.time_step()
    }

    /// Resolves a handle to its entity.
    pub fn entity(&self, handle: &EntityHandle) -> Option<&SimulatedEntity> {
        self.entities.get(handle.name())
    }

    /// Looks an entity up by name.
    pub fn entity_by_name(&self, name: &str) -> Option<&SimulatedEntity> {
        self.entities.get(name)
    }

    /// Iterates over every registered entity, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &SimulatedEntity> {
        self.entities.iter()
    }

    /// Step callbacks queued or in flight.
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.len()
    }

    /// Contacts currently held; zero between sub-steps.
    pub fn pending_contacts(&self) -> usize {
        self.world.as_ref().map_or(0, |state| state.contacts.len())
    }

    /// The physics engine.
    pub fn physics(&self) -> &dyn PhysicsEngine {
        self.physics.as_ref()
    }

    /// The physics engine, mutably, for adding bodies.
    pub fn physics_mut(&mut self) -> &mut dyn PhysicsEngine {
        self.physics.as_mut()
    }

    /// The collision engine, mutably, for adding geometry.
    pub fn collision_mut(&mut self) -> &mut dyn CollisionEngine {
        self.collision.as_mut()
    }

    /// A snapshot of counters and sizes.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            frame_count: self.clock.frame_count(),
            iteration_count: self.clock.iteration_count(),
            sim_time: self.clock.sim_time(),
            time_step: self.clock.time_step(),
            entity_count: self.entities.len(),
            body_count: self.physics.body_count(),
            geometry_count: self.collision.geometry_count(),
            pending_callbacks: self.callbacks.len(),
            last_frame_contacts: self.frame_contacts,
            listener_faults: self.faults.listener,
            actor_faults: self.faults.actor,
            paused: self.paused,
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("paused", &self.paused)
            .field("world", &self.world)
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}
