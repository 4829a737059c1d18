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

//! Actors for runs without a renderer.
//!
//! The headless factory keeps the last pose of every actor it creates so a
//! driver can report where things ended up.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::actor::{Actor, ActorError, ActorFactory, ActorKind};
use cadence_core::math::Pose;

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    label: &'static str,
    pose: Pose,
    updates: u64,
}

type Slots = Rc<RefCell<Vec<Slot>>>;

/// A pose sink standing in for a rendered object.
#[derive(Debug)]
pub struct HeadlessActor {
    index: usize,
    slots: Slots,
}

impl Actor for HeadlessActor {
    fn set_pose(&mut self, pose: Pose) -> Result<(), ActorError> {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(self.index).ok_or(ActorError::Detached)?;
        slot.pose = pose;
        slot.updates += 1;
        Ok(())
    }
}

/// Builds [`HeadlessActor`]s for every [`ActorKind`].
#[derive(Debug, Default, Clone)]
pub struct HeadlessActorFactory {
    slots: Slots,
}

impl HeadlessActorFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actors created so far.
    pub fn created(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Kind label, latest pose and update count of every actor, in creation order.
    pub fn snapshot(&self) -> Vec<(&'static str, Pose, u64)> {
        self.slots
            .borrow()
            .iter()
            .map(|slot| (slot.label, slot.pose, slot.updates))
            .collect()
    }
}

impl ActorFactory for HeadlessActorFactory {
    fn create_actor(&mut self, kind: &ActorKind) -> Result<Box<dyn Actor>, ActorError> {
        let mut slots = self.slots.borrow_mut();
        slots.push(Slot {
            label: kind.label(),
            pose: Pose::IDENTITY,
            updates: 0,
        });
        log::debug!("Created headless {} actor #{}.", kind.label(), slots.len() - 1);
        Ok(Box::new(HeadlessActor {
            index: slots.len() - 1,
            slots: Rc::clone(&self.slots),
        }))
    }
}
