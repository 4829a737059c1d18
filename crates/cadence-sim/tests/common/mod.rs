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

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use cadence_core::actor::{Actor, ActorError, ActorFactory, ActorKind};
use cadence_core::event::{
    LifecycleSignal, ListenerError, NotificationChannel, PublishError, SignalEvent,
};
use cadence_core::math::{Pose, Vec3};
use cadence_core::physics::{
    BodyHandle, BodyState, CollisionEngine, Contact, ContactConstraintSet,
    ContactGroupId, EngineError, GeomHandle, GeometryDesc, PhysicsEngine, RigidBodyDesc, SpaceId,
    WorldId,
};
use cadence_sim::{Scheduler, SchedulerConfig};

// --- Log capture ---

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Installs the capturing logger and clears this thread's buffer.
pub fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Messages logged on this thread at `level` since the last `capture_logs`.
pub fn logged(level: log::Level) -> Vec<String> {
    CAPTURED.with(|c| {
        c.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    })
}

// --- Shared recorder ---

/// Everything the stubs observe, shared with the test body.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Ordered trace of engine calls, signals and callbacks.
    pub trace: Vec<String>,
    pub detect_calls: usize,
    pub integrate_calls: usize,
    pub empty_calls: usize,
    /// Contact count handed to each `integrate` call.
    pub contacts_seen: Vec<usize>,
    /// `dt` handed to each `integrate` call.
    pub time_steps: Vec<f64>,
    /// Contacts produced by every detection pass.
    pub contacts_per_detect: usize,
    /// 1-based `detect_collisions` call that fails.
    pub fail_detect_on: Option<usize>,
    /// 1-based `integrate` call that fails.
    pub fail_integrate_on: Option<usize>,
    /// Fails the next `create_space` call only.
    pub fail_next_space: bool,
    pub bodies: Vec<BodyState>,
    pub geometries: usize,
}

pub type SharedRecorder = Rc<RefCell<Recorder>>;

pub fn recorder() -> SharedRecorder {
    Rc::new(RefCell::new(Recorder::default()))
}

// --- Engines ---

pub struct StubPhysics {
    recorder: SharedRecorder,
}

impl StubPhysics {
    pub fn new(recorder: &SharedRecorder) -> Self {
        Self {
            recorder: Rc::clone(recorder),
        }
    }
}

impl PhysicsEngine for StubPhysics {
    fn create_contact_group(&mut self) -> Result<ContactGroupId, EngineError> {
        self.recorder.borrow_mut().trace.push("create_contact_group".into());
        Ok(ContactGroupId(7))
    }

    fn create_world(&mut self) -> Result<WorldId, EngineError> {
        self.recorder.borrow_mut().trace.push("create_world".into());
        Ok(WorldId(1))
    }

    fn integrate(&mut self, contacts: &ContactConstraintSet, dt: f64) -> Result<(), EngineError> {
        let mut p = self.recorder.borrow_mut();
        p.integrate_calls += 1;
        p.trace.push("integrate".into());
        if p.fail_integrate_on == Some(p.integrate_calls) {
            return Err(EngineError::Backend("integrator diverged".into()));
        }
        p.contacts_seen.push(contacts.len());
        p.time_steps.push(dt);
        for body in p.bodies.iter_mut() {
            body.pose.position.y -= 0.1;
        }
        Ok(())
    }

    fn empty_contact_group(&mut self, _group: ContactGroupId) {
        let mut p = self.recorder.borrow_mut();
        p.empty_calls += 1;
        p.trace.push("empty".into());
    }

    fn add_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, EngineError> {
        let mut p = self.recorder.borrow_mut();
        p.bodies.push(BodyState {
            pose: Pose::new(desc.position, desc.rotation),
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            body_type: desc.body_type,
            mass: desc.mass,
        });
        Ok(BodyHandle(p.bodies.len() as u64 - 1))
    }

    fn body_state(&self, handle: BodyHandle) -> Option<BodyState> {
        self.recorder.borrow().bodies.get(handle.0 as usize).copied()
    }

    fn body_count(&self) -> usize {
        self.recorder.borrow().bodies.len()
    }
}

pub struct StubCollision {
    recorder: SharedRecorder,
}

impl StubCollision {
    pub fn new(recorder: &SharedRecorder) -> Self {
        Self {
            recorder: Rc::clone(recorder),
        }
    }
}

impl CollisionEngine for StubCollision {
    fn create_space(&mut self) -> Result<SpaceId, EngineError> {
        let mut p = self.recorder.borrow_mut();
        p.trace.push("create_space".into());
        if std::mem::take(&mut p.fail_next_space) {
            return Err(EngineError::Backend("out of broad-phase memory".into()));
        }
        Ok(SpaceId(3))
    }

    fn add_geometry(&mut self, _desc: GeometryDesc) -> Result<GeomHandle, EngineError> {
        let mut p = self.recorder.borrow_mut();
        p.geometries += 1;
        Ok(GeomHandle(p.geometries as u64))
    }

    fn detect_collisions(
        &mut self,
        _world: &dyn PhysicsEngine,
        group: ContactGroupId,
    ) -> Result<ContactConstraintSet, EngineError> {
        let mut p = self.recorder.borrow_mut();
        p.detect_calls += 1;
        p.trace.push("detect".into());
        if p.fail_detect_on == Some(p.detect_calls) {
            return Err(EngineError::Backend("broad phase overflow".into()));
        }
        let mut set = ContactConstraintSet::empty(group);
        for _ in 0..p.contacts_per_detect {
            set.push(Contact {
                body_a: Some(BodyHandle(0)),
                body_b: None,
                point: Vec3::ZERO,
                normal: Vec3::Y,
                depth: 0.01,
            });
        }
        Ok(set)
    }

    fn geometry_count(&self) -> usize {
        self.recorder.borrow().geometries
    }
}

// --- Notification channel ---

pub struct ScriptedChannel {
    recorder: SharedRecorder,
    pub events: Rc<RefCell<Vec<SignalEvent>>>,
    fail_on: Option<LifecycleSignal>,
}

impl ScriptedChannel {
    pub fn new(recorder: &SharedRecorder) -> Self {
        Self {
            recorder: Rc::clone(recorder),
            events: Rc::new(RefCell::new(Vec::new())),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, signal: LifecycleSignal) -> Self {
        self.fail_on = Some(signal);
        self
    }
}

impl NotificationChannel for ScriptedChannel {
    fn publish(&mut self, event: &SignalEvent) -> Result<(), PublishError> {
        self.recorder.borrow_mut().trace.push(event.signal.name().to_string());
        self.events.borrow_mut().push(*event);
        if self.fail_on == Some(event.signal) {
            return Err(PublishError::single(
                event.signal,
                "flaky-listener",
                ListenerError::new("listener exploded"),
            ));
        }
        Ok(())
    }
}

// --- Actors ---

#[derive(Debug, Default)]
pub struct ActorLog {
    pub kinds: Vec<&'static str>,
    /// Every pose set, tagged with the index of the actor that received it.
    pub poses: Vec<(usize, Pose)>,
    /// Index of the actor that rejects every pose.
    pub broken_actor: Option<usize>,
    /// Actor kind the factory refuses to build.
    pub unsupported: Option<&'static str>,
}

pub type SharedActorLog = Rc<RefCell<ActorLog>>;

pub struct RecordingActor {
    index: usize,
    log: SharedActorLog,
}

impl Actor for RecordingActor {
    fn set_pose(&mut self, pose: Pose) -> Result<(), ActorError> {
        let mut log = self.log.borrow_mut();
        if log.broken_actor == Some(self.index) {
            return Err(ActorError::Detached);
        }
        log.poses.push((self.index, pose));
        Ok(())
    }
}

pub struct RecordingFactory {
    pub log: SharedActorLog,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(ActorLog::default())),
        }
    }
}

impl ActorFactory for RecordingFactory {
    fn create_actor(&mut self, kind: &ActorKind) -> Result<Box<dyn Actor>, ActorError> {
        let index = {
            let mut log = self.log.borrow_mut();
            if log.unsupported == Some(kind.label()) {
                return Err(ActorError::Unsupported(kind.label()));
            }
            log.kinds.push(kind.label());
            log.kinds.len() - 1
        };
        Ok(Box::new(RecordingActor {
            index,
            log: Rc::clone(&self.log),
        }))
    }
}

/// A standalone actor for entities registered by hand.
pub fn recording_actor(log: &SharedActorLog, index: usize) -> Box<dyn Actor> {
    Box::new(RecordingActor {
        index,
        log: Rc::clone(log),
    })
}

// --- Builders ---

pub fn scheduler(config: SchedulerConfig, recorder: &SharedRecorder) -> Scheduler {
    Scheduler::new(
        config,
        Box::new(StubCollision::new(recorder)),
        Box::new(StubPhysics::new(recorder)),
        Box::new(ScriptedChannel::new(recorder)),
    )
    .expect("valid config")
}

pub fn initialized(config: SchedulerConfig, recorder: &SharedRecorder) -> Scheduler {
    let mut scheduler = scheduler(config, recorder);
    scheduler.initialize_world().expect("first initialization");
    recorder.borrow_mut().trace.clear();
    scheduler
}
