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

use cadence_core::event::ObserverList;
use cadence_core::math::Vec3;
use cadence_infra::{HeadlessActorFactory, NativeCollisionEngine, NativePhysicsEngine};
use cadence_sim::{Scheduler, SchedulerConfig};

fn native_scheduler(factory: &HeadlessActorFactory) -> Scheduler {
    let mut scheduler = Scheduler::new(
        SchedulerConfig::new(60.0, 2),
        Box::new(NativeCollisionEngine::new()),
        Box::new(NativePhysicsEngine::new()),
        Box::new(ObserverList::new()),
    )
    .unwrap()
    .with_actor_factory(Box::new(factory.clone()));
    scheduler.initialize_world().unwrap();
    scheduler
}

#[test]
fn test_ball_settles_on_floor() {
    let factory = HeadlessActorFactory::new();
    let mut scheduler = native_scheduler(&factory);
    scheduler.add_floor().unwrap();
    let ball = scheduler
        .add_sphere("ball", 0.5, Vec3::new(0.0, 2.0, 0.0), 1.0)
        .unwrap();

    // Three simulated seconds.
    for _ in 0..180 {
        scheduler.advance_frame().unwrap();
    }

    let body = scheduler.entity(&ball).unwrap().body().unwrap();
    let state = scheduler.physics().body_state(body).unwrap();
    assert!(
        (state.pose.position.y - 0.5).abs() < 0.05,
        "ball should rest on the floor, y = {}",
        state.pose.position.y
    );
    assert!(state.linear_velocity.length() < 0.1);

    // The actor mirrors the body after every frame.
    let (label, pose, updates) = factory.snapshot()[1];
    assert_eq!(label, "sphere");
    assert_eq!(pose, state.pose);
    assert_eq!(updates, 181);
}

#[test]
fn test_box_comes_to_rest_on_trimesh_floor() {
    let factory = HeadlessActorFactory::new();
    let mut scheduler = native_scheduler(&factory);
    let vertices = vec![
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(-5.0, 0.0, 5.0),
    ];
    scheduler
        .add_trimesh_floor(vertices, vec![[0, 2, 1], [0, 3, 2]])
        .unwrap();
    let crate_box = scheduler
        .add_box("crate", Vec3::ONE, Vec3::new(0.0, 1.5, 0.0), 2.0)
        .unwrap();

    for _ in 0..180 {
        scheduler.advance_frame().unwrap();
    }

    let body = scheduler.entity(&crate_box).unwrap().body().unwrap();
    let y = scheduler.physics().body_pose(body).unwrap().position.y;
    assert!((y - 0.5).abs() < 0.05, "box should rest on the mesh, y = {y}");
}

#[test]
fn test_sphere_falls_past_distant_obstacle() {
    let factory = HeadlessActorFactory::new();
    let mut scheduler = native_scheduler(&factory);
    scheduler.add_floor().unwrap();
    scheduler
        .add_obstacle("wall", Vec3::new(1.0, 4.0, 1.0), Vec3::new(5.0, 2.0, 0.0))
        .unwrap();
    let ball = scheduler
        .add_sphere("ball", 0.25, Vec3::new(0.0, 3.0, 0.0), 1.0)
        .unwrap();

    for _ in 0..120 {
        scheduler.advance_frame().unwrap();
    }

    let body = scheduler.entity(&ball).unwrap().body().unwrap();
    let position = scheduler.physics().body_pose(body).unwrap().position;
    assert!(position.x.abs() < 1e-4, "no sideways contact expected");
    assert!((position.y - 0.25).abs() < 0.05);
    assert_eq!(scheduler.stats().geometry_count, 3);
}
