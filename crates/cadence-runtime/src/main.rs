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

//! Headless Cadence driver.

mod cli;
mod config;
mod scene;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use cadence_core::event::{LifecycleSignal, ObserverList, SignalBus};
use cadence_core::math::Vec3;
use cadence_infra::{HeadlessActorFactory, NativeCollisionEngine, NativePhysicsEngine};
use cadence_sim::{Scheduler, SimulationStats};
use clap::Parser;
use serde::Serialize;

use crate::cli::Cli;
use crate::config::RuntimeConfig;

/// Final state of one dynamic entity.
#[derive(Debug, Serialize)]
struct BodyReport {
    name: String,
    position: Vec3,
    speed: f32,
}

/// What a run produced.
#[derive(Debug, Serialize)]
struct RunReport {
    stats: SimulationStats,
    skipped_frames: u64,
    signals: BTreeMap<&'static str, usize>,
    bodies: Vec<BodyReport>,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    let cli = Cli::parse();
    Builder::from_env(Env::default().default_filter_or(if cli.debug { "debug" } else { "info" }))
        .init();

    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_path(path)?,
        None => RuntimeConfig::default(),
    };
    cli.apply(&mut config);

    let bus = SignalBus::new();
    let mut observers = ObserverList::new();
    observers.forward_to("signal-bus", bus.sender());

    let mut scheduler = Scheduler::new(
        config.scheduler.clone(),
        Box::new(NativeCollisionEngine::new()),
        Box::new(NativePhysicsEngine::new().with_gravity(config.gravity)),
        Box::new(observers),
    )?
    .with_actor_factory(Box::new(HeadlessActorFactory::new()));
    scheduler.initialize_world()?;
    scene::populate(&mut scheduler, &config.scene)?;

    let report = run(&mut scheduler, &bus, config.frames, cli.pause_every)?;

    log::info!(
        "Finished: {} frames, {} steps, t={:.3}s, {} frame(s) skipped while paused.",
        report.stats.frame_count,
        report.stats.iteration_count,
        report.stats.sim_time,
        report.skipped_frames
    );
    for body in &report.bodies {
        log::info!(
            "  {} at ({:.3}, {:.3}, {:.3}), speed {:.3} m/s",
            body.name,
            body.position.x,
            body.position.y,
            body.position.z,
            body.speed
        );
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Drives `frames` frames, honouring the pause flag the way an interactive
/// host would: a paused frame is not simulated.
fn run(
    scheduler: &mut Scheduler,
    bus: &SignalBus,
    frames: u64,
    pause_every: Option<u64>,
) -> Result<RunReport> {
    let mut signals: BTreeMap<&'static str, usize> = LifecycleSignal::ALL
        .iter()
        .map(|signal| (signal.name(), 0))
        .collect();
    let mut skipped_frames = 0;

    for frame in 0..frames {
        if let Some(period) = pause_every.filter(|&p| p > 0) {
            if frame > 0 && frame % period == 0 {
                scheduler.toggle_pause();
            }
        }
        if scheduler.is_paused() {
            skipped_frames += 1;
            continue;
        }

        scheduler
            .advance_frame()
            .with_context(|| format!("frame {} failed", frame + 1))?;
        for (signal, count) in bus.drain_counts() {
            *signals.entry(signal.name()).or_default() += count;
        }
    }

    let mut bodies: Vec<BodyReport> = scheduler
        .entities()
        .filter_map(|entity| {
            let state = scheduler.physics().body_state(entity.body()?)?;
            Some(BodyReport {
                name: entity.name().to_string(),
                position: state.pose.position,
                speed: state.linear_velocity.length(),
            })
        })
        .collect();
    bodies.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(RunReport {
        stats: scheduler.stats(),
        skipped_frames,
        signals,
        bodies,
    })
}
