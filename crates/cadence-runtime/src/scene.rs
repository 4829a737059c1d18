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

//! Builds the configured scene on a scheduler.

use anyhow::{Context, Result};
use cadence_sim::Scheduler;

use crate::config::SceneConfig;

/// Adds every entity described by `scene`. The scheduler must be
/// initialized and carry an actor factory.
pub fn populate(scheduler: &mut Scheduler, scene: &SceneConfig) -> Result<()> {
    match &scene.trimesh_floor {
        Some(mesh) => {
            scheduler
                .add_trimesh_floor(mesh.vertices.clone(), mesh.indices.clone())
                .context("failed to add triangle-mesh floor")?;
        }
        None if scene.floor => {
            scheduler.add_floor().context("failed to add floor")?;
        }
        None => {}
    }

    if let Some(length) = scene.axes {
        scheduler.add_axes_gizmo(length).context("failed to add axes")?;
    }

    for obstacle in &scene.obstacles {
        scheduler
            .add_obstacle(obstacle.name.clone(), obstacle.size, obstacle.position)
            .with_context(|| format!("failed to add obstacle '{}'", obstacle.name))?;
    }
    for sphere in &scene.spheres {
        scheduler
            .add_sphere(sphere.name.clone(), sphere.radius, sphere.position, sphere.mass)
            .with_context(|| format!("failed to add sphere '{}'", sphere.name))?;
    }
    for cube in &scene.boxes {
        scheduler
            .add_box(cube.name.clone(), cube.size, cube.position, cube.mass)
            .with_context(|| format!("failed to add box '{}'", cube.name))?;
    }

    log::info!(
        "Scene ready: {} entities, {} bodies.",
        scheduler.entities().count(),
        scheduler.physics().body_count()
    );
    Ok(())
}
