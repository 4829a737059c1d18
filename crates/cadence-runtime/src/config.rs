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

//! Run configuration loaded from JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cadence_core::math::Vec3;
use cadence_infra::DEFAULT_GRAVITY;
use cadence_sim::SchedulerConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to run a scene headlessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Frame rate and sub-step settings.
    pub scheduler: SchedulerConfig,
    /// Number of frames to run.
    pub frames: u64,
    /// Gravity applied by the physics engine.
    pub gravity: Vec3,
    /// What to put in the world.
    pub scene: SceneConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            frames: 300,
            gravity: DEFAULT_GRAVITY,
            scene: SceneConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        log::info!("Loaded configuration from {}.", path.display());
        Ok(config)
    }
}

/// Scene contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Adds the infinite ground plane.
    pub floor: bool,
    /// Replaces the ground plane with a triangle mesh.
    pub trimesh_floor: Option<TriMeshSpec>,
    /// Axes gizmo length, if one should be shown.
    pub axes: Option<f32>,
    /// Dynamic spheres.
    pub spheres: Vec<SphereSpec>,
    /// Dynamic boxes.
    pub boxes: Vec<BoxSpec>,
    /// Static boxes.
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            floor: true,
            trimesh_floor: None,
            axes: Some(1.0),
            spheres: vec![SphereSpec {
                name: "ball".to_string(),
                radius: 0.5,
                position: Vec3::new(0.0, 2.0, 0.0),
                mass: 1.0,
            }],
            boxes: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}

/// A triangle-mesh floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriMeshSpec {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangle vertex indices.
    pub indices: Vec<[u32; 3]>,
}

/// A dynamic sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereSpec {
    /// Entity name.
    pub name: String,
    /// Radius in metres.
    pub radius: f32,
    /// Starting position.
    pub position: Vec3,
    /// Mass in kg.
    #[serde(default = "unit_mass")]
    pub mass: f32,
}

/// A dynamic box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Entity name.
    pub name: String,
    /// Full side lengths.
    pub size: Vec3,
    /// Starting position.
    pub position: Vec3,
    /// Mass in kg.
    #[serde(default = "unit_mass")]
    pub mass: f32,
}

/// A static box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Entity name.
    pub name: String,
    /// Full side lengths.
    pub size: Vec3,
    /// Centre position.
    pub position: Vec3,
}

fn unit_mass() -> f32 {
    1.0
}
