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

use std::path::PathBuf;

use clap::Parser;

use crate::config::RuntimeConfig;

/// Cadence: runs a fixed-timestep physics scene without a renderer.
///
/// Flags override the values read from `--config`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON run configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Rendered frames per simulated second.
    #[arg(long)]
    pub fps: Option<f64>,

    /// Physics sub-steps per frame.
    #[arg(long)]
    pub steps: Option<u32>,

    /// Enable per-frame diagnostics.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Toggle the pause flag every N frames; paused frames are not simulated.
    #[arg(long)]
    pub pause_every: Option<u64>,

    /// Print the final report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(fps) = self.fps {
            config.scheduler.frames_per_second = fps;
        }
        if let Some(steps) = self.steps {
            config.scheduler.steps_per_frame = steps;
        }
        if self.debug {
            config.scheduler.debug = true;
        }
    }
}
