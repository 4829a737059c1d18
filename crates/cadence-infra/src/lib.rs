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

//! # Cadence Infra
//!
//! Concrete backends for the contracts defined in `cadence-core`: a native
//! collision engine, a native rigid-body integrator and headless actors.

#![warn(missing_docs)]

pub mod actors;
pub mod collision;
pub mod dynamics;

pub use actors::{HeadlessActor, HeadlessActorFactory};
pub use collision::NativeCollisionEngine;
pub use dynamics::{NativePhysicsEngine, DEFAULT_GRAVITY};
