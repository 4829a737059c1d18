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

use super::{BodyHandle, ContactGroupId};

/// Failures raised by a collision or physics engine.
///
/// The scheduler never suppresses these: an engine failure aborts the frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The dynamics world has not been created yet.
    #[error("physics world has not been created")]
    NoWorld,
    /// The collision space has not been created yet.
    #[error("collision space has not been created")]
    NoSpace,
    /// The engine was asked to create its world or space a second time.
    #[error("{0} already exists")]
    AlreadyCreated(&'static str),
    /// A handle does not refer to a live body.
    #[error("unknown rigid body {0}")]
    UnknownBody(BodyHandle),
    /// A contact set was produced for a different contact group.
    #[error("contact set belongs to {found}, expected {expected}")]
    ForeignContactGroup {
        /// The group the engine owns.
        expected: ContactGroupId,
        /// The group the contact set was tagged with.
        found: ContactGroupId,
    },
    /// A body description was rejected.
    #[error("invalid body: {0}")]
    InvalidBody(String),
    /// A geometry description was rejected.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Backend-specific failure.
    #[error("engine failure: {0}")]
    Backend(String),
}
