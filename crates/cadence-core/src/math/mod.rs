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

//! Provides the small set of 3D math primitives the scheduler and its
//! collaborators exchange.
//!
//! Physics state is stored in `f32`, like most real-time engines. Simulated
//! time is kept in `f64` by the clock and only narrowed when it reaches an
//! engine.

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

mod pose;
mod quaternion;
mod vector;

pub use self::pose::Pose;
pub use self::quaternion::Quat;
pub use self::vector::Vec3;

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use cadence_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
