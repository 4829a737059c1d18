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

//! # Impulse Solver
//!
//! Pure mathematical implementation of contact resolution using impulses.

use super::ContactManifold;
use crate::math::Vec3;

/// The part of a body's state the solver reads and writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverBody {
    /// World position.
    pub position: Vec3,
    /// Linear velocity.
    pub linear_velocity: Vec3,
    /// Inverse mass; `0.0` for anything that must not move.
    pub inverse_mass: f32,
}

impl SolverBody {
    /// An immovable body, used for static geometry.
    pub const FIXED: SolverBody = SolverBody {
        position: Vec3::ZERO,
        linear_velocity: Vec3::ZERO,
        inverse_mass: 0.0,
    };
}

/// Sequential impulse resolution of a single contact.
#[derive(Debug, Clone)]
pub struct ImpulseSolver {
    /// Coefficient of restitution (bounciness).
    pub restitution: f32,
    /// Approach speeds below this are treated as resting contact (no bounce).
    pub restitution_threshold: f32,
    /// Fraction of penetration removed per resolution (Baumgarte stabilization).
    pub baumgarte_percent: f32,
    /// Penetration allowance to avoid jitter.
    pub slop: f32,
}

impl ImpulseSolver {
    /// Creates a new `ImpulseSolver` with default physical constants.
    pub fn new() -> Self {
        Self {
            restitution: 0.2,
            restitution_threshold: 1.0,
            baumgarte_percent: 0.2,
            slop: 0.01,
        }
    }

    /// Resolves the contact between `a` and `b`; the manifold normal points from `a` to `b`.
    pub fn resolve(
        &self,
        mut a: SolverBody,
        mut b: SolverBody,
        manifold: &ContactManifold,
    ) -> (SolverBody, SolverBody) {
        let total_inv_mass = a.inverse_mass + b.inverse_mass;
        if total_inv_mass <= 0.0 {
            return (a, b);
        }

        // 1. Relative velocity along the normal; positive means separating.
        let rv = b.linear_velocity - a.linear_velocity;
        let vel_along_normal = rv.dot(manifold.normal);

        if vel_along_normal < 0.0 {
            // 2. Impulse magnitude, without bounce for slow resting contacts.
            let restitution = if -vel_along_normal < self.restitution_threshold {
                0.0
            } else {
                self.restitution
            };
            let j = -(1.0 + restitution) * vel_along_normal / total_inv_mass;
            let impulse = manifold.normal * j;
            a.linear_velocity -= impulse * a.inverse_mass;
            b.linear_velocity += impulse * b.inverse_mass;
        }

        // 3. Positional correction (linear projection).
        let correction_mag =
            (manifold.depth - self.slop).max(0.0) / total_inv_mass * self.baumgarte_percent;
        let correction = manifold.normal * correction_mag;
        a.position -= correction * a.inverse_mass;
        b.position += correction * b.inverse_mass;

        (a, b)
    }
}

impl Default for ImpulseSolver {
    fn default() -> Self {
        Self::new()
    }
}
