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

use cadence_core::math::{Pose, Vec3};
use cadence_core::physics::GeometryShape;

/// An axis-aligned bounding box used by the broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Aabb {
    pub(crate) min: Vec3,
    pub(crate) max: Vec3,
}

impl Aabb {
    /// Creates an `Aabb` from a center point and its half-extents.
    #[inline]
    pub(crate) fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = abs(half_extents);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Tightly encloses `points`, or `None` if there are none.
    pub(crate) fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Returns `true` if the two boxes overlap or touch.
    #[inline]
    pub(crate) fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// World-space bounds of `shape` at `pose`. Planes are unbounded and
    /// yield `None`.
    pub(crate) fn of_shape(shape: &GeometryShape, pose: &Pose) -> Option<Self> {
        match shape {
            GeometryShape::Plane { .. } => None,
            GeometryShape::Sphere(radius) => Some(Self::from_center_half_extents(
                pose.position,
                Vec3::splat(*radius),
            )),
            GeometryShape::Box(half) => {
                // Extent of a rotated box along each world axis.
                let r = &pose.rotation;
                let extent = abs(r.rotate_vec3(Vec3::X * half.x))
                    + abs(r.rotate_vec3(Vec3::Y * half.y))
                    + abs(r.rotate_vec3(Vec3::Z * half.z));
                Some(Self::from_center_half_extents(pose.position, extent))
            }
            GeometryShape::TriMesh { vertices, .. } => {
                Self::from_points(vertices.iter().map(|v| pose.transform_point(*v)))
            }
        }
    }
}

fn abs(v: Vec3) -> Vec3 {
    Vec3::new(v.x.abs(), v.y.abs(), v.z.abs())
}
