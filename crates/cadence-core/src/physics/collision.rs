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

use super::GeometryShape;
use crate::math::{Pose, Vec3};

/// One point of contact between two shapes, expressed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    /// Unit normal pointing from shape A towards shape B.
    pub normal: Vec3,
    /// Penetration depth.
    pub depth: f32,
    /// Contact point.
    pub point: Vec3,
}

impl ContactManifold {
    /// The same contact seen from the other shape.
    pub fn inverted(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Narrow-phase collision detection system.
///
/// Supports sphere/sphere, sphere/box, sphere/plane, box/plane,
/// sphere/trimesh and box/trimesh. Any other pairing yields no contact.
#[derive(Debug, Default)]
pub struct NarrowPhase;

impl NarrowPhase {
    /// Creates a new `NarrowPhase` instance.
    pub fn new() -> Self {
        Self
    }

    /// Detects collisions between two posed shapes.
    pub fn detect(
        &self,
        shape_a: &GeometryShape,
        pose_a: &Pose,
        shape_b: &GeometryShape,
        pose_b: &Pose,
    ) -> Vec<ContactManifold> {
        use GeometryShape::*;

        match (shape_a, shape_b) {
            (Sphere(ra), Sphere(rb)) => {
                sphere_sphere(pose_a.position, *ra, pose_b.position, *rb).into_iter().collect()
            }
            (Sphere(r), Box(half)) => {
                sphere_box(pose_a.position, *r, half, pose_b).into_iter().collect()
            }
            (Sphere(r), Plane { normal, offset }) => {
                let (n, d) = world_plane(*normal, *offset, pose_b);
                sphere_plane(pose_a.position, *r, n, d).into_iter().collect()
            }
            (Box(half), Plane { normal, offset }) => {
                let (n, d) = world_plane(*normal, *offset, pose_b);
                box_plane(half, pose_a, n, d)
            }
            (Sphere(r), TriMesh { vertices, indices }) => {
                sphere_trimesh(pose_a.position, *r, vertices, indices, pose_b)
            }
            (Box(half), TriMesh { vertices, indices }) => {
                box_trimesh(half, pose_a, vertices, indices, pose_b)
            }
            (Box(_), Sphere(_))
            | (Plane { .. }, Sphere(_))
            | (Plane { .. }, Box(_))
            | (TriMesh { .. }, Sphere(_))
            | (TriMesh { .. }, Box(_)) => self
                .detect(shape_b, pose_b, shape_a, pose_a)
                .into_iter()
                .map(ContactManifold::inverted)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn world_plane(normal: Vec3, offset: f32, pose: &Pose) -> (Vec3, f32) {
    let n = pose.rotation.rotate_vec3(normal).normalize();
    (n, offset + n.dot(pose.position))
}

fn sphere_sphere(pa: Vec3, ra: f32, pb: Vec3, rb: f32) -> Option<ContactManifold> {
    let delta = pb - pa;
    let dist_sq = delta.length_squared();
    let total_r = ra + rb;
    if dist_sq >= total_r * total_r {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0001 { delta / dist } else { Vec3::Y };
    Some(ContactManifold {
        normal,
        depth: total_r - dist,
        point: pa + normal * ra,
    })
}

fn sphere_box(center: Vec3, radius: f32, half: &Vec3, box_pose: &Pose) -> Option<ContactManifold> {
    let local = box_pose.inverse_transform_point(center);
    let closest = local.clamp_to_extent(*half);
    let delta = local - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    // Normal from the box surface towards the sphere centre, flipped so it
    // points from the sphere into the box.
    let outward = if dist > 0.0001 { delta / dist } else { Vec3::Y };
    Some(ContactManifold {
        normal: -box_pose.rotation.rotate_vec3(outward),
        depth: radius - dist,
        point: box_pose.transform_point(closest),
    })
}

fn sphere_plane(center: Vec3, radius: f32, n: Vec3, d: f32) -> Option<ContactManifold> {
    let dist = n.dot(center) - d;
    if dist >= radius {
        return None;
    }
    Some(ContactManifold {
        normal: -n,
        depth: radius - dist,
        point: center - n * dist,
    })
}

fn box_corners(half: &Vec3, pose: &Pose) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
        let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
        let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
        *corner = pose.transform_point(Vec3::new(sx * half.x, sy * half.y, sz * half.z));
    }
    corners
}

fn box_plane(half: &Vec3, pose: &Pose, n: Vec3, d: f32) -> Vec<ContactManifold> {
    box_corners(half, pose)
        .into_iter()
        .filter_map(|corner| {
            let dist = n.dot(corner) - d;
            (dist < 0.0).then_some(ContactManifold {
                normal: -n,
                depth: -dist,
                point: corner,
            })
        })
        .collect()
}

fn triangles<'a>(
    vertices: &'a [Vec3],
    indices: &'a [[u32; 3]],
    pose: &'a Pose,
) -> impl Iterator<Item = [Vec3; 3]> + 'a {
    indices.iter().filter_map(move |tri| {
        let a = vertices.get(tri[0] as usize)?;
        let b = vertices.get(tri[1] as usize)?;
        let c = vertices.get(tri[2] as usize)?;
        Some([
            pose.transform_point(*a),
            pose.transform_point(*b),
            pose.transform_point(*c),
        ])
    })
}

fn triangle_normal([a, b, c]: &[Vec3; 3]) -> Option<Vec3> {
    let n = (*b - *a).cross(*c - *a);
    (n.length_squared() > 1e-12).then(|| n.normalize())
}

/// Closest point to `p` on triangle `abc` (Ericson, Real-Time Collision Detection 5.1.5).
fn closest_point_on_triangle(p: Vec3, [a, b, c]: &[Vec3; 3]) -> Vec3 {
    let (a, b, c) = (*a, *b, *c);
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

fn sphere_trimesh(
    center: Vec3,
    radius: f32,
    vertices: &[Vec3],
    indices: &[[u32; 3]],
    pose: &Pose,
) -> Vec<ContactManifold> {
    triangles(vertices, indices, pose)
        .filter_map(|tri| {
            let closest = closest_point_on_triangle(center, &tri);
            let delta = center - closest;
            let dist_sq = delta.length_squared();
            if dist_sq >= radius * radius {
                return None;
            }
            let dist = dist_sq.sqrt();
            let outward = if dist > 0.0001 {
                delta / dist
            } else {
                triangle_normal(&tri)?
            };
            Some(ContactManifold {
                normal: -outward,
                depth: radius - dist,
                point: closest,
            })
        })
        .collect()
}

fn box_trimesh(
    half: &Vec3,
    box_pose: &Pose,
    vertices: &[Vec3],
    indices: &[[u32; 3]],
    mesh_pose: &Pose,
) -> Vec<ContactManifold> {
    let max_depth = half.x.max(half.y).max(half.z);
    let corners = box_corners(half, box_pose);
    let mut manifolds = Vec::new();

    for tri in triangles(vertices, indices, mesh_pose) {
        let Some(n) = triangle_normal(&tri) else {
            continue;
        };
        for corner in corners {
            let dist = n.dot(corner - tri[0]);
            if dist >= 0.0 || dist <= -max_depth {
                continue;
            }
            // Only count corners whose projection lands inside the triangle.
            let projected = corner - n * dist;
            if (closest_point_on_triangle(projected, &tri) - projected).length_squared() > 1e-6 {
                continue;
            }
            manifolds.push(ContactManifold {
                normal: -n,
                depth: -dist,
                point: corner,
            });
        }
    }
    manifolds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;
    use approx::assert_abs_diff_eq;

    fn unit_quad() -> GeometryShape {
        GeometryShape::TriMesh {
            vertices: vec![
                Vec3::new(-5.0, 0.0, -5.0),
                Vec3::new(5.0, 0.0, -5.0),
                Vec3::new(5.0, 0.0, 5.0),
                Vec3::new(-5.0, 0.0, 5.0),
            ],
            indices: vec![[0, 2, 1], [0, 3, 2]],
        }
    }

    #[test]
    fn test_sphere_sphere_collision() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::Sphere(1.0),
            &Pose::IDENTITY,
            &GeometryShape::Sphere(1.0),
            &Pose::at(Vec3::new(1.5, 0.0, 0.0)),
        );
        assert_eq!(manifolds.len(), 1);
        assert_abs_diff_eq!(manifolds[0].normal, Vec3::X, epsilon = 1e-4);
        assert_abs_diff_eq!(manifolds[0].depth, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_resting_in_plane() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::Sphere(0.5),
            &Pose::at(Vec3::new(0.0, 0.4, 0.0)),
            &GeometryShape::ground(),
            &Pose::IDENTITY,
        );
        assert_eq!(manifolds.len(), 1);
        assert_abs_diff_eq!(manifolds[0].normal, -Vec3::Y, epsilon = 1e-5);
        assert_abs_diff_eq!(manifolds[0].depth, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_plane_sphere_is_mirrored() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::ground(),
            &Pose::IDENTITY,
            &GeometryShape::Sphere(0.5),
            &Pose::at(Vec3::new(0.0, 0.4, 0.0)),
        );
        assert_abs_diff_eq!(manifolds[0].normal, Vec3::Y, epsilon = 1e-5);
    }

    #[test]
    fn test_tilted_box_touches_plane_with_one_corner() {
        let narrow = NarrowPhase::new();
        let tilt = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0), 0.6);
        let manifolds = narrow.detect(
            &GeometryShape::Box(Vec3::splat(0.5)),
            &Pose::new(Vec3::new(0.0, 0.6, 0.0), tilt),
            &GeometryShape::ground(),
            &Pose::IDENTITY,
        );
        assert_eq!(manifolds.len(), 1);
        assert!(manifolds[0].point.y < 0.0);
    }

    #[test]
    fn test_sphere_box_separated() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::Sphere(0.5),
            &Pose::at(Vec3::new(0.0, 2.0, 0.0)),
            &GeometryShape::Box(Vec3::splat(1.0)),
            &Pose::IDENTITY,
        );
        assert!(manifolds.is_empty());
    }

    #[test]
    fn test_sphere_on_trimesh_floor() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::Sphere(0.5),
            &Pose::at(Vec3::new(1.0, 0.45, 2.0)),
            &unit_quad(),
            &Pose::IDENTITY,
        );
        assert!(!manifolds.is_empty());
        for m in &manifolds {
            assert_abs_diff_eq!(m.normal, -Vec3::Y, epsilon = 1e-4);
            assert_abs_diff_eq!(m.depth, 0.05, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_box_on_trimesh_floor() {
        let narrow = NarrowPhase::new();
        let manifolds = narrow.detect(
            &GeometryShape::Box(Vec3::splat(0.5)),
            &Pose::at(Vec3::new(0.0, 0.45, 0.0)),
            &unit_quad(),
            &Pose::IDENTITY,
        );
        // Four bottom corners, each inside exactly one triangle or on the shared diagonal.
        assert!(manifolds.len() >= 4);
        assert!(manifolds.iter().all(|m| m.normal.y > 0.99 || m.normal.y < -0.99));
    }

    #[test]
    fn test_plane_plane_yields_nothing() {
        let narrow = NarrowPhase::new();
        let ground = GeometryShape::ground();
        assert!(narrow
            .detect(&ground, &Pose::IDENTITY, &ground, &Pose::IDENTITY)
            .is_empty());
    }
}
