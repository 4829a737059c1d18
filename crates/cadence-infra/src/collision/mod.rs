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

//! Native collision engine.
//!
//! A single flat space: every sub-step the geometries are posed from the
//! physics world, culled pairwise on their bounding boxes, then handed to the
//! [`NarrowPhase`].

mod aabb;

use cadence_core::math::{Pose, Vec3};
use cadence_core::physics::{
    BodyHandle, CollisionEngine, Contact, ContactConstraintSet, ContactGroupId, EngineError,
    GeomHandle, GeometryDesc, GeometryShape, NarrowPhase, PhysicsEngine, SpaceId,
};

use self::aabb::Aabb;

struct Geometry {
    handle: GeomHandle,
    shape: GeometryShape,
    body: Option<BodyHandle>,
    offset: Pose,
}

/// Geometry posed for the current pass.
struct Posed<'a> {
    geometry: &'a Geometry,
    pose: Pose,
    bounds: Option<Aabb>,
}

/// Collision detection over a brute-force pair list.
#[derive(Default)]
pub struct NativeCollisionEngine {
    space: Option<SpaceId>,
    geometries: Vec<Geometry>,
    next_handle: u64,
    narrow_phase: NarrowPhase,
}

impl NativeCollisionEngine {
    /// Creates an engine with no space.
    pub fn new() -> Self {
        Self::default()
    }

    fn pose_geometries<'a>(
        &'a self,
        world: &dyn PhysicsEngine,
    ) -> Result<Vec<Posed<'a>>, EngineError> {
        self.geometries
            .iter()
            .map(|geometry| {
                let pose = match geometry.body {
                    Some(body) => world
                        .body_pose(body)
                        .ok_or(EngineError::UnknownBody(body))?
                        .then(&geometry.offset),
                    None => geometry.offset,
                };
                Ok(Posed {
                    geometry,
                    bounds: Aabb::of_shape(&geometry.shape, &pose),
                    pose,
                })
            })
            .collect()
    }
}

/// Whether a pair can produce contacts worth solving.
fn is_candidate(a: &Posed<'_>, b: &Posed<'_>) -> bool {
    match (a.geometry.body, b.geometry.body) {
        (None, None) => false,
        (Some(x), Some(y)) if x == y => false,
        _ => match (a.bounds, b.bounds) {
            (Some(ba), Some(bb)) => ba.intersects(&bb),
            _ => true,
        },
    }
}

fn validate(desc: &GeometryDesc) -> Result<GeometryShape, EngineError> {
    let invalid = |msg: String| Err(EngineError::InvalidGeometry(msg));
    match &desc.shape {
        GeometryShape::Sphere(radius) if !(*radius > 0.0) => {
            invalid(format!("sphere radius must be positive, got {radius}"))
        }
        GeometryShape::Box(half) if !(half.x > 0.0 && half.y > 0.0 && half.z > 0.0) => {
            invalid(format!("box half-extents must be positive, got {half:?}"))
        }
        GeometryShape::Plane { normal, offset } => {
            if normal.length_squared() < 1e-12 {
                return invalid("plane normal must be non-zero".to_string());
            }
            Ok(GeometryShape::Plane {
                normal: normal.normalize(),
                offset: *offset,
            })
        }
        GeometryShape::TriMesh { vertices, indices } => {
            if indices.is_empty() {
                return invalid("triangle mesh has no triangles".to_string());
            }
            if let Some(bad) = indices
                .iter()
                .flatten()
                .find(|&&i| i as usize >= vertices.len())
            {
                return invalid(format!(
                    "triangle index {bad} out of range for {} vertices",
                    vertices.len()
                ));
            }
            Ok(desc.shape.clone())
        }
        shape => Ok(shape.clone()),
    }
}

impl CollisionEngine for NativeCollisionEngine {
    fn create_space(&mut self) -> Result<SpaceId, EngineError> {
        if self.space.is_some() {
            return Err(EngineError::AlreadyCreated("collision space"));
        }
        let space = SpaceId(0);
        self.space = Some(space);
        Ok(space)
    }

    fn add_geometry(&mut self, desc: GeometryDesc) -> Result<GeomHandle, EngineError> {
        if self.space.is_none() {
            return Err(EngineError::NoSpace);
        }
        let shape = validate(&desc)?;

        let handle = GeomHandle(self.next_handle);
        self.next_handle += 1;
        log::trace!("Geometry {handle:?} added, attached to {:?}.", desc.body);
        self.geometries.push(Geometry {
            handle,
            shape,
            body: desc.body,
            offset: desc.offset,
        });
        Ok(handle)
    }

    fn detect_collisions(
        &mut self,
        world: &dyn PhysicsEngine,
        group: ContactGroupId,
    ) -> Result<ContactConstraintSet, EngineError> {
        if self.space.is_none() {
            return Err(EngineError::NoSpace);
        }

        let posed = self.pose_geometries(world)?;
        let mut contacts = ContactConstraintSet::empty(group);

        for (i, a) in posed.iter().enumerate() {
            for b in posed.iter().skip(i + 1).filter(|b| is_candidate(a, b)) {
                let manifolds =
                    self.narrow_phase
                        .detect(&a.geometry.shape, &a.pose, &b.geometry.shape, &b.pose);
                if !manifolds.is_empty() {
                    log::trace!(
                        "{:?} x {:?}: {} contact(s).",
                        a.geometry.handle,
                        b.geometry.handle,
                        manifolds.len()
                    );
                }
                contacts.extend(manifolds.into_iter().map(|m| Contact {
                    body_a: a.geometry.body,
                    body_b: b.geometry.body,
                    point: m.point,
                    normal: m.normal,
                    depth: m.depth,
                }));
            }
        }

        Ok(contacts)
    }

    fn geometry_count(&self) -> usize {
        self.geometries.len()
    }
}

impl std::fmt::Debug for NativeCollisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeCollisionEngine")
            .field("space", &self.space)
            .field("geometries", &self.geometries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::physics::{BodyState, BodyType, RigidBodyDesc, WorldId};
    use std::collections::HashMap;

    /// Poses only; collision never integrates.
    #[derive(Default)]
    struct PoseTable(HashMap<BodyHandle, Pose>);

    impl PhysicsEngine for PoseTable {
        fn create_contact_group(&mut self) -> Result<ContactGroupId, EngineError> {
            Ok(ContactGroupId(0))
        }
        fn create_world(&mut self) -> Result<WorldId, EngineError> {
            Ok(WorldId(0))
        }
        fn integrate(&mut self, _: &ContactConstraintSet, _: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn empty_contact_group(&mut self, _: ContactGroupId) {}
        fn add_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, EngineError> {
            let handle = BodyHandle(self.0.len() as u64);
            self.0.insert(handle, Pose::new(desc.position, desc.rotation));
            Ok(handle)
        }
        fn body_state(&self, handle: BodyHandle) -> Option<BodyState> {
            self.0.get(&handle).map(|pose| BodyState {
                pose: *pose,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                body_type: BodyType::Dynamic,
                mass: 1.0,
            })
        }
        fn body_count(&self) -> usize {
            self.0.len()
        }
    }

    fn engine_with_space() -> NativeCollisionEngine {
        let mut engine = NativeCollisionEngine::new();
        engine.create_space().unwrap();
        engine
    }

    #[test]
    fn test_geometry_requires_space() {
        let mut engine = NativeCollisionEngine::new();
        let result =
            engine.add_geometry(GeometryDesc::fixed(GeometryShape::ground(), Pose::IDENTITY));
        assert_eq!(result, Err(EngineError::NoSpace));
        assert_eq!(
            engine.detect_collisions(&PoseTable::default(), ContactGroupId(0)),
            Err(EngineError::NoSpace)
        );
    }

    #[test]
    fn test_space_is_created_once() {
        let mut engine = engine_with_space();
        assert_eq!(
            engine.create_space(),
            Err(EngineError::AlreadyCreated("collision space"))
        );
    }

    #[test]
    fn test_rejects_bad_trimesh_indices() {
        let mut engine = engine_with_space();
        let desc = GeometryDesc::fixed(
            GeometryShape::TriMesh {
                vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
                indices: vec![[0, 1, 3]],
            },
            Pose::IDENTITY,
        );
        assert!(matches!(
            engine.add_geometry(desc),
            Err(EngineError::InvalidGeometry(_))
        ));
        assert_eq!(engine.geometry_count(), 0);
    }

    #[test]
    fn test_sphere_on_floor_produces_contact() {
        let mut world = PoseTable::default();
        let ball = world
            .add_body(RigidBodyDesc::dynamic(Vec3::new(0.0, 0.4, 0.0), 1.0))
            .unwrap();

        let mut engine = engine_with_space();
        engine
            .add_geometry(GeometryDesc::fixed(GeometryShape::ground(), Pose::IDENTITY))
            .unwrap();
        engine
            .add_geometry(GeometryDesc::attached(GeometryShape::Sphere(0.5), ball))
            .unwrap();

        let contacts = engine.detect_collisions(&world, ContactGroupId(9)).unwrap();
        assert_eq!(contacts.group(), ContactGroupId(9));
        assert_eq!(contacts.len(), 1);
        let contact = contacts.iter().next().unwrap();
        assert_eq!((contact.body_a, contact.body_b), (None, Some(ball)));
        // Normal points from the floor towards the ball.
        assert!(contact.normal.y > 0.99);
        assert!((contact.depth - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_static_pairs_and_distant_bodies_are_culled() {
        let mut world = PoseTable::default();
        let a = world.add_body(RigidBodyDesc::dynamic(Vec3::new(0.0, 5.0, 0.0), 1.0)).unwrap();
        let b = world.add_body(RigidBodyDesc::dynamic(Vec3::new(10.0, 5.0, 0.0), 1.0)).unwrap();

        let mut engine = engine_with_space();
        engine
            .add_geometry(GeometryDesc::fixed(GeometryShape::ground(), Pose::IDENTITY))
            .unwrap();
        engine
            .add_geometry(GeometryDesc::fixed(GeometryShape::Box(Vec3::ONE), Pose::IDENTITY))
            .unwrap();
        engine
            .add_geometry(GeometryDesc::attached(GeometryShape::Sphere(0.5), a))
            .unwrap();
        engine
            .add_geometry(GeometryDesc::attached(GeometryShape::Sphere(0.5), b))
            .unwrap();

        // The static box sits half below the static floor but the pair is ignored.
        assert!(engine.detect_collisions(&world, ContactGroupId(0)).unwrap().is_empty());
    }

    #[test]
    fn test_geometry_of_unknown_body_is_an_error() {
        let mut engine = engine_with_space();
        engine
            .add_geometry(GeometryDesc::attached(GeometryShape::Sphere(0.5), BodyHandle(4)))
            .unwrap();
        assert_eq!(
            engine.detect_collisions(&PoseTable::default(), ContactGroupId(0)),
            Err(EngineError::UnknownBody(BodyHandle(4)))
        );
    }
}
