/// Collision queries over static world geometry
///
/// Meshes stream in from the loader while flight is already running; a mesh,
/// once registered, is immutable, and only the set of meshes grows. The
/// query acceleration structure is refreshed lazily on the first raycast
/// after a registration.
use std::collections::HashMap;

use glam::Vec3;
use log::{debug, warn};
use nalgebra as na;
use rapier3d::prelude::*;

use crate::mesh::Mesh;

/// Nearest intersection along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
}

pub struct CollisionIndex {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    query_pipeline: QueryPipeline,
    /// Mesh name -> collidable tag; guards idempotent registration
    registered: HashMap<String, bool>,
    dirty: bool,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            registered: HashMap::new(),
            dirty: false,
        }
    }

    /// Register a mesh. Re-registering a name is a no-op; a mesh tagged
    /// non-collidable is tracked but never participates in raycasts.
    pub fn register_mesh(&mut self, mesh: &Mesh, collidable: bool) {
        if self.registered.contains_key(&mesh.name) {
            return;
        }
        self.registered.insert(mesh.name.clone(), collidable);

        if !collidable {
            return;
        }
        if mesh.vertices.is_empty() || mesh.indices.len() < 3 {
            warn!("mesh '{}' has no triangles, skipping collider", mesh.name);
            return;
        }

        let vertices: Vec<Point<Real>> = mesh
            .vertices
            .iter()
            .map(|vertex| vec3_to_point(vertex.position))
            .collect();
        let indices: Vec<[u32; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();

        let rigid_body = RigidBodyBuilder::fixed().build();
        let rb_handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::trimesh(vertices, indices).build();
        self.collider_set
            .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);

        self.dirty = true;
        debug!(
            "registered collidable mesh '{}' ({} triangles)",
            mesh.name,
            mesh.triangle_count()
        );
    }

    /// Closest intersection among all collidable meshes within
    /// `max_distance`, or `None`. An index with no collidable geometry
    /// reports no hit.
    pub fn raycast(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        if self.collider_set.is_empty() || direction.length_squared() == 0.0 {
            return None;
        }

        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }

        let ray = Ray::new(
            vec3_to_point(origin),
            vec3_to_vector(direction.normalize()),
        );

        let (_collider, distance) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
        )?;

        Some(RayHit { distance })
    }

    /// Number of registered meshes, collidable or not
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl Default for CollisionIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert Vec3 to Rapier Point
fn vec3_to_point(v: Vec3) -> Point<Real> {
    na::Point3::new(v.x, v.y, v.z)
}

/// Convert Vec3 to Rapier Vector
fn vec3_to_vector(v: Vec3) -> Vector<Real> {
    na::Vector3::new(v.x, v.y, v.z)
}
