//! Scene raycaster

use glam::Vec3;

use super::ray::{intersect_triangle, Ray};
use crate::scene::{NodeId, Scene};

/// A ray hit on a mesh node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The mesh node that was hit.
    pub node: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Index of the hit triangle within the node's mesh.
    pub face_index: usize,
}

/// Casts rays against scene nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    /// Hits closer than this are ignored.
    pub near: f32,
    /// Hits farther than this are ignored.
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Intersect `ray` with `ids`, optionally descending into their
    /// children. Hits are sorted by ascending distance; ties keep the order
    /// in which they were found.
    pub fn intersect_nodes(
        &self,
        ray: &Ray,
        scene: &Scene,
        ids: &[NodeId],
        recursive: bool,
    ) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for &id in ids {
            self.collect(ray, scene, id, recursive, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Intersect `ray` with a single node.
    pub fn intersect_node(
        &self,
        ray: &Ray,
        scene: &Scene,
        id: NodeId,
        recursive: bool,
    ) -> Vec<Intersection> {
        self.intersect_nodes(ray, scene, std::slice::from_ref(&id), recursive)
    }

    fn collect(
        &self,
        ray: &Ray,
        scene: &Scene,
        id: NodeId,
        recursive: bool,
        hits: &mut Vec<Intersection>,
    ) {
        let Some(node) = scene.node(id) else {
            return;
        };

        if let (Some(mesh), Some(world)) = (&node.mesh, scene.world_transform(id)) {
            let (origin, direction) = ray.transformed(&world.inverse());
            let side = node.side();
            if mesh.aabb().intersect_ray(origin, direction).is_some() {
                let nearest = mesh
                    .triangles()
                    .enumerate()
                    .filter_map(|(face, triangle)| {
                        intersect_triangle(origin, direction, triangle, side)
                            .map(|t| (face, origin + direction * t))
                    })
                    .map(|(face, local)| {
                        let point = world.transform_point3(local);
                        (face, point, point.distance(ray.origin))
                    })
                    .filter(|&(_, _, distance)| distance >= self.near && distance <= self.far)
                    .min_by(|a, b| a.2.total_cmp(&b.2));

                if let Some((face_index, point, distance)) = nearest {
                    hits.push(Intersection {
                        node: id,
                        distance,
                        point,
                        face_index,
                    });
                }
            }
        }

        if recursive {
            for &child in node.children() {
                self.collect(ray, scene, child, true, hits);
            }
        }
    }
}
