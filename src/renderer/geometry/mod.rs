//! Geometry abstractions
//!
//! CPU mesh data with its primitive generators, and the GPU mesh uploaded
//! from it.

mod mesh;
pub mod primitives;

pub use mesh::{Mesh, MeshData};

use crate::core::buffer::{IndexBuffer, VertexBuffer};
use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a set of points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for p in points {
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Get the center of the AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get all 8 corners of the AABB.
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Bounds of this box after `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self::from_points(self.corners().map(|c| transform.transform_point3(c)))
    }

    /// Check if a point is inside the AABB.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Returns the ray parameter of the entry point, or of the
    /// exit point when the origin is inside the box.
    ///
    /// `direction` need not be normalized; the result is in units of it.
    pub fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d == 0.0 {
                // Parallel to this slab: inside it or never.
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (t1, t2) = ((lo - o) / d, (hi - o) / d);
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

/// Trait for geometry that can be rendered.
pub trait Geometry {
    /// Get the vertex buffer.
    fn vertex_buffer(&self) -> &VertexBuffer;

    /// Get the index buffer if available.
    fn index_buffer(&self) -> Option<&IndexBuffer>;

    /// Get the number of primitives to draw.
    fn draw_count(&self) -> u32;

    /// Draw the geometry using the given render pass.
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer().slice());
        if let Some(index_buffer) = self.index_buffer() {
            render_pass.set_index_buffer(index_buffer.slice(), index_buffer.format());
            render_pass.draw_indexed(0..self.draw_count(), 0, 0..1);
        } else {
            render_pass.draw(0..self.draw_count(), 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_box_in_front() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = aabb
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert!((t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_from_inside_reports_exit() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = aabb.intersect_ray(Vec3::ZERO, Vec3::X).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_box_behind_or_beside() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(aabb
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0))
            .is_none());
        assert!(aabb
            .intersect_ray(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_axis_parallel_ray_inside_slab() {
        // Zero direction components produce infinite reciprocals.
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb
            .intersect_ray(Vec3::new(0.5, 0.5, 10.0), Vec3::new(0.0, 0.0, -2.0))
            .is_some());
    }

    #[test]
    fn test_parallel_ray_on_slab_boundary() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        // Grazes the x = 1 face while travelling along -Z.
        let t = aabb
            .intersect_ray(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert!((t - 4.0).abs() < 1e-6);
        assert!(aabb
            .intersect_ray(Vec3::new(1.0 + 1e-3, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_transformed_bounds() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.center(), Vec3::new(10.0, 0.0, 0.0));
        assert!(moved.contains(Vec3::new(10.5, 0.5, -0.5)));
        assert!(!moved.contains(Vec3::ZERO));
    }
}
