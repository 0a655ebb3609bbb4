//! Rays and ray/triangle intersection

use glam::{Mat4, Vec2, Vec3};

use crate::renderer::material::Side;
use crate::renderer::viewer::{Camera, Projection};

const EPSILON: f32 = 1e-7;

/// Slack on the barycentric bounds, so a ray through an edge shared by two
/// triangles hits at least one of them.
const EDGE_EPSILON: f32 = 1e-6;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera through a point given in normalized device
    /// coordinates.
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Self {
        match camera.projection {
            Projection::Perspective { .. } => {
                let through = camera.unproject(ndc.extend(0.5));
                Self::new(camera.position, through - camera.position)
            }
            Projection::Orthographic { .. } => {
                let origin = camera.unproject(ndc.extend(0.0));
                Self::new(origin, camera.forward())
            }
        }
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// This ray expressed through `matrix`, typically an inverse world
    /// transform. The direction is left unnormalized so ray parameters stay
    /// comparable with the original ray.
    pub(crate) fn transformed(&self, matrix: &Mat4) -> (Vec3, Vec3) {
        (
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}

/// Moller-Trumbore ray/triangle test.
///
/// Returns the ray parameter of the hit. With [`Side::Front`] only
/// triangles wound counter-clockwise as seen from the ray origin are hit.
pub fn intersect_triangle(origin: Vec3, direction: Vec3, triangle: [Vec3; 3], side: Side) -> Option<f32> {
    let [a, b, c] = triangle;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = direction.cross(edge2);
    let det = edge1.dot(pvec);

    match side {
        Side::Front if det <= EPSILON => return None,
        Side::Double if det.abs() <= EPSILON => return None,
        _ => {}
    }

    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = direction.dot(qvec) * inv_det;
    if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::viewer::Viewer;

    // Counter-clockwise when seen from +Z.
    const TRIANGLE: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn test_front_face_hit_distance() {
        let t = intersect_triangle(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, TRIANGLE, Side::Front);
        assert!((t.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_back_face_needs_double_side() {
        let origin = Vec3::new(0.0, 0.0, -5.0);
        assert!(intersect_triangle(origin, Vec3::Z, TRIANGLE, Side::Front).is_none());
        let t = intersect_triangle(origin, Vec3::Z, TRIANGLE, Side::Double).unwrap();
        assert!((t - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_miss_outside_and_behind() {
        let outside = intersect_triangle(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z, TRIANGLE, Side::Double);
        assert!(outside.is_none());
        let behind = intersect_triangle(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, TRIANGLE, Side::Double);
        assert!(behind.is_none());
        let parallel = intersect_triangle(Vec3::new(0.0, 0.0, 5.0), Vec3::X, TRIANGLE, Side::Double);
        assert!(parallel.is_none());
    }

    #[test]
    fn test_shared_edge_is_watertight() {
        // Two triangles of a quad split along its diagonal.
        let quad = [
            [Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
            [Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)],
        ];
        for k in [-0.7_f32, -0.3, 0.1, 0.45, 0.9] {
            let origin = Vec3::new(k, k, 5.0);
            let hits = quad
                .iter()
                .filter_map(|tri| intersect_triangle(origin, Vec3::NEG_Z, *tri, Side::Front))
                .count();
            assert!(hits >= 1, "ray through diagonal at {k} fell through");
        }
    }

    #[test]
    fn test_ray_through_sphere_equator_hits() {
        use crate::renderer::geometry::primitives;

        // Sphere at the origin seen from the side; the ray lies in the
        // equator plane, right on a ring of shared edges.
        let sphere = primitives::sphere(2.0, 16, 8);
        let origin = Vec3::new(-8.0, 0.0, 30.0);
        let direction = (Vec3::ZERO - origin).normalize();
        let nearest = sphere
            .triangles()
            .filter_map(|tri| intersect_triangle(origin, direction, tri, Side::Front))
            .fold(f32::INFINITY, f32::min);
        let expected = origin.length() - 2.0;
        assert!((nearest - expected).abs() < 0.1, "nearest hit {nearest}");
    }

    #[test]
    fn test_perspective_ray_starts_at_eye() {
        let mut camera = Camera::new_perspective(
            Vec3::new(0.0, 40.0, 60.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::Y,
            75.0,
            1.0,
            0.1,
            200.0,
        );
        camera.set_viewport(crate::renderer::viewer::Viewport::new(800, 800));
        let ray = Ray::from_camera(&camera, Vec2::ZERO);
        assert_eq!(ray.origin, camera.position());
        assert!(ray.direction.dot(camera.forward()) > 0.9999);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = Camera::new_orthographic(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Vec3::Y,
            20.0,
            20.0,
            0.1,
            100.0,
        );
        let ray = Ray::from_camera(&camera, Vec2::new(0.5, -0.5));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
        assert!((ray.origin - Vec3::new(5.0, -5.0, 9.9)).length() < 1e-3);
    }
}
