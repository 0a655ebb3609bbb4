//! Primitive mesh generators
//!
//! All generators produce counter-clockwise front faces with outward unit
//! normals, centered on the local origin with +Y up. Vertex layouts and
//! UV conventions follow the usual parametric primitives (planes in XY
//! facing +Z, tori around the Z axis, cylinders along Y).

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::MeshData;
use crate::core::vertex::Vertex;

#[derive(Default)]
struct Builder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Builder {
    fn vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(Vertex::new(position.to_array(), normal.to_array(), uv));
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn finish(self) -> MeshData {
        MeshData::new(self.vertices, self.indices)
    }
}

/// Single-quad plane in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> MeshData {
    let mut mesh = Builder::default();
    let (hw, hh) = (width / 2.0, height / 2.0);
    for iy in 0..2 {
        for ix in 0..2 {
            let position = Vec3::new(ix as f32 * width - hw, hh - iy as f32 * height, 0.0);
            mesh.vertex(position, Vec3::Z, [ix as f32, 1.0 - iy as f32]);
        }
    }
    // a = top-left, b = bottom-left, c = bottom-right, d = top-right
    let (a, b, c, d) = (0, 2, 3, 1);
    mesh.triangle(a, b, d);
    mesh.triangle(b, c, d);
    mesh.finish()
}

/// Axis-aligned box with four vertices per face.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) / 2.0;
    // (normal, u axis, v axis) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = Builder::default();
    for (normal, u, v) in faces {
        let center = normal * normal.abs().dot(half);
        let hu = u * u.abs().dot(half);
        let hv = v * v.abs().dot(half);
        let base = mesh.vertex(center - hu - hv, normal, [0.0, 0.0]);
        mesh.vertex(center + hu - hv, normal, [1.0, 0.0]);
        mesh.vertex(center + hu + hv, normal, [1.0, 1.0]);
        mesh.vertex(center - hu + hv, normal, [0.0, 1.0]);
        mesh.triangle(base, base + 1, base + 2);
        mesh.triangle(base, base + 2, base + 3);
    }
    mesh.finish()
}

/// UV sphere with `width_segments` around Y and `height_segments` pole to pole.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = Builder::default();
    let mut grid = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        // Pole vertices sit half a segment over so their UVs stay centered.
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            let normal = position.normalize_or_zero();
            row.push(mesh.vertex(position, normal, [u + u_offset, 1.0 - v]));
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                mesh.triangle(a, b, d);
            }
            if iy != height_segments as usize - 1 {
                mesh.triangle(b, c, d);
            }
        }
    }
    mesh.finish()
}

/// Torus around the Z axis.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(3);
    let mut mesh = Builder::default();

    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();
            mesh.vertex(
                position,
                normal,
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            );
        }
    }

    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            mesh.triangle(a, b, d);
            mesh.triangle(b, c, d);
        }
    }
    mesh.finish()
}

/// Closed cylinder along Y. A zero radius drops that cap and its
/// degenerate side triangles.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let radial_segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let mut mesh = Builder::default();

    // Side wall, one height segment.
    let mut rows = [Vec::new(), Vec::new()];
    for (y, row) in rows.iter_mut().enumerate() {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            let position = Vec3::new(radius * sin, -v * height + half_height, radius * cos);
            let normal = Vec3::new(sin, slope, cos).normalize();
            row.push(mesh.vertex(position, normal, [u, 1.0 - v]));
        }
    }
    for x in 0..radial_segments as usize {
        let a = rows[0][x];
        let b = rows[1][x];
        let c = rows[1][x + 1];
        let d = rows[0][x + 1];
        if radius_top > 0.0 {
            mesh.triangle(a, b, d);
        }
        if radius_bottom > 0.0 {
            mesh.triangle(b, c, d);
        }
    }

    if radius_top > 0.0 {
        cap(&mut mesh, radius_top, half_height, radial_segments, true);
    }
    if radius_bottom > 0.0 {
        cap(&mut mesh, radius_bottom, half_height, radial_segments, false);
    }
    mesh.finish()
}

fn cap(mesh: &mut Builder, radius: f32, half_height: f32, radial_segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);

    // One center vertex per segment keeps the fan UVs independent.
    let center_start = mesh.vertices.len() as u32;
    for _ in 0..radial_segments {
        mesh.vertex(Vec3::new(0.0, half_height * sign, 0.0), normal, [0.5, 0.5]);
    }
    let rim_start = mesh.vertices.len() as u32;
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertex(
            Vec3::new(radius * sin, half_height * sign, radius * cos),
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        );
    }

    for x in 0..radial_segments {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            mesh.triangle(i, i + 1, c);
        } else {
            mesh.triangle(i + 1, i, c);
        }
    }
}

/// Cone along Y with its apex at `+height / 2`.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    cylinder(0.0, radius, height, radial_segments)
}

/// (p, q) torus knot swept with a circular tube.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let tubular_segments = tubular_segments.max(3);
    let radial_segments = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q.max(1) as f32);
    let mut mesh = Builder::default();

    let curve = |u: f32| {
        let q_over_p = q / p * u;
        let cs = q_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * q_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frame around the curve: tangent, then binormal and normal.
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1);
        let normal = binormal.cross(tangent).normalize();
        let binormal = binormal.normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            mesh.vertex(
                position,
                (position - p1).normalize_or_zero(),
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            );
        }
    }

    let stride = radial_segments + 1;
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            mesh.triangle(a, b, d);
            mesh.triangle(b, c, d);
        }
    }
    mesh.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::geometry::Aabb;

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            let length = Vec3::from(v.normal).length();
            assert!((length - 1.0).abs() < 1e-4, "normal length {length}");
        }
    }

    /// Every non-degenerate triangle winds counter-clockwise when seen from
    /// the side its vertex normals point to.
    fn assert_outward_winding(mesh: &MeshData) {
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            let face = (b - a).cross(c - a);
            if face.length() < 1e-6 {
                continue;
            }
            let base = t * 3;
            let normal: Vec3 = (0..3)
                .map(|k| Vec3::from(mesh.vertices[mesh.indices[base + k] as usize].normal))
                .sum();
            assert!(face.dot(normal) > 0.0, "triangle {t} winds inward");
        }
    }

    fn assert_bounds(aabb: Aabb, min: Vec3, max: Vec3) {
        assert!((aabb.min - min).abs().max_element() < 1e-3, "{aabb:?}");
        assert!((aabb.max - max).abs().max_element() < 1e-3, "{aabb:?}");
    }

    #[test]
    fn test_plane() {
        let mesh = plane(60.0, 60.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::new(-30.0, -30.0, 0.0), Vec3::new(30.0, 30.0, 0.0));
    }

    #[test]
    fn test_cuboid() {
        let mesh = cuboid(10.0, 10.0, 10.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::splat(-5.0), Vec3::splat(5.0));
    }

    #[test]
    fn test_cuboid_uneven_extents() {
        let mesh = cuboid(2.0, 4.0, 6.0);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_sphere() {
        let mesh = sphere(8.0, 32, 16);
        assert_eq!(mesh.vertices.len(), 33 * 17);
        // Pole rows contribute one triangle per segment.
        assert_eq!(mesh.triangle_count(), 2 * 32 * 15);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::splat(-8.0), Vec3::splat(8.0));
    }

    #[test]
    fn test_torus() {
        let mesh = torus(6.0, 1.0, 16, 100);
        assert_eq!(mesh.vertices.len(), 17 * 101);
        assert_eq!(mesh.triangle_count(), 2 * 16 * 100);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::new(-7.0, -7.0, -1.0), Vec3::new(7.0, 7.0, 1.0));
    }

    #[test]
    fn test_cylinder() {
        let mesh = cylinder(3.0, 3.0, 10.0, 32);
        assert_eq!(mesh.vertices.len(), 66 + 2 * (32 + 33));
        assert_eq!(mesh.triangle_count(), 64 + 2 * 32);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::new(-3.0, -5.0, -3.0), Vec3::new(3.0, 5.0, 3.0));
    }

    #[test]
    fn test_cone() {
        let mesh = cone(6.0, 8.0, 32);
        assert_eq!(mesh.vertices.len(), 66 + 32 + 33);
        assert_eq!(mesh.triangle_count(), 32 + 32);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        assert_bounds(mesh.aabb(), Vec3::new(-6.0, -4.0, -6.0), Vec3::new(6.0, 4.0, 6.0));
    }

    #[test]
    fn test_torus_knot() {
        let mesh = torus_knot(4.0, 1.2, 100, 16, 2, 3);
        assert_eq!(mesh.vertices.len(), 101 * 17);
        assert_eq!(mesh.triangle_count(), 2 * 100 * 16);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
        let aabb = mesh.aabb();
        // Curve radius peaks at 1.5 * radius, plus the tube.
        assert!(aabb.max.x <= 4.0 * 1.5 + 1.2 + 1e-3);
        assert!(aabb.min.x >= -(4.0 * 1.5 + 1.2) - 1e-3);
    }

    #[test]
    fn test_indices_in_range() {
        for mesh in [
            plane(1.0, 1.0),
            cuboid(1.0, 1.0, 1.0),
            sphere(1.0, 8, 4),
            torus(1.0, 0.2, 4, 8),
            cone(1.0, 1.0, 8),
            torus_knot(1.0, 0.2, 16, 4, 2, 3),
        ] {
            assert_eq!(mesh.indices.len() % 3, 0);
            assert!(mesh
                .indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }
}
