//! Mesh geometry
//!
//! [`MeshData`] keeps vertices and indices on the CPU for picking and
//! tests; [`Mesh`] is its uploaded GPU counterpart.

use super::{Aabb, Geometry};
use crate::context::WgpuContext;
use crate::core::buffer::{IndexBuffer, VertexBuffer};
use crate::core::vertex::Vertex;
use glam::Vec3;

/// Indexed triangle list kept in system memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            self.position(self.indices[base]),
            self.position(self.indices[base + 1]),
            self.position(self.indices[base + 2]),
        ]
    }

    /// Iterate over all triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }

    fn position(&self, index: u32) -> Vec3 {
        Vec3::from(self.vertices[index as usize].position)
    }

    /// Bounds of all vertex positions.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }
}

/// A mesh with vertex and index data.
pub struct Mesh {
    vertex_buffer: VertexBuffer,
    index_buffer: Option<IndexBuffer>,
    draw_count: u32,
}

impl Mesh {
    /// Create a new mesh from vertices and indices.
    pub fn new(
        ctx: &WgpuContext,
        vertices: &[Vertex],
        indices: Option<&[u32]>,
        label: Option<&str>,
    ) -> Self {
        let vertex_buffer = VertexBuffer::new(ctx, vertices, label);

        let (index_buffer, draw_count) = if let Some(indices) = indices {
            let ib = IndexBuffer::new_u32(ctx, indices, label);
            let count = indices.len() as u32;
            (Some(ib), count)
        } else {
            (None, vertices.len() as u32)
        };

        Self {
            vertex_buffer,
            index_buffer,
            draw_count,
        }
    }

    /// Upload CPU mesh data.
    pub fn from_data(ctx: &WgpuContext, data: &MeshData, label: Option<&str>) -> Self {
        Self::new(ctx, &data.vertices, Some(&data.indices), label)
    }
}

impl Geometry for Mesh {
    fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    fn index_buffer(&self) -> Option<&IndexBuffer> {
        self.index_buffer.as_ref()
    }

    fn draw_count(&self) -> u32 {
        self.draw_count
    }
}
