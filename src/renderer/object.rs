//! Object abstractions
//!
//! Provides the Object trait and Gm struct for combining geometry and materials.

use crate::context::WgpuContext;
use crate::renderer::geometry::Geometry;
use crate::renderer::light::Light;
use crate::renderer::material::Material;
use crate::renderer::viewer::Viewer;
use glam::Mat4;

/// Trait for renderable objects.
pub trait Object {
    /// Render the object.
    fn render(
        &self,
        ctx: &WgpuContext,
        viewer: &dyn Viewer,
        lights: &[&dyn Light],
        render_pass: &mut wgpu::RenderPass<'_>,
    );
}

/// A renderable object combining geometry and material.
pub struct Gm<G: Geometry, M: Material> {
    /// The geometry.
    pub geometry: G,
    /// The material.
    pub material: M,
    /// The world transform matrix.
    pub transform: Mat4,
}

impl<G: Geometry, M: Material> Gm<G, M> {
    /// Create a new Gm.
    pub fn new(geometry: G, material: M) -> Self {
        Self {
            geometry,
            material,
            transform: Mat4::IDENTITY,
        }
    }

    /// Set the transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

impl<G: Geometry, M: Material> Object for Gm<G, M> {
    fn render(
        &self,
        ctx: &WgpuContext,
        viewer: &dyn Viewer,
        lights: &[&dyn Light],
        render_pass: &mut wgpu::RenderPass<'_>,
    ) {
        // Uniform buffers are per object; queue writes land before submit.
        self.material
            .update_uniforms(ctx, viewer, self.transform, lights);

        render_pass.set_pipeline(self.material.pipeline());
        render_pass.set_bind_group(0, self.material.camera_bind_group(), &[]);
        render_pass.set_bind_group(1, self.material.model_bind_group(), &[]);
        if let Some(surface) = self.material.surface_bind_group() {
            render_pass.set_bind_group(2, surface, &[]);
        }

        self.geometry.draw(render_pass);
    }
}
