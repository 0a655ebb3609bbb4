//! Material trait and common types

use crate::context::WgpuContext;
use crate::renderer::light::Light;
use crate::renderer::viewer::Viewer;
use glam::Mat4;

/// Trait for materials that control surface appearance.
pub trait Material {
    /// Get the render pipeline.
    fn pipeline(&self) -> &wgpu::RenderPipeline;

    /// Get the camera bind group (group 0).
    fn camera_bind_group(&self) -> &wgpu::BindGroup;

    /// Get the model bind group (group 1).
    fn model_bind_group(&self) -> &wgpu::BindGroup;

    /// Surface parameters and maps (group 2), if the material has any.
    fn surface_bind_group(&self) -> Option<&wgpu::BindGroup> {
        None
    }

    /// Update uniforms before rendering.
    fn update_uniforms(
        &self,
        ctx: &WgpuContext,
        viewer: &dyn Viewer,
        model_matrix: Mat4,
        lights: &[&dyn Light],
    );
}

/// Model uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_matrix(model: Mat4) -> Self {
        let normal_matrix = model.inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = ModelUniform::from_matrix(model);
        let normal = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        let n = normal.transform_vector3(Vec3::X);
        assert!((n.x - 0.5).abs() < 1e-6);
    }
}
