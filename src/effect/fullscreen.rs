//! Fullscreen triangle and bind group helpers for screen-space passes

use crate::context::WgpuContext;
use crate::core::buffer::VertexBuffer;
use crate::core::render_states::ClearState;
use crate::core::render_target::RenderTarget;
use crate::core::vertex::VertexPC;

/// A fullscreen triangle for post-processing passes.
pub struct FullscreenQuad {
    vertex_buffer: VertexBuffer,
}

impl FullscreenQuad {
    /// Create a new fullscreen quad.
    pub fn new(ctx: &WgpuContext) -> Self {
        // One oversized triangle covering clip space; UV lives in color.xy
        let vertices = vec![
            VertexPC::new([-1.0, -1.0, 0.0], [0.0, 1.0, 0.0, 0.0]),
            VertexPC::new([3.0, -1.0, 0.0], [2.0, 1.0, 0.0, 0.0]),
            VertexPC::new([-1.0, 3.0, 0.0], [0.0, -1.0, 0.0, 0.0]),
        ];

        let vertex_buffer = VertexBuffer::new(ctx, &vertices, Some("fullscreen quad"));

        Self { vertex_buffer }
    }

    /// Run `pipeline` over every pixel of `output`.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        output: &wgpu::TextureView,
    ) {
        let target = RenderTarget::new(output, None);
        let mut pass = target.begin_render_pass(encoder, label, ClearState::color([0.0, 0.0, 0.0, 1.0]));
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        pass.draw(0..3, 0..1);
    }
}

/// Filterable 2D float texture visible to the fragment stage.
pub(crate) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(crate) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(crate) fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Clamped bilinear sampler for reading the previous pass.
pub(crate) fn linear_sampler(ctx: &WgpuContext, label: &str) -> wgpu::Sampler {
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
