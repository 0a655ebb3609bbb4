//! FXAA (Fast Approximate Anti-Aliasing) effect

use super::fullscreen::{linear_sampler, sampler_entry, texture_entry, uniform_entry};
use super::{Effect, EffectContext, FullscreenQuad};
use crate::context::WgpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{BlendState, CullState};
use crate::core::vertex::VertexPC;

/// FXAA uniform parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FxaaUniform {
    /// Texture size (width, height, 1/width, 1/height).
    pub texture_size: [f32; 4],
    /// Decode to linear before storing, unused x3.
    pub flags: [f32; 4],
}

impl FxaaUniform {
    /// Input is display-encoded; an sRGB `target` re-encodes on store, so
    /// the shader decodes first.
    pub fn new(width: u32, height: u32, target: wgpu::TextureFormat) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        Self {
            texture_size: [w, h, 1.0 / w, 1.0 / h],
            flags: [if target.is_srgb() { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// FXAA post-processing effect for anti-aliasing.
pub struct FxaaEffect {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: RawUniformBuffer,
    sampler: wgpu::Sampler,
    quad: FullscreenQuad,
}

impl FxaaEffect {
    /// Create a new FXAA effect.
    pub fn new(
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let shader = include_str!("../shaders/effects/fxaa.wgsl");

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("fxaa bind group layout"),
                    entries: &[
                        texture_entry(0),
                        sampler_entry(1),
                        uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
                    ],
                });

        let pipeline = PipelineBuilder::new(ctx)
            .label("fxaa pipeline")
            .shader(shader)
            .vertex_layout(VertexPC::layout())
            .bind_group_layout(&bind_group_layout)
            .color_format(format)
            .blend(BlendState::Opaque)
            .cull(CullState::None)
            .build()?;

        let uniform_buffer = RawUniformBuffer::for_type::<FxaaUniform>(ctx, Some("fxaa uniform"));

        let effect = Self {
            format,
            pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler: linear_sampler(ctx, "fxaa sampler"),
            quad: FullscreenQuad::new(ctx),
        };
        effect.update_size(ctx, width, height);
        Ok(effect)
    }

    /// Update the texture size uniform.
    pub fn update_size(&self, ctx: &WgpuContext, width: u32, height: u32) {
        self.uniform_buffer
            .write(ctx, &FxaaUniform::new(width, height, self.format));
    }
}

impl Effect for FxaaEffect {
    fn label(&self) -> &str {
        "fxaa pass"
    }

    fn output_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn render(
        &mut self,
        frame: &EffectContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
        input: Option<&wgpu::TextureView>,
        output: &wgpu::TextureView,
    ) {
        let Some(input) = input else {
            tracing::warn!("fxaa pass has no input, skipping");
            return;
        };

        let bind_group = frame.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fxaa bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.binding(),
                },
            ],
        });

        self.quad
            .draw(encoder, "fxaa pass", &self.pipeline, &bind_group, output);
    }

    fn resize(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        self.update_size(ctx, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_texel_size() {
        let uniform = FxaaUniform::new(800, 400, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(uniform.texture_size, [800.0, 400.0, 1.0 / 800.0, 1.0 / 400.0]);
        assert_eq!(uniform.flags[0], 0.0);
        assert_eq!(std::mem::size_of::<FxaaUniform>(), 32);
    }

    #[test]
    fn test_srgb_surface_decodes_before_store() {
        let uniform = FxaaUniform::new(0, 0, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(uniform.flags[0], 1.0);
        assert_eq!(uniform.texture_size[..2], [1.0, 1.0]);
    }
}
