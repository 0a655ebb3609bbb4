//! Tone mapping and colour space output

use super::fullscreen::{linear_sampler, sampler_entry, texture_entry, uniform_entry};
use super::{Effect, EffectContext, FullscreenQuad};
use crate::context::WgpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{BlendState, CullState};
use crate::core::vertex::VertexPC;

/// HDR to display mapping curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    /// Pass colours through; the target clamps them.
    None,
    /// Scale by exposure and clamp.
    Linear,
    /// ACES filmic fit.
    #[default]
    AcesFilmic,
}

impl ToneMapping {
    fn shader_mode(self) -> f32 {
        match self {
            ToneMapping::None => 0.0,
            ToneMapping::Linear => 1.0,
            ToneMapping::AcesFilmic => 2.0,
        }
    }
}

/// Output pass uniform data.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutputUniform {
    /// Exposure, tone mapping mode, encode sRGB, unused.
    pub params: [f32; 4],
}

impl OutputUniform {
    /// sRGB encoding happens in the shader only when `target` does not
    /// encode on store.
    pub fn new(tone_mapping: ToneMapping, exposure: f32, target: wgpu::TextureFormat) -> Self {
        let encode = if target.is_srgb() { 0.0 } else { 1.0 };
        Self {
            params: [exposure, tone_mapping.shader_mode(), encode, 0.0],
        }
    }
}

/// Maps the HDR chain result to display colours.
pub struct OutputPass {
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: RawUniformBuffer,
    sampler: wgpu::Sampler,
    quad: FullscreenQuad,
}

impl OutputPass {
    pub fn new(
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        tone_mapping: ToneMapping,
        exposure: f32,
    ) -> anyhow::Result<Self> {
        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("output pass layout"),
                entries: &[
                    texture_entry(0),
                    sampler_entry(1),
                    uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let pipeline = PipelineBuilder::new(ctx)
            .label("output pass pipeline")
            .shader(include_str!("../shaders/effects/output.wgsl"))
            .vertex_layout(VertexPC::layout())
            .bind_group_layout(&layout)
            .color_format(format)
            .blend(BlendState::Opaque)
            .cull(CullState::None)
            .build()?;

        Ok(Self {
            tone_mapping,
            exposure,
            format,
            pipeline,
            layout,
            uniform_buffer: RawUniformBuffer::for_type::<OutputUniform>(ctx, Some("output uniform")),
            sampler: linear_sampler(ctx, "output sampler"),
            quad: FullscreenQuad::new(ctx),
        })
    }
}

impl Effect for OutputPass {
    fn label(&self) -> &str {
        "output pass"
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
            tracing::warn!("output pass has no input, skipping");
            return;
        };

        self.uniform_buffer.write(
            frame.ctx,
            &OutputUniform::new(self.tone_mapping, self.exposure, self.format),
        );

        let bind_group = frame.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("output pass bind group"),
            layout: &self.layout,
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
            .draw(encoder, "output pass", &self.pipeline, &bind_group, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_target_skips_manual_encoding() {
        let srgb = OutputUniform::new(ToneMapping::AcesFilmic, 2.0, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(srgb.params, [2.0, 2.0, 0.0, 0.0]);
        let unorm = OutputUniform::new(ToneMapping::Linear, 1.0, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(unorm.params, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_default_tone_mapping_is_aces() {
        assert_eq!(ToneMapping::default(), ToneMapping::AcesFilmic);
        assert_eq!(ToneMapping::None.shader_mode(), 0.0);
    }
}
