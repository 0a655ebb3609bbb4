//! Selection outline
//!
//! Two passes: the selected meshes are rasterized into a mask that records
//! coverage and visibility against the scene depth, then a fullscreen pass
//! dilates the mask and adds edge colour on top of the input.

use std::collections::HashMap;

use super::fullscreen::{linear_sampler, sampler_entry, texture_entry, uniform_entry};
use super::{Effect, EffectContext, FullscreenQuad, HDR_FORMAT};
use crate::context::WgpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{BlendState, ClearState, CullState};
use crate::core::render_target::RenderTarget;
use crate::core::texture::Texture2D;
use crate::core::vertex::{Vertex, VertexPC};
use crate::renderer::color::srgb_hex_to_linear;
use crate::renderer::geometry::Geometry;
use crate::renderer::material::ModelUniform;
use crate::renderer::viewer::CameraUniform;
use crate::scene::NodeId;

const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg8Unorm;

/// Outline appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSettings {
    pub edge_strength: f32,
    /// Weight of the soft halo around the edge.
    pub edge_glow: f32,
    /// Edge width in pixels.
    pub edge_thickness: f32,
    /// Edge colour where the selection is unoccluded (linear RGB).
    pub visible_edge_color: [f32; 3],
    /// Edge colour where scene geometry hides the selection (linear RGB).
    pub hidden_edge_color: [f32; 3],
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            edge_strength: 6.0,
            edge_glow: 0.5,
            edge_thickness: 2.0,
            visible_edge_color: srgb_hex_to_linear(0xFFFFFF),
            hidden_edge_color: srgb_hex_to_linear(0x000000),
        }
    }
}

/// Edge pass uniform data.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutlineUniform {
    /// Visible edge colour, w = edge strength.
    pub visible_color: [f32; 4],
    /// Hidden edge colour, w = edge glow.
    pub hidden_color: [f32; 4],
    /// Thickness, has selection, unused, unused.
    pub params: [f32; 4],
}

impl OutlineUniform {
    pub fn new(settings: &OutlineSettings, has_selection: bool) -> Self {
        let [vr, vg, vb] = settings.visible_edge_color;
        let [hr, hg, hb] = settings.hidden_edge_color;
        Self {
            visible_color: [vr, vg, vb, settings.edge_strength],
            hidden_color: [hr, hg, hb, settings.edge_glow],
            params: [
                settings.edge_thickness,
                if has_selection { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

/// Model uniform and bind group of one selected mesh in the mask pass.
struct MaskInstance {
    model_buffer: RawUniformBuffer,
    bind_group: wgpu::BindGroup,
}

impl MaskInstance {
    fn new(ctx: &WgpuContext, layout: &wgpu::BindGroupLayout) -> Self {
        let model_buffer = RawUniformBuffer::for_type::<ModelUniform>(ctx, Some("outline mask model"));
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("outline mask model bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.binding(),
            }],
        });
        Self {
            model_buffer,
            bind_group,
        }
    }
}

/// Outline around the selected nodes.
pub struct OutlinePass {
    pub settings: OutlineSettings,

    mask_pipeline: wgpu::RenderPipeline,
    camera_buffer: RawUniformBuffer,
    camera_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    depth_layout: wgpu::BindGroupLayout,
    instances: HashMap<NodeId, MaskInstance>,
    mask: Texture2D,

    edge_pipeline: wgpu::RenderPipeline,
    edge_layout: wgpu::BindGroupLayout,
    uniform_buffer: RawUniformBuffer,
    sampler: wgpu::Sampler,
    quad: FullscreenQuad,
}

impl OutlinePass {
    pub fn new(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        settings: OutlineSettings,
    ) -> anyhow::Result<Self> {
        let camera_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("outline mask camera layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let model_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("outline mask model layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let depth_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("outline mask depth layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                }],
            });

        let mask_pipeline = PipelineBuilder::new(ctx)
            .label("outline mask pipeline")
            .shader(include_str!("../shaders/mask.wgsl"))
            .vertex_layout(Vertex::layout())
            .bind_group_layout(&camera_layout)
            .bind_group_layout(&model_layout)
            .bind_group_layout(&depth_layout)
            .color_format(MASK_FORMAT)
            .blend(BlendState::Max)
            .cull(CullState::None)
            .build()?;

        let camera_buffer = RawUniformBuffer::for_type::<CameraUniform>(ctx, Some("outline mask camera"));
        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("outline mask camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.binding(),
            }],
        });

        let edge_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("outline edge layout"),
                entries: &[
                    texture_entry(0),
                    texture_entry(1),
                    sampler_entry(2),
                    uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let edge_pipeline = PipelineBuilder::new(ctx)
            .label("outline edge pipeline")
            .shader(include_str!("../shaders/effects/outline.wgsl"))
            .vertex_layout(VertexPC::layout())
            .bind_group_layout(&edge_layout)
            .color_format(HDR_FORMAT)
            .blend(BlendState::Opaque)
            .cull(CullState::None)
            .build()?;

        let uniform_buffer = RawUniformBuffer::for_type::<OutlineUniform>(ctx, Some("outline uniform"));

        Ok(Self {
            settings,
            mask_pipeline,
            camera_buffer,
            camera_bind_group,
            model_layout,
            depth_layout,
            instances: HashMap::new(),
            mask: Self::mask_texture(ctx, width, height),
            edge_pipeline,
            edge_layout,
            uniform_buffer,
            sampler: linear_sampler(ctx, "outline sampler"),
            quad: FullscreenQuad::new(ctx),
        })
    }

    fn mask_texture(ctx: &WgpuContext, width: u32, height: u32) -> Texture2D {
        Texture2D::render_target(ctx, width, height, MASK_FORMAT, Some("outline mask"))
    }

    fn render_mask(&mut self, frame: &EffectContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let ctx = frame.ctx;
        self.camera_buffer
            .write(ctx, &CameraUniform::from_viewer(frame.camera));

        for &id in frame.selection {
            if let Some(object) = frame.scene.object(id) {
                let instance = self
                    .instances
                    .entry(id)
                    .or_insert_with(|| MaskInstance::new(ctx, &self.model_layout));
                instance
                    .model_buffer
                    .write(ctx, &ModelUniform::from_matrix(object.transform));
            }
        }

        let depth_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("outline mask depth bind group"),
            layout: &self.depth_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(frame.depth.view()),
            }],
        });

        let target = RenderTarget::new(self.mask.view(), None);
        let mut pass = target.begin_render_pass(
            encoder,
            "outline mask pass",
            ClearState::color([0.0, 0.0, 0.0, 0.0]),
        );
        pass.set_pipeline(&self.mask_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(2, &depth_bind_group, &[]);
        for id in frame.selection {
            if let (Some(object), Some(instance)) = (frame.scene.object(*id), self.instances.get(id)) {
                pass.set_bind_group(1, &instance.bind_group, &[]);
                object.geometry.draw(&mut pass);
            }
        }
    }
}

impl Effect for OutlinePass {
    fn label(&self) -> &str {
        "outline pass"
    }

    fn output_format(&self) -> wgpu::TextureFormat {
        HDR_FORMAT
    }

    fn render(
        &mut self,
        frame: &EffectContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
        input: Option<&wgpu::TextureView>,
        output: &wgpu::TextureView,
    ) {
        let Some(input) = input else {
            tracing::warn!("outline pass has no input, skipping");
            return;
        };

        let has_selection = frame
            .selection
            .iter()
            .any(|id| frame.scene.object(*id).is_some());
        self.uniform_buffer
            .write(frame.ctx, &OutlineUniform::new(&self.settings, has_selection));
        if has_selection {
            self.render_mask(frame, encoder);
        }

        let bind_group = frame.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("outline edge bind group"),
            layout: &self.edge_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(self.mask.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.uniform_buffer.binding(),
                },
            ],
        });
        self.quad
            .draw(encoder, "outline edge pass", &self.edge_pipeline, &bind_group, output);
    }

    fn resize(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        if self.mask.size() != (width, height) {
            self.mask = Self::mask_texture(ctx, width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = OutlineSettings::default();
        assert_eq!(settings.edge_strength, 6.0);
        assert_eq!(settings.edge_glow, 0.5);
        assert_eq!(settings.edge_thickness, 2.0);
        assert!(settings.visible_edge_color.iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(settings.hidden_edge_color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_uniform_flags_empty_selection() {
        let settings = OutlineSettings::default();
        let empty = OutlineUniform::new(&settings, false);
        assert_eq!(empty.params[1], 0.0);
        let selected = OutlineUniform::new(&settings, true);
        assert_eq!(selected.params, [2.0, 1.0, 0.0, 0.0]);
        assert_eq!(selected.visible_color[3], 6.0);
        assert_eq!(selected.hidden_color[3], 0.5);
        assert_eq!(std::mem::size_of::<OutlineUniform>(), 48);
    }
}
