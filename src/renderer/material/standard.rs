//! Standard lit material
//!
//! Metallic-roughness shading under a single directional light, with an
//! optional repeating colour map and linear fog.

use super::traits::{Material, ModelUniform};
use super::MaterialDesc;
use crate::context::WgpuContext;
use crate::core::buffer::RawUniformBuffer;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{BlendState, DepthState};
use crate::core::texture::Texture2D;
use crate::core::vertex::Vertex;
use crate::renderer::fog::Fog;
use crate::renderer::light::{Light, LightUniforms};
use crate::renderer::viewer::{CameraUniform, Viewer};
use glam::Mat4;

/// Standard material uniform data (group 2, binding 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StandardUniform {
    /// Base color (linear RGB, a = 1).
    pub base_color: [f32; 4],
    pub light: LightUniforms,
    /// Fog color (rgb), w = 1 when fog is enabled.
    pub fog_color: [f32; 4],
    /// Fog near, fog far, uv repeat u, uv repeat v.
    pub fog_range_uv_repeat: [f32; 4],
    /// Roughness, metalness, has map, unused.
    pub surface: [f32; 4],
}

impl StandardUniform {
    /// Pack a surface description for the shader.
    pub fn new(desc: &MaterialDesc, light: LightUniforms, fog: Option<Fog>) -> Self {
        let (fog_color, fog_near, fog_far) = match fog {
            Some(fog) => (
                [fog.color[0], fog.color[1], fog.color[2], 1.0],
                fog.near,
                fog.far,
            ),
            None => ([0.0; 4], 0.0, 1.0),
        };
        let (repeat, has_map) = match &desc.map {
            Some(map) => (map.repeat, 1.0),
            None => ([1.0, 1.0], 0.0),
        };
        Self {
            base_color: [desc.color[0], desc.color[1], desc.color[2], 1.0],
            light,
            fog_color,
            fog_range_uv_repeat: [fog_near, fog_far, repeat[0], repeat[1]],
            surface: [desc.roughness, desc.metalness, has_map, 0.0],
        }
    }
}

/// Standard lit material.
pub struct StandardMaterial {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: RawUniformBuffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: RawUniformBuffer,
    model_bind_group: wgpu::BindGroup,
    surface_buffer: RawUniformBuffer,
    surface_bind_group: wgpu::BindGroup,

    /// Surface description the uniforms are packed from.
    pub desc: MaterialDesc,
    /// Scene fog, if any.
    pub fog: Option<Fog>,
}

impl StandardMaterial {
    /// Create a material rendering into `format` targets with a depth buffer.
    ///
    /// `map` is sampled when `desc.map` is set; pass a white texture otherwise.
    pub fn new(
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        desc: MaterialDesc,
        map: &Texture2D,
        fog: Option<Fog>,
    ) -> anyhow::Result<Self> {
        let shader = include_str!("../../shaders/standard.wgsl");

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let vertex_fragment = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        // Camera bind group layout (group 0)
        let camera_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("standard camera bind group layout"),
                    entries: &[uniform_entry(0, vertex_fragment)],
                });

        // Model bind group layout (group 1)
        let model_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("standard model bind group layout"),
                    entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
                });

        // Surface parameters and colour map (group 2)
        let surface_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("standard surface bind group layout"),
                    entries: &[
                        uniform_entry(0, vertex_fragment),
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline = PipelineBuilder::new(ctx)
            .label("standard material pipeline")
            .shader(shader)
            .vertex_layout(Vertex::layout())
            .bind_group_layout(&camera_bind_group_layout)
            .bind_group_layout(&model_bind_group_layout)
            .bind_group_layout(&surface_bind_group_layout)
            .color_format(format)
            .depth(DepthState::read_write())
            .blend(BlendState::Opaque)
            .cull(desc.side.cull_state())
            .build()?;

        let camera_buffer =
            RawUniformBuffer::for_type::<CameraUniform>(ctx, Some("standard camera uniform"));
        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("standard camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.binding(),
            }],
        });

        let model_buffer =
            RawUniformBuffer::for_type::<ModelUniform>(ctx, Some("standard model uniform"));
        let model_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("standard model bind group"),
            layout: &model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.binding(),
            }],
        });

        let surface_buffer =
            RawUniformBuffer::for_type::<StandardUniform>(ctx, Some("standard surface uniform"));
        let surface_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("standard surface bind group"),
            layout: &surface_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: surface_buffer.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(map.sampler()),
                },
            ],
        });

        Ok(Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            surface_buffer,
            surface_bind_group,
            desc,
            fog,
        })
    }
}

impl Material for StandardMaterial {
    fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    fn camera_bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }

    fn model_bind_group(&self) -> &wgpu::BindGroup {
        &self.model_bind_group
    }

    fn surface_bind_group(&self) -> Option<&wgpu::BindGroup> {
        Some(&self.surface_bind_group)
    }

    fn update_uniforms(
        &self,
        ctx: &WgpuContext,
        viewer: &dyn Viewer,
        model_matrix: Mat4,
        lights: &[&dyn Light],
    ) {
        self.camera_buffer
            .write(ctx, &CameraUniform::from_viewer(viewer));
        self.model_buffer
            .write(ctx, &ModelUniform::from_matrix(model_matrix));

        // One directional light is shaded; extras are ignored.
        let light = lights
            .first()
            .map(|light| light.uniforms())
            .unwrap_or_else(LightUniforms::none);
        self.surface_buffer
            .write(ctx, &StandardUniform::new(&self.desc, light, self.fog));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::light::DirectionalLight;
    use crate::renderer::material::{Side, TextureDesc};

    #[test]
    fn test_uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<StandardUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<StandardUniform>(), 6 * 16);
    }

    #[test]
    fn test_uniform_packs_map_and_fog() {
        let desc = MaterialDesc::standard([1.0, 1.0, 1.0])
            .with_side(Side::Double)
            .with_map(TextureDesc {
                path: "ground.jpg".into(),
                repeat: [30.0, 30.0],
                nearest_magnification: true,
            });
        let light = DirectionalLight::white(4.0, glam::Vec3::NEG_Y).uniforms();
        let uniform = StandardUniform::new(&desc, light, Some(Fog::new([0.0; 3], 10.0, 170.0)));
        assert_eq!(uniform.fog_range_uv_repeat, [10.0, 170.0, 30.0, 30.0]);
        assert_eq!(uniform.fog_color[3], 1.0);
        assert_eq!(uniform.surface[2], 1.0);
        assert_eq!(uniform.light.color_intensity[3], 4.0);
    }

    #[test]
    fn test_uniform_without_map_or_fog() {
        let uniform = StandardUniform::new(
            &MaterialDesc::standard([0.2, 0.4, 0.6]),
            LightUniforms::none(),
            None,
        );
        assert_eq!(uniform.base_color, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(uniform.fog_color[3], 0.0);
        assert_eq!(uniform.surface[2], 0.0);
        assert_eq!(uniform.fog_range_uv_repeat[2..], [1.0, 1.0]);
    }
}
