//! GPU side of the scene

use std::collections::HashMap;
use std::path::PathBuf;

use super::{NodeId, Scene};
use crate::context::WgpuContext;
use crate::core::texture::{Sampling, Texture2D};
use crate::renderer::geometry::Mesh;
use crate::renderer::light::{DirectionalLight, Light};
use crate::renderer::material::{StandardMaterial, TextureDesc};
use crate::renderer::object::{Gm, Object};
use crate::renderer::viewer::Camera;

/// A drawable scene node.
pub struct RenderObject {
    pub node: NodeId,
    pub object: Gm<Mesh, StandardMaterial>,
}

/// Uploaded meshes and materials of every mesh node of a [`Scene`].
pub struct SceneGpu {
    objects: Vec<RenderObject>,
    lookup: HashMap<NodeId, usize>,
    lights: Vec<DirectionalLight>,
}

impl SceneGpu {
    /// Upload `scene` for rendering into `format` targets.
    ///
    /// A colour map that fails to load is replaced by plain white.
    pub fn new(ctx: &WgpuContext, format: wgpu::TextureFormat, scene: &Scene) -> anyhow::Result<Self> {
        let white = Texture2D::solid(ctx, [255, 255, 255, 255], Some("white texture"));
        let mut maps: HashMap<PathBuf, Option<Texture2D>> = HashMap::new();

        let mut objects = Vec::new();
        let mut lookup = HashMap::new();
        for (id, node) in scene.iter() {
            let (Some(mesh), Some(desc)) = (&node.mesh, &node.material) else {
                continue;
            };
            let Some(world) = scene.world_transform(id) else {
                continue;
            };

            let map = match &desc.map {
                Some(texture) => maps
                    .entry(texture.path.clone())
                    .or_insert_with(|| load_map(ctx, texture))
                    .as_ref()
                    .unwrap_or(&white),
                None => &white,
            };

            let material = StandardMaterial::new(ctx, format, desc.clone(), map, scene.fog)?;
            let geometry = Mesh::from_data(ctx, mesh, Some(&node.name));

            lookup.insert(id, objects.len());
            objects.push(RenderObject {
                node: id,
                object: Gm::new(geometry, material).with_transform(world),
            });
        }

        tracing::info!(objects = objects.len(), "scene uploaded");
        Ok(Self {
            objects,
            lookup,
            lights: scene.lights.clone(),
        })
    }

    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    /// Drawable of a mesh node.
    pub fn object(&self, id: NodeId) -> Option<&Gm<Mesh, StandardMaterial>> {
        self.lookup.get(&id).map(|&i| &self.objects[i].object)
    }

    pub fn lights(&self) -> Vec<&dyn Light> {
        self.lights.iter().map(|l| l as &dyn Light).collect()
    }

    /// Draw every object into an open pass.
    pub fn render(&self, ctx: &WgpuContext, camera: &Camera, pass: &mut wgpu::RenderPass<'_>) {
        let lights = self.lights();
        for entry in &self.objects {
            entry.object.render(ctx, camera, &lights, pass);
        }
    }
}

fn load_map(ctx: &WgpuContext, desc: &TextureDesc) -> Option<Texture2D> {
    let mag_filter = if desc.nearest_magnification {
        wgpu::FilterMode::Nearest
    } else {
        wgpu::FilterMode::Linear
    };
    match Texture2D::load(ctx, &desc.path, Sampling::repeat(mag_filter), Some("color map")) {
        Ok(texture) => {
            tracing::info!(path = %desc.path.display(), "loaded texture");
            Some(texture)
        }
        Err(err) => {
            tracing::warn!(error = %err, "texture unavailable, using white");
            None
        }
    }
}
