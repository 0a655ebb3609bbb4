//! Scene content as plain data

use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use super::{NodeId, Scene, SceneError, SceneNode};
use crate::renderer::color::srgb_hex_to_linear;
use crate::renderer::fog::Fog;
use crate::renderer::geometry::{primitives, MeshData};
use crate::renderer::light::DirectionalLight;
use crate::renderer::material::{MaterialDesc, Side, TextureDesc};

const GROUND_TEXTURE: &str = "Plaster001_1K-JPG_Color.jpg";

/// Locate a file of the `assets` directory: next to the crate manifest
/// first, then under the working directory.
pub fn asset_path(file: &str) -> PathBuf {
    let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(file);
    if bundled.exists() {
        return bundled;
    }
    let local = PathBuf::from("assets").join(file);
    if local.exists() {
        local
    } else {
        bundled
    }
}

/// Parametric mesh of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Plane {
        width: f32,
        height: f32,
    },
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl PrimitiveShape {
    /// Generate the mesh.
    pub fn build(&self) -> MeshData {
        match *self {
            PrimitiveShape::Plane { width, height } => primitives::plane(width, height),
            PrimitiveShape::Cuboid {
                width,
                height,
                depth,
            } => primitives::cuboid(width, height, depth),
            PrimitiveShape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => primitives::sphere(radius, width_segments, height_segments),
            PrimitiveShape::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => primitives::torus(radius, tube, radial_segments, tubular_segments),
            PrimitiveShape::Cylinder {
                radius,
                height,
                radial_segments,
            } => primitives::cylinder(radius, radius, height, radial_segments),
            PrimitiveShape::Cone {
                radius,
                height,
                radial_segments,
            } => primitives::cone(radius, height, radial_segments),
            PrimitiveShape::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => primitives::torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
        }
    }
}

/// One node of a [`SceneLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub name: String,
    pub shape: PrimitiveShape,
    pub material: MaterialDesc,
    pub position: Vec3,
    pub rotation: Quat,
    /// Whether clicks can select this node.
    pub pickable: bool,
}

impl NodeDesc {
    pub fn new(name: impl Into<String>, shape: PrimitiveShape, color: u32, position: Vec3) -> Self {
        Self {
            name: name.into(),
            shape,
            material: MaterialDesc::standard(srgb_hex_to_linear(color)),
            position,
            rotation: Quat::IDENTITY,
            pickable: true,
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Everything placed in the scene, independent of the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// Clear colour (linear RGB).
    pub background: [f32; 3],
    pub fog: Option<Fog>,
    pub light: DirectionalLight,
    pub nodes: Vec<NodeDesc>,
}

impl SceneLayout {
    /// Textured ground with six lit primitives around the origin.
    pub fn showcase() -> Self {
        let ground = NodeDesc {
            name: "ground".into(),
            shape: PrimitiveShape::Plane {
                width: 60.0,
                height: 60.0,
            },
            material: MaterialDesc::default()
                .with_side(Side::Double)
                .with_map(TextureDesc {
                    path: asset_path(GROUND_TEXTURE),
                    repeat: [30.0, 30.0],
                    nearest_magnification: true,
                }),
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
            pickable: false,
        };

        let nodes = vec![
            ground,
            NodeDesc::new(
                "cube",
                PrimitiveShape::Cuboid {
                    width: 10.0,
                    height: 10.0,
                    depth: 10.0,
                },
                0x7DF9FF,
                Vec3::new(-20.0, 5.0, -10.0),
            ),
            NodeDesc::new(
                "sphere",
                PrimitiveShape::Sphere {
                    radius: 8.0,
                    width_segments: 32,
                    height_segments: 16,
                },
                0xCCAA88,
                Vec3::new(15.0, 10.0, 15.0),
            ),
            NodeDesc::new(
                "torus",
                PrimitiveShape::Torus {
                    radius: 6.0,
                    tube: 1.0,
                    radial_segments: 16,
                    tubular_segments: 100,
                },
                0xAACC88,
                Vec3::new(-4.0, 7.0, 5.0),
            ),
            NodeDesc::new(
                "cone",
                PrimitiveShape::Cone {
                    radius: 6.0,
                    height: 8.0,
                    radial_segments: 32,
                },
                0x88CCAA,
                Vec3::new(20.0, 4.0, -20.0),
            ),
            NodeDesc::new(
                "cylinder",
                PrimitiveShape::Cylinder {
                    radius: 3.0,
                    height: 10.0,
                    radial_segments: 32,
                },
                0xCC88AA,
                Vec3::new(-15.0, 5.0, 20.0),
            ),
            NodeDesc::new(
                "torus knot",
                PrimitiveShape::TorusKnot {
                    radius: 4.0,
                    tube: 1.2,
                    tubular_segments: 100,
                    radial_segments: 16,
                    p: 2,
                    q: 3,
                },
                0xFF00AA,
                Vec3::new(2.0, 8.0, -20.0),
            ),
        ];

        Self {
            background: srgb_hex_to_linear(0x1A1A1A),
            fog: Some(Fog::new(srgb_hex_to_linear(0x000000), 10.0, 170.0)),
            light: DirectionalLight::from_position(
                4.0,
                srgb_hex_to_linear(0xFFFFFF),
                Vec3::new(10.0, 20.0, 10.0),
                Vec3::ZERO,
            ),
            nodes,
        }
    }
}

impl Scene {
    /// Build the scene graph of `layout`, returning it with the pickable
    /// nodes in layout order.
    pub fn from_layout(layout: &SceneLayout) -> Result<(Scene, Vec<NodeId>), SceneError> {
        if layout.nodes.is_empty() {
            return Err(SceneError::EmptyLayout);
        }

        let mut scene = Scene::new();
        scene.background = layout.background;
        scene.fog = layout.fog;
        scene.lights.push(layout.light.clone());

        let mut pickable = Vec::new();
        for desc in &layout.nodes {
            let node = SceneNode::mesh(
                desc.name.clone(),
                Arc::new(desc.shape.build()),
                desc.material.clone(),
            )
            .with_transform(desc.transform());
            let id = scene.add(node);
            if desc.pickable {
                pickable.push(id);
            }
        }

        Ok((scene, pickable))
    }
}
