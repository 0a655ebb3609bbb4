//! High-level rendering abstractions
//!
//! Cameras, controls, lights, geometry, materials and renderable objects.

pub mod color;
pub mod control;
pub mod fog;
pub mod geometry;
pub mod light;
pub mod material;
pub mod object;
pub mod viewer;

pub use color::srgb_hex_to_linear;
pub use control::OrbitControl;
pub use fog::Fog;
pub use geometry::{Aabb, Geometry, Mesh, MeshData};
pub use light::{DirectionalLight, Light, LightUniforms};
pub use material::{Material, MaterialDesc, ModelUniform, Side, StandardMaterial, TextureDesc};
pub use object::{Gm, Object};
pub use viewer::{Camera, CameraUniform, Projection, Viewer, Viewport};
