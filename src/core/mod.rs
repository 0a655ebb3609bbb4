//! Core rendering abstractions
//!
//! Mid-level wrappers over wgpu primitives shared by the materials and the
//! post-processing passes.

pub mod buffer;
pub mod pipeline;
pub mod render_states;
pub mod render_target;
pub mod texture;
pub mod vertex;

pub use buffer::{IndexBuffer, RawUniformBuffer, VertexBuffer};
pub use pipeline::PipelineBuilder;
pub use render_states::{BlendState, ClearState, CullState, DepthState};
pub use render_target::RenderTarget;
pub use texture::{AssetError, DepthTexture, Sampling, Texture2D};
pub use vertex::{Vertex, VertexPC};
