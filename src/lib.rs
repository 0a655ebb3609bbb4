//! Outline scene
//!
//! An interactive wgpu scene: a textured ground and six lit primitives
//! under a damped, auto-rotating orbit camera. Clicking a primitive
//! selects it and the post-processing chain outlines the selection.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - Core wgpu wrapper (Adapter, Device, Queue)
//! 2. **core** - GPU primitives (buffers, textures, pipelines)
//! 3. **renderer** - Cameras, orbit control, lights, geometry, materials
//! 4. **picking** - Rays, raycaster and the selection store
//! 5. **effect** - Post-processing chain (scene, outline, output, FXAA)
//! 6. **scene** - Scene graph, showcase layout and its GPU upload
//! 7. **viewport** / **frame** - Resize propagation and the per-frame tick
//! 8. **window** - Window management with winit
//! 9. **app** - The showcase wiring everything together

pub mod app;
pub mod context;
pub mod core;
pub mod effect;
pub mod frame;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod viewport;
pub mod window;

// Re-export commonly used types
pub use context::WgpuContext;

pub use core::{
    AssetError, BlendState, ClearState, CullState, DepthState, DepthTexture, IndexBuffer,
    PipelineBuilder, RawUniformBuffer, RenderTarget, Sampling, Texture2D, VertexBuffer,
};

pub use renderer::{
    Aabb, Camera, DirectionalLight, Fog, Geometry, Gm, Light, Material, MaterialDesc, Mesh,
    MeshData, OrbitControl, Projection, Side, StandardMaterial, Viewer, Viewport,
};

pub use picking::{Intersection, PickingService, Ray, Raycaster, SelectionChanged, SelectionStore};

pub use effect::{
    Effect, EffectComposer, FxaaEffect, OutlinePass, OutlineSettings, OutputPass, RenderPass,
    ToneMapping,
};

pub use scene::{NodeId, Scene, SceneError, SceneGpu, SceneLayout, SceneNode};

pub use viewport::{ProjectionUpdated, Resizable, ViewportService};

pub use frame::{FrameLoop, FrameStage, Tick};

pub use window::{Event, FrameInput, FrameOutput, MouseButton, Window, WindowSettings};

pub use app::{Showcase, ShowcaseSettings};

// Re-export glam for convenience
pub use glam;
