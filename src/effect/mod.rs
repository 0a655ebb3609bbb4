//! Post-processing chain
//!
//! The [`EffectComposer`] runs a list of [`Effect`]s in order. Each effect
//! reads the previous one's output and writes into its own intermediate
//! target; the last one writes straight into the frame's output view.

mod fullscreen;
mod fxaa;
mod outline;
mod output;
mod render_pass;

pub use fullscreen::FullscreenQuad;
pub use fxaa::{FxaaEffect, FxaaUniform};
pub use outline::{OutlinePass, OutlineSettings, OutlineUniform};
pub use output::{OutputPass, OutputUniform, ToneMapping};
pub use render_pass::RenderPass;

use crate::context::WgpuContext;
use crate::core::texture::{DepthTexture, Texture2D};
use crate::renderer::viewer::Camera;
use crate::scene::{NodeId, SceneGpu};
use crate::viewport::Resizable;

/// Format of the scene colour and outline targets.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Per-frame state shared by every effect.
pub struct EffectContext<'a> {
    pub ctx: &'a WgpuContext,
    pub camera: &'a Camera,
    pub scene: &'a SceneGpu,
    pub selection: &'a [NodeId],
    /// Depth written by the scene pass.
    pub depth: &'a DepthTexture,
}

/// A stage of the post-processing chain.
pub trait Effect {
    fn label(&self) -> &str;

    /// Format of the target this effect renders into.
    fn output_format(&self) -> wgpu::TextureFormat;

    /// Record the effect. `input` is `None` for the first effect.
    fn render(
        &mut self,
        frame: &EffectContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
        input: Option<&wgpu::TextureView>,
        output: &wgpu::TextureView,
    );

    /// Called when the drawing surface changes size.
    fn resize(&mut self, _ctx: &WgpuContext, _width: u32, _height: u32) {}
}

/// Input and output target indices for each of `count` chained effects.
/// `None` input is the chain start, `None` output is the final view.
fn routing(count: usize) -> impl Iterator<Item = (Option<usize>, Option<usize>)> {
    (0..count).map(move |i| {
        let input = i.checked_sub(1);
        let output = (i + 1 < count).then_some(i);
        (input, output)
    })
}

/// Owns the effect chain with its intermediate targets and the scene depth
/// buffer.
pub struct EffectComposer {
    ctx: WgpuContext,
    effects: Vec<Box<dyn Effect>>,
    targets: Vec<Texture2D>,
    depth: DepthTexture,
    width: u32,
    height: u32,
}

impl EffectComposer {
    pub fn new(ctx: &WgpuContext, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            ctx: ctx.clone(),
            effects: Vec::new(),
            targets: Vec::new(),
            depth: DepthTexture::new(ctx, width, height, Some("scene depth texture")),
            width,
            height,
        }
    }

    /// Append an effect to the chain.
    pub fn add(&mut self, mut effect: Box<dyn Effect>) {
        effect.resize(&self.ctx, self.width, self.height);
        self.effects.push(effect);
        self.allocate_targets();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Labels of the effects in chain order.
    pub fn labels(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.label()).collect()
    }

    pub fn depth(&self) -> &DepthTexture {
        &self.depth
    }

    fn allocate_targets(&mut self) {
        let count = self.effects.len().saturating_sub(1);
        self.targets = self.effects[..count]
            .iter()
            .map(|effect| {
                Texture2D::render_target(
                    &self.ctx,
                    self.width,
                    self.height,
                    effect.output_format(),
                    Some(&format!("{} target", effect.label())),
                )
            })
            .collect();
    }

    /// Record the whole chain into `encoder`, finishing in `output`.
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        camera: &Camera,
        scene: &SceneGpu,
        selection: &[NodeId],
        output: &wgpu::TextureView,
    ) {
        let Self {
            ctx,
            effects,
            targets,
            depth,
            ..
        } = self;
        let frame = EffectContext {
            ctx,
            camera,
            scene,
            selection,
            depth,
        };

        let count = effects.len();
        for (effect, (input, target)) in effects.iter_mut().zip(routing(count)) {
            let input = input.map(|i| targets[i].view());
            let output = target.map_or(output, |i| targets[i].view());
            effect.render(&frame, encoder, input, output);
        }
    }
}

impl Resizable for EffectComposer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.depth.resize(&self.ctx, width, height);
        for effect in &mut self.effects {
            effect.resize(&self.ctx, width, height);
        }
        self.allocate_targets();
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_chains_through_intermediates() {
        let plan: Vec<_> = routing(4).collect();
        assert_eq!(
            plan,
            vec![
                (None, Some(0)),
                (Some(0), Some(1)),
                (Some(1), Some(2)),
                (Some(2), None),
            ]
        );
    }

    #[test]
    fn test_routing_single_effect_writes_output() {
        assert_eq!(routing(1).collect::<Vec<_>>(), vec![(None, None)]);
        assert_eq!(routing(0).count(), 0);
    }
}
