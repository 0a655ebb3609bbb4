//! Scene colour pass

use super::{Effect, EffectContext, HDR_FORMAT};
use crate::core::render_states::ClearState;
use crate::core::render_target::RenderTarget;

/// Draws every scene object into an HDR target with depth, clearing to
/// the background colour.
pub struct RenderPass {
    clear: ClearState,
}

impl RenderPass {
    pub fn new(background: [f32; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            clear: ClearState::color_and_depth([r, g, b, 1.0], 1.0),
        }
    }
}

impl Effect for RenderPass {
    fn label(&self) -> &str {
        "scene pass"
    }

    fn output_format(&self) -> wgpu::TextureFormat {
        HDR_FORMAT
    }

    fn render(
        &mut self,
        frame: &EffectContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
        _input: Option<&wgpu::TextureView>,
        output: &wgpu::TextureView,
    ) {
        let target = RenderTarget::new(output, Some(frame.depth.view()));
        let mut pass = target.begin_render_pass(encoder, self.label(), self.clear);
        frame.scene.render(frame.ctx, frame.camera, &mut pass);
    }
}
