//! Render target abstraction
//!
//! Pairs a colour view with an optional depth view for a single pass.

use crate::core::render_states::ClearState;

/// A render target that can be rendered to.
pub struct RenderTarget<'a> {
    pub(crate) color_view: &'a wgpu::TextureView,
    pub(crate) depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    /// Create a new render target.
    pub fn new(color_view: &'a wgpu::TextureView, depth_view: Option<&'a wgpu::TextureView>) -> Self {
        Self {
            color_view,
            depth_view,
        }
    }

    /// Create a render pass with the given clear state.
    pub fn begin_render_pass<'p>(
        &'a self,
        encoder: &'p mut wgpu::CommandEncoder,
        label: &str,
        clear: ClearState,
    ) -> wgpu::RenderPass<'p>
    where
        'a: 'p,
    {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: clear.color_load_op(),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_attachment = self
            .depth_view
            .map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: clear.depth_load_op(),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: depth_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
