//! Render pass and per-frame encoder helpers.
//!
//! [`RenderPassBuilder`] describes one pass declaratively, optionally drawing
//! into a multisampled target resolved into the surface; [`FrameEncoder`]
//! owns the acquired surface texture and the command encoder for a frame and
//! presents on [`FrameEncoder::submit`].

/// Background color behind the star shell.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

#[derive(Debug)]
struct DepthAttachmentConfig {
    view: wgpu::TextureView,
    clear_value: f32,
}

/// Fluent configuration for a render pass over the frame's surface view.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: Option<wgpu::Color>,
    depth_attachment: Option<DepthAttachmentConfig>,
    /// Multisampled view drawn into and resolved into the frame's view.
    msaa_view: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// A pass that clears to [`SPACE_BLACK`] with no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: Some(SPACE_BLACK),
            depth_attachment: None,
            msaa_view: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Keep what earlier passes drew instead of clearing (overlay passes).
    pub fn load_existing(mut self) -> Self {
        self.clear_color = None;
        self
    }

    /// Attach a depth buffer, cleared to `clear_value` at pass start.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig { view, clear_value });
        self
    }

    /// Draw into `view` and resolve it into the frame's view at pass end.
    pub fn resolve_from(mut self, view: wgpu::TextureView) -> Self {
        self.msaa_view = Some(view);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.clear_color {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Multisampled contents are only needed until they are resolved.
    fn color_store_op(&self) -> wgpu::StoreOp {
        if self.msaa_view.is_some() {
            wgpu::StoreOp::Discard
        } else {
            wgpu::StoreOp::Store
        }
    }

    /// Begin the pass on `encoder`, drawing into `color_view` or into the
    /// multisampled view resolved into it.
    pub fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let (view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(color_view)),
            None => (color_view, None),
        };
        let color_attachment = wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: self.color_load_op(),
                store: self.color_store_op(),
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

/// One frame's worth of command encoding against the acquired surface texture.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            surface_texture,
            view,
        }
    }

    /// Begin a pass targeting the surface view.
    pub fn begin_render_pass(&mut self, builder: &RenderPassBuilder) -> wgpu::RenderPass<'_> {
        builder.begin(&mut self.encoder, &self.view)
    }

    /// Raw encoder access for work recorded outside a pass (overlay buffer uploads).
    pub fn encoder_mut(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Submit `extra` command buffers followed by this frame's, then present.
    pub fn submit(
        self,
        queue: &wgpu::Queue,
        extra: impl IntoIterator<Item = wgpu::CommandBuffer>,
    ) {
        let commands = extra
            .into_iter()
            .chain(std::iter::once(self.encoder.finish()));
        queue.submit(commands);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clears_to_space_black() {
        let builder = RenderPassBuilder::new();
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Clear(c) if c == SPACE_BLACK));
    }

    #[test]
    fn test_load_existing_keeps_contents() {
        let builder = RenderPassBuilder::new().load_existing();
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Load));
    }

    #[test]
    fn test_plain_pass_stores_color() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.color_store_op(), wgpu::StoreOp::Store);
        assert!(builder.msaa_view.is_none());
    }

    #[test]
    fn test_custom_clear_color() {
        let red = wgpu::Color {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        };
        let builder = RenderPassBuilder::new().label("scene").clear_color(red);
        assert_eq!(builder.label, Some("scene"));
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Clear(c) if c == red));
    }
}
