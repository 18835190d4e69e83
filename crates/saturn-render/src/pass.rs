//! Per-frame command encoding.
//!
//! [`FrameEncoder`] owns the command encoder and the acquired surface texture
//! for one frame. [`RenderPassBuilder`] describes the clear color and optional
//! depth attachment of each pass.

use crate::depth::DepthBuffer;

/// Default clear color of the scene.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color::BLACK;

#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub clear_value: f32,
}

#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_BLACK,
            depth_attachment: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a reverse-Z depth buffer, cleared to the far plane.
    pub fn depth(mut self, view: wgpu::TextureView) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig {
            view,
            clear_value: DepthBuffer::CLEAR_VALUE,
        });
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
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
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and surface texture. Submitted exactly once, either
/// through [`FrameEncoder::submit`] or on drop.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: wgpu::Queue,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
        }
    }

    /// Begin a pass that renders into `color_view`, e.g. the scene target.
    /// `None` only once the frame has been submitted.
    pub fn begin_offscreen_pass(
        &mut self,
        builder: &RenderPassBuilder,
        color_view: &wgpu::TextureView,
    ) -> Option<wgpu::RenderPass<'_>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.begin(encoder, color_view))
    }

    /// Begin a pass that renders into the window surface.
    pub fn begin_surface_pass(
        &mut self,
        builder: &RenderPassBuilder,
    ) -> Option<wgpu::RenderPass<'_>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.begin(encoder, &self.surface_view))
    }

    /// Submit the recorded commands and present.
    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) -> bool {
        match (self.encoder.take(), self.surface_texture.take()) {
            (Some(encoder), Some(surface_texture)) => {
                self.queue.submit([encoder.finish()]);
                surface_texture.present();
                true
            }
            _ => false,
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if self.encoder.is_some() && self.finish() {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_color_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, wgpu::Color::BLACK);
        assert!(builder.depth_attachment.is_none());
    }

    #[test]
    fn test_depth_attachment_is_optional() {
        let builder = RenderPassBuilder::new().label("blit-pass");
        assert!(builder.depth_attachment.is_none());
    }

    #[test]
    fn test_space_black_constant() {
        assert_eq!(SPACE_BLACK, wgpu::Color::BLACK);
        assert_eq!(SPACE_BLACK.a, 1.0);
    }

    #[test]
    fn test_builder_sets_clear_color_and_label() {
        let builder = RenderPassBuilder::new()
            .clear_color(wgpu::Color::RED)
            .label("scene-pass");
        assert_eq!(builder.clear_color.r, 1.0);
        assert_eq!(builder.label, Some("scene-pass"));
    }
}
