//! Fullscreen nebula haze drawn over the background.

use bytemuck::{Pod, Zeroable};
use saturn_render::{BlendMode, DepthMode, UniformBlock};

use super::{ElementFactory, ElementPipeline};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct OverlayUniforms {
    /// Scroll sparkle strength in `[0, 1]`.
    pub sparkle: f32,
    /// Drives the slow color cycle and cloud drift.
    pub cycle_time: f32,
    pub _padding: [f32; 2],
}

pub const OVERLAY_SHADER: &str = r#"
struct OverlayUniforms {
    sparkle: f32,
    cycle_time: f32,
    _padding: vec2<f32>,
};

@group(1) @binding(0)
var<uniform> overlay: OverlayUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.clip_position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return overlay_shade(in.uv, frame.time, overlay.cycle_time, overlay.sparkle);
}
"#;

pub struct OverlayElement {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBlock,
}

impl OverlayElement {
    pub(crate) fn new(factory: &mut ElementFactory<'_>) -> Self {
        let (layout, uniforms) =
            factory.uniform("overlay-uniforms", &OverlayUniforms::default());
        let pipeline = factory.pipeline(ElementPipeline {
            name: "overlay",
            source: OVERLAY_SHADER,
            element_layout: Some(&layout),
            vertex_buffers: &[],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Alpha,
            depth: DepthMode::Ignore,
        });
        Self { pipeline, uniforms }
    }

    pub fn update(&self, queue: &wgpu::Queue, sparkle: f32, cycle_time: f32) {
        self.uniforms.write(
            queue,
            &OverlayUniforms {
                sparkle,
                cycle_time,
                _padding: [0.0; 2],
            },
        );
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.uniforms.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
