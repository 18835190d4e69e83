//! Star field sprites.
//!
//! Each star is one camera-facing quad expanded in the vertex shader to its
//! point size in framebuffer pixels. Static attributes are uploaded once;
//! positions stream in a separate buffer every frame.

use bytemuck::{Pod, Zeroable};
use saturn_render::{BlendMode, DepthMode};

use super::{ElementFactory, ElementPipeline};
use crate::starfield::{StarField, StarParticle};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub color: [f32; 3],
    pub size: f32,
    pub phase: f32,
    pub spikes: f32,
    /// [`saturn_shading::StarAnimation::code`].
    pub mode: f32,
    pub _padding: f32,
}

impl StarInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![1 => Float32x4, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&StarParticle> for StarInstance {
    fn from(star: &StarParticle) -> Self {
        Self {
            color: star.color,
            size: star.size,
            phase: star.phase,
            spikes: star.spikes,
            mode: star.animation.code(),
            _padding: 0.0,
        }
    }
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &POSITION_ATTRIBUTES,
    }
}

pub const STAR_SHADER: &str = r#"
struct StarInput {
    @location(0) position: vec3<f32>,
    @location(1) color_size: vec4<f32>,
    @location(2) phase_spikes_mode: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) center: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) spikes: f32,
    @location(3) intensity: f32,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32, star: StarInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[idx];

    let phase = star.phase_spikes_mode.x;
    let spikes = star.phase_spikes_mode.y;
    let mode = star.phase_spikes_mode.z;

    let view_position = frame.view * vec4<f32>(star.position, 1.0);
    let intensity = star_intensity(mode, frame.time, phase);
    let pixels = star_point_size(star.color_size.w, -view_position.z, intensity);

    var clip = frame.view_proj * vec4<f32>(star.position, 1.0);
    clip = vec4<f32>(clip.xy + corner * pixels * 2.0 / frame.viewport * clip.w, clip.zw);

    var out: VertexOutput;
    out.clip_position = clip;
    out.center = corner;
    out.color = star.color_size.xyz;
    out.spikes = spikes;
    out.intensity = intensity;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let shape = star_shape(in.center, in.spikes);
    if (shape < 0.01) {
        discard;
    }
    let core = exp(-length(in.center) * 18.0);
    let color = in.color * shape * in.intensity + vec3<f32>(1.0, 0.98, 0.95) * core * 0.6;
    return vec4<f32>(color, 1.0);
}
"#;

/// Current star positions, at most `limit`, as tightly packed `[x, y, z]`.
pub fn pack_positions(field: &StarField, limit: usize, out: &mut Vec<[f32; 3]>) {
    out.clear();
    out.extend(field.positions().take(limit).map(|p| p.to_array()));
}

pub struct StarElement {
    pipeline: wgpu::RenderPipeline,
    attributes: wgpu::Buffer,
    positions: wgpu::Buffer,
    scratch: Vec<[f32; 3]>,
    count: u32,
}

impl StarElement {
    pub(crate) fn new(factory: &mut ElementFactory<'_>, stars: &[StarParticle]) -> Self {
        let instances: Vec<StarInstance> = stars.iter().map(StarInstance::from).collect();
        let attributes = factory.vertex_buffer("star-attributes", bytemuck::cast_slice(&instances));
        let positions = factory.dynamic_buffer::<[f32; 3]>("star-positions", stars.len());
        let pipeline = factory.pipeline(ElementPipeline {
            name: "stars",
            source: STAR_SHADER,
            element_layout: None,
            vertex_buffers: &[position_layout(), StarInstance::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Additive,
            depth: DepthMode::TestOnly,
        });

        Self {
            pipeline,
            attributes,
            positions,
            scratch: Vec::with_capacity(stars.len()),
            count: stars.len() as u32,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, field: &StarField) {
        pack_positions(field, self.count as usize, &mut self.scratch);
        if !self.scratch.is_empty() {
            queue.write_buffer(&self.positions, 0, bytemuck::cast_slice(&self.scratch));
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.attributes.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
