//! Shooting star trails and heads.
//!
//! Each active star owns a fixed run of `trail_capacity` vertices in the
//! trail buffer, drawn as its own line strip. Active stars are packed at the
//! front of both buffers every frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use saturn_render::{BlendMode, DepthMode, MeshBuffer, VertexPositionNormalUv};

use super::mesh::uv_sphere;
use super::{ElementFactory, ElementPipeline};
use crate::shooting_star::{ShootingStar, ShootingStarPool};

pub const HEAD_RADIUS: f32 = 2.0;
pub const HEAD_SEGMENTS: u32 = 6;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
    pub alpha: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl TrailVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TrailVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct HeadInstance {
    pub position: [f32; 3],
    pub opacity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl HeadInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![3 => Float32x4, 4 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HeadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Write one star's trail into `out`, newest point first. Alpha falls off
/// linearly along the strip and scales with the remaining life.
pub fn write_trail(star: &ShootingStar, points: &mut [Vec3], out: &mut [TrailVertex]) {
    star.fill_trail(points);
    let len = points.len().max(1) as f32;
    let opacity = star.life().max(0.0);
    let color = star.color().rgb().to_array();
    for (i, (vertex, point)) in out.iter_mut().zip(points.iter()).enumerate() {
        *vertex = TrailVertex {
            position: point.to_array(),
            alpha: (1.0 - i as f32 / len) * opacity,
            color,
            _padding: 0.0,
        };
    }
}

pub const TRAIL_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) alpha: f32,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = frame.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vec4<f32>(vertex.color, vertex.alpha);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub const HEAD_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct HeadInstance {
    @location(3) position_opacity: vec4<f32>,
    @location(4) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, head: HeadInstance) -> VertexOutput {
    let world = vertex.position + head.position_opacity.xyz;
    var out: VertexOutput;
    out.clip_position = frame.view_proj * vec4<f32>(world, 1.0);
    out.color = vec4<f32>(head.color.xyz, head.position_opacity.w);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub struct ShootingStarElement {
    trail_pipeline: wgpu::RenderPipeline,
    head_pipeline: wgpu::RenderPipeline,
    trails: wgpu::Buffer,
    heads: wgpu::Buffer,
    head_mesh: MeshBuffer,
    capacity: usize,
    trail_capacity: usize,
    trail_scratch: Vec<TrailVertex>,
    head_scratch: Vec<HeadInstance>,
    points: Vec<Vec3>,
    active: u32,
}

impl ShootingStarElement {
    pub(crate) fn new(
        factory: &mut ElementFactory<'_>,
        capacity: usize,
        trail_capacity: usize,
    ) -> Self {
        let trail_capacity = trail_capacity.max(1);
        let trails = factory.dynamic_buffer::<TrailVertex>(
            "shooting-star-trails",
            capacity * trail_capacity,
        );
        let heads = factory.dynamic_buffer::<HeadInstance>("shooting-star-heads", capacity);
        let head_mesh = factory.mesh(
            "shooting-star-head",
            &uv_sphere(HEAD_RADIUS, HEAD_SEGMENTS, HEAD_SEGMENTS),
        );

        let trail_pipeline = factory.pipeline(ElementPipeline {
            name: "shooting-star-trail",
            source: TRAIL_SHADER,
            element_layout: None,
            vertex_buffers: &[TrailVertex::layout()],
            topology: wgpu::PrimitiveTopology::LineStrip,
            blend: BlendMode::Additive,
            depth: DepthMode::TestOnly,
        });
        let head_pipeline = factory.pipeline(ElementPipeline {
            name: "shooting-star-head",
            source: HEAD_SHADER,
            element_layout: None,
            vertex_buffers: &[VertexPositionNormalUv::layout(), HeadInstance::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Alpha,
            depth: DepthMode::TestOnly,
        });

        Self {
            trail_pipeline,
            head_pipeline,
            trails,
            heads,
            head_mesh,
            capacity,
            trail_capacity,
            trail_scratch: Vec::with_capacity(capacity * trail_capacity),
            head_scratch: Vec::with_capacity(capacity),
            points: vec![Vec3::ZERO; trail_capacity],
            active: 0,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, pool: &ShootingStarPool) {
        self.trail_scratch.clear();
        self.head_scratch.clear();

        for star in pool.active().take(self.capacity) {
            let start = self.trail_scratch.len();
            self.trail_scratch
                .resize(start + self.trail_capacity, TrailVertex::default());
            write_trail(star, &mut self.points, &mut self.trail_scratch[start..]);

            self.head_scratch.push(HeadInstance {
                position: star.position().to_array(),
                opacity: star.life().max(0.0),
                color: star.color().rgb().to_array(),
                _padding: 0.0,
            });
        }

        self.active = self.head_scratch.len() as u32;
        if self.active > 0 {
            queue.write_buffer(&self.trails, 0, bytemuck::cast_slice(&self.trail_scratch));
            queue.write_buffer(&self.heads, 0, bytemuck::cast_slice(&self.head_scratch));
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.active == 0 {
            return;
        }

        let run = self.trail_capacity as u32;
        pass.set_pipeline(&self.trail_pipeline);
        pass.set_vertex_buffer(0, self.trails.slice(..));
        for i in 0..self.active {
            pass.draw(i * run..(i + 1) * run, 0..1);
        }

        pass.set_pipeline(&self.head_pipeline);
        self.head_mesh.bind(pass);
        pass.set_vertex_buffer(1, self.heads.slice(..));
        self.head_mesh.draw_instanced(pass, self.active);
    }

    pub fn active_count(&self) -> u32 {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    fn fired_star(updates: usize) -> ShootingStar {
        let viewer = Vec3::new(0.0, 0.0, 100.0);
        let mut star = ShootingStar::new(50);
        star.trigger(viewer, &mut SeededRandom::new(4));
        for _ in 0..updates {
            star.update(1.0 / 60.0, viewer);
        }
        star
    }

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<TrailVertex>(), 32);
        assert_eq!(std::mem::size_of::<HeadInstance>(), 32);
        assert_eq!(TrailVertex::layout().attributes[2].offset, 16);
    }

    #[test]
    fn test_trail_alpha_falls_off_along_strip() {
        let star = fired_star(10);
        let mut points = vec![Vec3::ZERO; 50];
        let mut out = vec![TrailVertex::default(); 50];
        write_trail(&star, &mut points, &mut out);

        let life = star.life();
        assert!((out[0].alpha - life).abs() < 1e-6);
        assert!((out[25].alpha - 0.5 * life).abs() < 1e-6);
        assert!(out.windows(2).all(|w| w[1].alpha <= w[0].alpha));
        assert_eq!(out[0].position, star.trail()[0].to_array());
    }

    #[test]
    fn test_unused_trail_slots_repeat_oldest_point() {
        let star = fired_star(3);
        let mut points = vec![Vec3::ZERO; 50];
        let mut out = vec![TrailVertex::default(); 50];
        write_trail(&star, &mut points, &mut out);

        let oldest = star.trail()[2].to_array();
        assert_eq!(out[2].position, oldest);
        assert_eq!(out[49].position, oldest);
    }

    #[test]
    fn test_trail_color_matches_star() {
        let star = fired_star(1);
        let mut points = vec![Vec3::ZERO; 4];
        let mut out = vec![TrailVertex::default(); 4];
        write_trail(&star, &mut points, &mut out);
        assert!(out.iter().all(|v| v.color == star.color().rgb().to_array()));
    }
}
