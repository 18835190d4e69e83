//! Planet sphere and the two ring surfaces around it.
//!
//! Both ring surfaces share one mesh and one transform. The back surface is
//! drawn before the planet and the front one after it, so the additive fire
//! wraps the sphere on both sides.

use saturn_render::{BlendMode, DepthMode, MeshBuffer, UniformBlock, VertexPositionNormalUv};
use saturn_shading::{RING_INNER_RADIUS, RING_OUTER_RADIUS};

use super::mesh::{ring, uv_sphere};
use super::{ElementFactory, ElementPipeline, MODEL_BINDINGS_WGSL, ModelUniforms};
use crate::saturn::SaturnSystem;

pub const PLANET_SEGMENTS: u32 = 32;
pub const RING_SEGMENTS: u32 = 64;

pub const PLANET_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) view_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = model_data.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.uv = vertex.uv;
    // Rotation and uniform scale only, so the model matrix maps normals too.
    out.view_normal = (frame.view * model_data.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return planet_shade(in.uv, normalize(in.view_normal), frame.time);
}
"#;

pub const RING_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_position: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = frame.view_proj * model_data.model * vec4<f32>(vertex.position, 1.0);
    out.local_position = vertex.position.xy;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return ring_fire(in.local_position, frame.time);
}
"#;

pub struct SaturnElement {
    planet_pipeline: wgpu::RenderPipeline,
    ring_pipeline: wgpu::RenderPipeline,
    sphere: MeshBuffer,
    ring: MeshBuffer,
    planet_uniforms: UniformBlock,
    ring_uniforms: UniformBlock,
}

impl SaturnElement {
    pub(crate) fn new(factory: &mut ElementFactory<'_>) -> Self {
        let initial = SaturnSystem::new();
        let (layout, planet_uniforms) = factory.uniform(
            "planet-uniforms",
            &ModelUniforms::new(initial.planet_matrix()),
        );
        let ring_uniforms = factory.uniform_on(
            &layout,
            "ring-uniforms",
            &ModelUniforms::new(initial.ring_matrix()),
        );

        let sphere = factory.mesh("planet", &uv_sphere(1.0, PLANET_SEGMENTS, PLANET_SEGMENTS));
        let ring = factory.mesh(
            "ring",
            &ring(RING_INNER_RADIUS, RING_OUTER_RADIUS, RING_SEGMENTS),
        );

        let planet_source = format!("{MODEL_BINDINGS_WGSL}{PLANET_SHADER}");
        let planet_pipeline = factory.pipeline(ElementPipeline {
            name: "planet",
            source: &planet_source,
            element_layout: Some(&layout),
            vertex_buffers: &[VertexPositionNormalUv::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Additive,
            depth: DepthMode::TestOnly,
        });
        let ring_source = format!("{MODEL_BINDINGS_WGSL}{RING_SHADER}");
        let ring_pipeline = factory.pipeline(ElementPipeline {
            name: "ring",
            source: &ring_source,
            element_layout: Some(&layout),
            vertex_buffers: &[VertexPositionNormalUv::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Additive,
            depth: DepthMode::TestOnly,
        });

        Self {
            planet_pipeline,
            ring_pipeline,
            sphere,
            ring,
            planet_uniforms,
            ring_uniforms,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, saturn: &SaturnSystem) {
        self.planet_uniforms
            .write(queue, &ModelUniforms::new(saturn.planet_matrix()));
        self.ring_uniforms
            .write(queue, &ModelUniforms::new(saturn.ring_matrix()));
    }

    pub fn render_back_ring<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.render_ring(pass);
    }

    pub fn render_planet<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.planet_pipeline);
        pass.set_bind_group(1, &self.planet_uniforms.bind_group, &[]);
        self.sphere.bind(pass);
        self.sphere.draw(pass);
    }

    pub fn render_front_ring<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.render_ring(pass);
    }

    fn render_ring<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.ring_pipeline);
        pass.set_bind_group(1, &self.ring_uniforms.bind_group, &[]);
        self.ring.bind(pass);
        self.ring.draw(pass);
    }
}
