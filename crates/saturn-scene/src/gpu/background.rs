//! Far undulating black plane behind everything else.

use glam::{Mat4, Vec3};
use saturn_render::{BlendMode, DepthMode, MeshBuffer, UniformBlock, VertexPositionNormalUv};

use super::mesh::plane;
use super::{ElementFactory, ElementPipeline, MODEL_BINDINGS_WGSL, ModelUniforms};

pub const BACKGROUND_DEPTH: f32 = -2000.0;
pub const BACKGROUND_EXTENT: f32 = 10_000.0;
pub const BACKGROUND_SEGMENTS: u32 = 100;

pub const BACKGROUND_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> @builtin(position) vec4<f32> {
    var displaced = vertex.position;
    displaced.z = displaced.z + background_wave(displaced.x, displaced.y, frame.time);
    return frame.view_proj * model_data.model * vec4<f32>(displaced, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}
"#;

pub struct BackgroundElement {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniforms: UniformBlock,
}

impl BackgroundElement {
    pub(crate) fn new(factory: &mut ElementFactory<'_>) -> Self {
        let model = ModelUniforms::new(Mat4::from_translation(Vec3::new(
            0.0,
            0.0,
            BACKGROUND_DEPTH,
        )));
        let (layout, uniforms) = factory.uniform("background-uniforms", &model);
        let mesh = factory.mesh(
            "background",
            &plane(
                BACKGROUND_EXTENT,
                BACKGROUND_EXTENT,
                BACKGROUND_SEGMENTS,
                BACKGROUND_SEGMENTS,
            ),
        );
        let source = format!("{MODEL_BINDINGS_WGSL}{BACKGROUND_SHADER}");
        let pipeline = factory.pipeline(ElementPipeline {
            name: "background",
            source: &source,
            element_layout: Some(&layout),
            vertex_buffers: &[VertexPositionNormalUv::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Opaque,
            depth: DepthMode::TestWrite,
        });

        Self {
            pipeline,
            mesh,
            uniforms,
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.uniforms.bind_group, &[]);
        self.mesh.bind(pass);
        self.mesh.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_displaces_with_wave() {
        assert!(BACKGROUND_SHADER.contains("background_wave(displaced.x, displaced.y, frame.time)"));
        assert!(BACKGROUND_SHADER.contains("fn vs_main"));
        assert!(BACKGROUND_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn test_plane_sits_far_behind_the_planet() {
        assert!(BACKGROUND_DEPTH < crate::saturn::SATURN_CENTER.z - 1000.0);
    }
}
