//! Instanced nebula cloud billboards.

use bytemuck::{Pod, Zeroable};
use saturn_render::{BlendMode, DepthMode, MeshBuffer, VertexPositionNormalUv};

use super::mesh::plane;
use super::{ElementFactory, ElementPipeline};
use crate::nebula::{CLOUD_SEGMENTS, NebulaCloud};

/// Per-cloud instance data: placement matrix, then color and edge length.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CloudInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub size: f32,
}

impl CloudInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CloudInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&NebulaCloud> for CloudInstance {
    fn from(cloud: &NebulaCloud) -> Self {
        Self {
            model: cloud.model_matrix().to_cols_array_2d(),
            color: cloud.color.rgb().to_array(),
            size: cloud.size,
        }
    }
}

pub const CLOUD_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct CloudInstance {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color_size: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, cloud: CloudInstance) -> VertexOutput {
    let model = mat4x4<f32>(cloud.model_0, cloud.model_1, cloud.model_2, cloud.model_3);
    var displaced = vec3<f32>(vertex.position.xy * cloud.color_size.w, 0.0);
    displaced.z = cloud_wave(displaced.x, frame.time);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * model * vec4<f32>(displaced, 1.0);
    out.uv = vertex.uv;
    out.color = cloud.color_size.xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return cloud_shade(in.uv, frame.time, in.color);
}
"#;

pub struct CloudElement {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    instances: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl CloudElement {
    pub(crate) fn new(factory: &mut ElementFactory<'_>, capacity: usize) -> Self {
        let mesh = factory.mesh("cloud", &plane(1.0, 1.0, CLOUD_SEGMENTS, CLOUD_SEGMENTS));
        let instances = factory.dynamic_buffer::<CloudInstance>("cloud-instances", capacity);
        let pipeline = factory.pipeline(ElementPipeline {
            name: "clouds",
            source: CLOUD_SHADER,
            element_layout: None,
            vertex_buffers: &[VertexPositionNormalUv::layout(), CloudInstance::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: BlendMode::Additive,
            depth: DepthMode::TestOnly,
        });

        Self {
            pipeline,
            mesh,
            instances,
            capacity,
            count: 0,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, clouds: &[NebulaCloud]) {
        let data: Vec<CloudInstance> = clouds
            .iter()
            .take(self.capacity)
            .map(CloudInstance::from)
            .collect();
        self.count = data.len() as u32;
        if !data.is_empty() {
            queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(&data));
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        self.mesh.bind(pass);
        pass.set_vertex_buffer(1, self.instances.slice(..));
        self.mesh.draw_instanced(pass, self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nebula::NebulaClouds;
    use crate::random::SeededRandom;

    #[test]
    fn test_instance_layout_follows_mesh_attributes() {
        let layout = CloudInstance::layout();
        assert_eq!(layout.array_stride, 80);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[0].shader_location, 3);
        assert_eq!(layout.attributes[4].offset, 64);
    }

    #[test]
    fn test_instance_carries_cloud_placement() {
        let clouds = NebulaClouds::generate(1, &mut SeededRandom::new(8));
        let cloud = &clouds.clouds()[0];
        let instance = CloudInstance::from(cloud);
        assert_eq!(instance.size, cloud.size);
        assert_eq!(instance.model[3][0], cloud.position.x);
        assert_eq!(instance.model[3][2], cloud.position.z);
        assert_eq!(instance.color, cloud.color.rgb().to_array());
    }

    #[test]
    fn test_shader_waves_before_placement() {
        let wave = CLOUD_SHADER.find("cloud_wave(").unwrap();
        let place = CLOUD_SHADER.find("frame.view_proj * model").unwrap();
        assert!(wave < place);
    }
}
