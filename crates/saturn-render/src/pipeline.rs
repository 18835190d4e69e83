//! Shared frame uniforms and the material pipeline builder used by every
//! scene element.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;

/// Per-frame data bound at `@group(0) @binding(0)` for every element.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// Scene target size in pixels.
    pub viewport: [f32; 2],
    /// Elapsed seconds since the loop started.
    pub time: f32,
    pub _padding: f32,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [1.0, 1.0],
            time: 0.0,
            _padding: 0.0,
        }
    }
}

/// WGSL declaration matching [`FrameUniforms`].
pub const FRAME_BINDINGS_WGSL: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    viewport: vec2<f32>,
    time: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;
"#;

pub fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame-bind-group-layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<FrameUniforms>() as u64),
            },
            count: None,
        }],
    })
}

/// Layout for a single per-element uniform block at `@group(1) @binding(0)`.
pub fn uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

/// A uniform buffer with its bind group.
pub struct UniformBlock {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl UniformBlock {
    pub fn new<T: Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        value: &T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    pub fn write<T: Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// How an element's fragments combine with what is already in the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    /// `src * alpha + dst`.
    Additive,
    /// Standard premultiplied-free alpha blending.
    Alpha,
}

impl BlendMode {
    pub fn state(self) -> Option<wgpu::BlendState> {
        match self {
            Self::Opaque => None,
            Self::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
            Self::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }
}

/// Depth interaction of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthMode {
    TestWrite,
    TestOnly,
    /// Always passes and never writes; used by full-screen layers.
    Ignore,
}

impl DepthMode {
    pub fn state(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            Self::TestWrite => (true, DepthBuffer::COMPARE_FUNCTION),
            Self::TestOnly => (false, DepthBuffer::COMPARE_FUNCTION),
            Self::Ignore => (false, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Describes one element pipeline. Entry points are always `vs_main` and `fs_main`.
pub struct MaterialPipelineDesc<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub blend: BlendMode,
    pub depth: DepthMode,
    pub color_format: wgpu::TextureFormat,
}

/// Build an element pipeline. Elements are seen from both sides, so
/// nothing is culled.
pub fn create_material_pipeline(
    device: &wgpu::Device,
    desc: &MaterialPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(desc.depth.state()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: desc.blend.state(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniforms_size() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 144);
        assert_eq!(
            std::mem::size_of::<FrameUniforms>() % 16,
            0,
            "uniform size must be a multiple of 16"
        );
    }

    #[test]
    fn test_frame_bindings_declare_all_fields() {
        for field in ["view_proj", "view:", "viewport", "time"] {
            assert!(FRAME_BINDINGS_WGSL.contains(field), "missing {field}");
        }
        assert!(FRAME_BINDINGS_WGSL.contains("@group(0) @binding(0)"));
    }

    #[test]
    fn test_additive_blend_adds_to_destination() {
        let state = BlendMode::Additive.state().unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert!(BlendMode::Opaque.state().is_none());
    }

    #[test]
    fn test_depth_modes() {
        assert!(DepthMode::TestWrite.state().depth_write_enabled);
        let test_only = DepthMode::TestOnly.state();
        assert!(!test_only.depth_write_enabled);
        assert_eq!(test_only.depth_compare, wgpu::CompareFunction::GreaterEqual);
        assert_eq!(
            DepthMode::Ignore.state().depth_compare,
            wgpu::CompareFunction::Always
        );
    }
}
