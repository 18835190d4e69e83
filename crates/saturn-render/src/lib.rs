//! wgpu plumbing for the backdrop: device and surface, offscreen scene
//! target, per-frame encoding, element pipelines and resource disposal.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod ledger;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod surface;
pub mod target;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, MeshData, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, SurfaceOptions, init_render_context_blocking,
};
pub use ledger::ResourceLedger;
pub use pass::{DepthAttachmentConfig, FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{
    BlendMode, DepthMode, FRAME_BINDINGS_WGSL, FrameUniforms, MaterialPipelineDesc, UniformBlock,
    create_material_pipeline, frame_bind_group_layout, uniform_bind_group_layout,
};
pub use shader::{ShaderLibrary, compose};
pub use surface::{
    DEFAULT_MAX_PIXEL_RATIO, MIN_SURFACE_DIMENSION, PhysicalSize, SurfaceWrapper, ViewportResize,
    cap_pixel_ratio,
};
pub use target::{SCENE_COLOR_FORMAT, SceneTarget};
