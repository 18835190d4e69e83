//! GPU side of the backdrop: one renderer per scene element, composed into
//! [`GpuScene`] which fixes the draw order.
//!
//! Every element binds the shared frame uniforms at group 0. Elements with
//! their own parameters bind one uniform block at group 1.

pub mod background;
pub mod clouds;
pub mod mesh;
pub mod overlay;
pub mod saturn;
pub mod shooting_stars;
pub mod stars;

use bytemuck::{Pod, Zeroable};
use saturn_render::{
    BlendMode, BufferAllocator, Camera, DepthMode, FrameUniforms, MaterialPipelineDesc,
    MeshBuffer, MeshData, ResourceLedger, ShaderLibrary, UniformBlock, create_material_pipeline,
    frame_bind_group_layout, uniform_bind_group_layout,
};

use crate::simulation::SimulationState;

pub use background::BackgroundElement;
pub use clouds::{CloudElement, CloudInstance};
pub use overlay::{OverlayElement, OverlayUniforms};
pub use saturn::SaturnElement;
pub use shooting_stars::{HeadInstance, ShootingStarElement, TrailVertex};
pub use stars::{StarElement, StarInstance};

/// A single model matrix at group 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
}

impl ModelUniforms {
    pub fn new(model: glam::Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// WGSL twin of [`ModelUniforms`], bound as `model_data`.
pub(crate) const MODEL_BINDINGS_WGSL: &str = r#"
struct ModelUniforms {
    model: mat4x4<f32>,
};

@group(1) @binding(0)
var<uniform> model_data: ModelUniforms;
"#;

/// Pipeline parameters of one element.
pub(crate) struct ElementPipeline<'a> {
    pub name: &'a str,
    pub source: &'a str,
    pub element_layout: Option<&'a wgpu::BindGroupLayout>,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub blend: BlendMode,
    pub depth: DepthMode,
}

/// Creates element resources and records every buffer in the ledger.
pub(crate) struct ElementFactory<'a> {
    pub device: &'a wgpu::Device,
    pub shaders: &'a mut ShaderLibrary,
    pub ledger: &'a mut ResourceLedger,
    pub frame_layout: &'a wgpu::BindGroupLayout,
    pub color_format: wgpu::TextureFormat,
}

impl ElementFactory<'_> {
    pub fn uniform<T: Pod>(
        &mut self,
        label: &str,
        value: &T,
    ) -> (wgpu::BindGroupLayout, UniformBlock) {
        let layout = uniform_bind_group_layout(
            self.device,
            &format!("{label}-layout"),
            std::mem::size_of::<T>() as u64,
        );
        let block = UniformBlock::new(self.device, &layout, label, value);
        self.ledger.track_buffer(label, &block.buffer);
        (layout, block)
    }

    /// A second uniform block on an existing layout.
    pub fn uniform_on<T: Pod>(
        &mut self,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        value: &T,
    ) -> UniformBlock {
        let block = UniformBlock::new(self.device, layout, label, value);
        self.ledger.track_buffer(label, &block.buffer);
        block
    }

    pub fn mesh(&mut self, label: &str, data: &MeshData) -> MeshBuffer {
        let mesh = data.upload(&BufferAllocator::new(self.device), label);
        let [vertices, indices] = mesh.buffers();
        self.ledger
            .track_buffer(format!("{label}-vertices"), vertices);
        self.ledger.track_buffer(format!("{label}-indices"), indices);
        mesh
    }

    pub fn vertex_buffer(&mut self, label: &str, data: &[u8]) -> wgpu::Buffer {
        let buffer = BufferAllocator::new(self.device).create_vertex_buffer(label, data);
        self.ledger.track_buffer(label, &buffer);
        buffer
    }

    pub fn dynamic_buffer<T: Pod>(&mut self, label: &str, capacity: usize) -> wgpu::Buffer {
        let buffer = BufferAllocator::new(self.device).create_dynamic_buffer::<T>(label, capacity);
        self.ledger.track_buffer(label, &buffer);
        buffer
    }

    pub fn pipeline(&mut self, desc: ElementPipeline<'_>) -> wgpu::RenderPipeline {
        let shader = self.shaders.element(self.device, desc.name, desc.source);
        let mut layouts = vec![self.frame_layout];
        layouts.extend(desc.element_layout);
        create_material_pipeline(
            self.device,
            &MaterialPipelineDesc {
                label: desc.name,
                shader: &shader,
                bind_group_layouts: &layouts,
                vertex_buffers: desc.vertex_buffers,
                topology: desc.topology,
                blend: desc.blend,
                depth: desc.depth,
                color_format: self.color_format,
            },
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GpuSceneOptions {
    /// Draw the fullscreen nebula overlay after the background.
    pub nebula_overlay: bool,
}

/// All element renderers of the backdrop.
pub struct GpuScene {
    frame: UniformBlock,
    background: BackgroundElement,
    overlay: Option<OverlayElement>,
    clouds: CloudElement,
    shooting_stars: ShootingStarElement,
    saturn: SaturnElement,
    stars: StarElement,
}

impl GpuScene {
    /// Build every element for `state`. Instance buffers are sized from the
    /// state's element counts, which never change afterwards.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        state: &SimulationState,
        options: GpuSceneOptions,
        shaders: &mut ShaderLibrary,
        ledger: &mut ResourceLedger,
    ) -> Self {
        let frame_layout = frame_bind_group_layout(device);
        let frame = UniformBlock::new(
            device,
            &frame_layout,
            "frame-uniforms",
            &FrameUniforms::default(),
        );
        ledger.track_buffer("frame-uniforms", &frame.buffer);

        let mut factory = ElementFactory {
            device,
            shaders,
            ledger,
            frame_layout: &frame_layout,
            color_format,
        };

        let background = BackgroundElement::new(&mut factory);
        let overlay = options
            .nebula_overlay
            .then(|| OverlayElement::new(&mut factory));
        let clouds = CloudElement::new(&mut factory, state.clouds.len());
        let shooting_stars = ShootingStarElement::new(
            &mut factory,
            state.shooting_stars.capacity(),
            state.shooting_stars.trail_capacity(),
        );
        let saturn = SaturnElement::new(&mut factory);
        let stars = StarElement::new(&mut factory, state.stars.stars());

        log::info!(
            "GPU scene ready: {} shaders, {} tracked resources, overlay {}",
            factory.shaders.len(),
            factory.ledger.outstanding(),
            if overlay.is_some() { "on" } else { "off" }
        );

        Self {
            frame,
            background,
            overlay,
            clouds,
            shooting_stars,
            saturn,
            stars,
        }
    }

    /// Upload this frame's state. Call after the simulation step and before
    /// [`GpuScene::draw`].
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        camera: &Camera,
        viewport: [f32; 2],
        state: &SimulationState,
    ) {
        self.frame
            .write(queue, &camera.to_uniforms(viewport, state.time));
        if let Some(overlay) = &self.overlay {
            overlay.update(queue, state.controls.scroll_sparkle, state.time);
        }
        self.clouds.update(queue, state.clouds.clouds());
        self.shooting_stars.update(queue, &state.shooting_stars);
        self.saturn.update(queue, &state.saturn);
        self.stars.update(queue, &state.stars);
    }

    /// Background, overlay, clouds, shooting stars, back ring, planet, front
    /// ring, stars.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(0, &self.frame.bind_group, &[]);

        self.background.render(pass);
        if let Some(overlay) = &self.overlay {
            overlay.render(pass);
        }
        self.clouds.render(pass);
        self.shooting_stars.render(pass);
        self.saturn.render_back_ring(pass);
        self.saturn.render_planet(pass);
        self.saturn.render_front_ring(pass);
        self.stars.render(pass);
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn active_shooting_stars(&self) -> u32 {
        self.shooting_stars.active_count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use saturn_config::{InputConfig, SceneConfig};

    use crate::random::SeededRandom;

    pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    fn small_state() -> SimulationState {
        let scene = SceneConfig {
            star_count: 64,
            ..SceneConfig::default()
        };
        SimulationState::new(
            &scene,
            &InputConfig::default(),
            glam::Vec3::new(0.0, 0.0, 100.0),
            &mut SeededRandom::new(11),
        )
    }

    #[test]
    fn test_model_uniforms_size() {
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 64);
        assert_eq!(
            std::mem::size_of::<ModelUniforms>() % 16,
            0,
            "uniform size must be a multiple of 16"
        );
    }

    #[test]
    fn test_model_bindings_use_group_one() {
        assert!(MODEL_BINDINGS_WGSL.contains("@group(1) @binding(0)"));
        assert!(MODEL_BINDINGS_WGSL.contains("var<uniform> model_data"));
    }

    #[test]
    fn test_scene_tracks_every_buffer() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let state = small_state();
        let mut shaders = ShaderLibrary::new();
        let mut ledger = ResourceLedger::new();
        let mut scene = GpuScene::new(
            &device,
            saturn_render::SCENE_COLOR_FORMAT,
            &state,
            GpuSceneOptions::default(),
            &mut shaders,
            &mut ledger,
        );
        assert!(!scene.has_overlay());
        assert!(ledger.outstanding() > 10);

        scene.update(&queue, &Camera::default(), [640.0, 360.0], &state);
        assert_eq!(scene.active_shooting_stars(), 0);

        let outstanding = ledger.outstanding();
        assert_eq!(ledger.dispose_all(), outstanding);
        assert_eq!(ledger.outstanding(), 0);
    }

    #[test]
    fn test_overlay_adds_one_shader() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let state = small_state();
        let mut without = ShaderLibrary::new();
        let mut with = ShaderLibrary::new();
        let mut ledger = ResourceLedger::new();
        GpuScene::new(
            &device,
            saturn_render::SCENE_COLOR_FORMAT,
            &state,
            GpuSceneOptions::default(),
            &mut without,
            &mut ledger,
        );
        let scene = GpuScene::new(
            &device,
            saturn_render::SCENE_COLOR_FORMAT,
            &state,
            GpuSceneOptions {
                nebula_overlay: true,
            },
            &mut with,
            &mut ledger,
        );
        assert!(scene.has_overlay());
        assert_eq!(with.len(), without.len() + 1);
        ledger.dispose_all();
    }
}
