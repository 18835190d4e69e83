//! Mount and teardown of the backdrop, and the bridge from host events into it.
//!
//! A [`Backdrop`] owns the simulation, the loop controller and, when mounted
//! on a window, every GPU resource. Teardown stops the loop before anything is
//! released and runs at most once.

use std::sync::Arc;

use glam::Vec3;
use saturn_config::Config;
use saturn_render::{
    Camera, FrameEncoder, RenderContext, RenderContextError, RenderPassBuilder, ResourceLedger,
    SCENE_COLOR_FORMAT, SceneTarget, ShaderLibrary, SurfaceError, SurfaceOptions, SurfaceWrapper,
    init_render_context_blocking,
};
use saturn_scene::{
    FrameSink, GpuScene, GpuSceneOptions, NullSink, RandomSource, SimulationState, StepReport,
    random_source,
};
use tracing::{debug, info, instrument, warn};
use winit::window::Window;

use crate::render_loop::RenderLoop;

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),
}

/// GPU half of a mounted backdrop.
struct GpuBackdrop {
    context: RenderContext,
    target: SceneTarget,
    scene: GpuScene,
    shaders: ShaderLibrary,
    clear_color: wgpu::Color,
}

impl GpuBackdrop {
    fn new(
        context: RenderContext,
        config: &Config,
        sim: &SimulationState,
        viewport: &SurfaceWrapper,
        ledger: &mut ResourceLedger,
    ) -> Self {
        let render = viewport.render_size();
        let target = SceneTarget::new(
            &context.device,
            context.surface_format,
            render.width,
            render.height,
        );
        let mut shaders = ShaderLibrary::new();
        let scene = GpuScene::new(
            &context.device,
            SCENE_COLOR_FORMAT,
            sim,
            GpuSceneOptions {
                nebula_overlay: config.scene.nebula_overlay,
            },
            &mut shaders,
            ledger,
        );
        let [r, g, b] = config.render.clear_color;

        Self {
            context,
            target,
            scene,
            shaders,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        }
    }

    fn release(self) {
        self.target.destroy();
        let mut shaders = self.shaders;
        shaders.clear();
    }
}

/// Draws one frame of the scene into the target, then onto the window.
struct SceneSink<'a> {
    gpu: &'a mut GpuBackdrop,
    camera: &'a Camera,
}

impl FrameSink for SceneSink<'_> {
    fn draw(&mut self, state: &SimulationState) {
        let gpu = &mut *self.gpu;
        let (width, height) = gpu.target.size();
        gpu.scene.update(
            &gpu.context.queue,
            self.camera,
            [width as f32, height as f32],
            state,
        );

        let surface_texture = match gpu.context.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                debug!("Surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                return;
            }
        };

        let mut frame = FrameEncoder::new(
            &gpu.context.device,
            gpu.context.queue.clone(),
            surface_texture,
        );

        let scene_pass = RenderPassBuilder::new()
            .clear_color(gpu.clear_color)
            .depth(gpu.target.depth_view().clone())
            .label("scene-pass");
        if let Some(mut pass) = frame.begin_offscreen_pass(&scene_pass, gpu.target.color_view()) {
            gpu.scene.draw(&mut pass);
        }

        let blit_pass = RenderPassBuilder::new().label("blit-pass");
        if let Some(mut pass) = frame.begin_surface_pass(&blit_pass) {
            gpu.target.blit(&mut pass);
        }

        frame.submit();
    }
}

pub struct Backdrop {
    sim: SimulationState,
    rng: Box<dyn RandomSource>,
    render_loop: RenderLoop,
    viewport: SurfaceWrapper,
    camera: Camera,
    gpu: Option<GpuBackdrop>,
    ledger: ResourceLedger,
    torn_down: bool,
}

impl Backdrop {
    /// Mount on `window`, filling its whole surface, and start the loop.
    #[instrument(skip_all)]
    pub fn mount(window: Arc<Window>, config: &Config) -> Result<Self, MountError> {
        let size = window.inner_size();
        let viewport = SurfaceWrapper::new(
            size.width,
            size.height,
            window.scale_factor(),
            config.render.max_pixel_ratio,
        );
        let context = init_render_context_blocking(
            window,
            SurfaceOptions {
                vsync: config.window.vsync,
            },
        )?;

        let mut backdrop = Self::build(config, viewport);
        let gpu = GpuBackdrop::new(
            context,
            config,
            &backdrop.sim,
            &backdrop.viewport,
            &mut backdrop.ledger,
        );
        backdrop.gpu = Some(gpu);
        backdrop.render_loop.start();

        let render = backdrop.viewport.render_size();
        info!(
            "Backdrop mounted at {}x{} (pixel ratio {:.2}, {} GPU resources)",
            render.width,
            render.height,
            backdrop.viewport.pixel_ratio(),
            backdrop.ledger.outstanding()
        );
        Ok(backdrop)
    }

    /// A running backdrop with no surface; frames step the simulation and draw nothing.
    pub fn headless(config: &Config, width: u32, height: u32, scale_factor: f64) -> Self {
        let viewport =
            SurfaceWrapper::new(width, height, scale_factor, config.render.max_pixel_ratio);
        let mut backdrop = Self::build(config, viewport);
        backdrop.render_loop.start();
        backdrop
    }

    fn build(config: &Config, viewport: SurfaceWrapper) -> Self {
        let render = viewport.render_size();
        let mut camera = Camera::new(
            config.render.fov_y_degrees,
            config.render.near,
            config.render.far,
            config.render.camera_z,
        );
        camera.set_aspect_ratio(render.width as f32, render.height as f32);

        let mut rng = random_source(config.scene.seed);
        let sim = SimulationState::new(
            &config.scene,
            &config.input,
            Vec3::new(0.0, 0.0, config.render.camera_z),
            rng.as_mut(),
        );

        Self {
            sim,
            rng,
            render_loop: RenderLoop::new(),
            viewport,
            camera,
            gpu: None,
            ledger: ResourceLedger::new(),
            torn_down: false,
        }
    }

    /// One display frame at wall-clock pace.
    pub fn frame(&mut self) -> Option<StepReport> {
        match self.gpu.as_mut() {
            Some(gpu) => {
                let mut sink = SceneSink {
                    gpu,
                    camera: &self.camera,
                };
                self.render_loop
                    .frame(&mut self.sim, self.rng.as_mut(), &mut sink)
            }
            None => self
                .render_loop
                .frame(&mut self.sim, self.rng.as_mut(), &mut NullSink),
        }
    }

    /// One frame with an explicit frame time in seconds.
    pub fn frame_with_delta(&mut self, delta: f32) -> Option<StepReport> {
        match self.gpu.as_mut() {
            Some(gpu) => {
                let mut sink = SceneSink {
                    gpu,
                    camera: &self.camera,
                };
                self.render_loop
                    .frame_with_delta(delta, &mut self.sim, self.rng.as_mut(), &mut sink)
            }
            None => self.render_loop.frame_with_delta(
                delta,
                &mut self.sim,
                self.rng.as_mut(),
                &mut NullSink,
            ),
        }
    }

    /// Window resized to `width × height` physical pixels. Ignored once
    /// teardown has begun.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.torn_down {
            debug!("Resize to {width}x{height} after teardown ignored");
            return false;
        }
        let Some(resize) = self.viewport.handle_resize(width, height) else {
            return false;
        };

        self.camera
            .set_aspect_ratio(resize.render.width as f32, resize.render.height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.context
                .resize(resize.surface.width, resize.surface.height);
            gpu.target.resize(
                &gpu.context.device,
                resize.render.width,
                resize.render.height,
            );
        }
        info!(
            "Backdrop resized to {}x{} (render {}x{})",
            resize.surface.width, resize.surface.height, resize.render.width, resize.render.height
        );
        true
    }

    /// Wheel moved by `delta_y` pixels, positive scrolling down.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if self.torn_down {
            return;
        }
        self.sim.controls.on_wheel(delta_y);
    }

    /// Pointer at `(x, y)` surface pixels.
    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        if self.torn_down {
            return;
        }
        let size = self.viewport.physical_size();
        self.sim
            .controls
            .on_pointer_moved(x, y, size.width as f32, size.height as f32);
    }

    /// Stop the loop and release every resource. Safe to call any number of
    /// times; returns how many ledger entries this call released.
    #[instrument(skip_all)]
    pub fn unmount(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.render_loop.stop();

        let released = self.ledger.dispose_all();
        if let Some(gpu) = self.gpu.take() {
            gpu.release();
        }
        info!("Backdrop unmounted, released {released} GPU resources");
        released
    }

    pub fn state(&self) -> &SimulationState {
        &self.sim
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> &SurfaceWrapper {
        &self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        !self.torn_down
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    /// GPU resources recorded but not yet released.
    pub fn outstanding_resources(&self) -> usize {
        self.ledger.outstanding()
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::LoopState;
    use std::sync::Mutex;
    use saturn_scene::shooting_star::LIFE_DECAY_RATE;
    use saturn_scene::starfield::{FAR_BOUND, FORWARD_BOUND};

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.scene.seed = Some(seed);
        config
    }

    /// Record one entry per label whose release appends the label to the log.
    fn record_releases(
        backdrop: &mut Backdrop,
        labels: &[&'static str],
    ) -> Arc<Mutex<Vec<&'static str>>> {
        let released = Arc::new(Mutex::new(Vec::new()));
        for &label in labels {
            let released = released.clone();
            backdrop
                .ledger
                .record(label, move || released.lock().unwrap().push(label));
        }
        released
    }

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
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

    #[test]
    fn test_wheel_scenario() {
        let mut backdrop = Backdrop::headless(&seeded_config(1), 1280, 720, 1.0);
        backdrop.on_wheel(-500.0);
        assert!((backdrop.state().controls.speed - 1.5).abs() < 1e-6);
        assert_eq!(backdrop.state().controls.scroll_sparkle, 1.0);
    }

    #[test]
    fn test_hundred_frame_scenario() {
        let mut backdrop = Backdrop::headless(&seeded_config(2), 1280, 720, 2.0);
        let released = record_releases(&mut backdrop, &["stars", "clouds", "planet"]);
        for _ in 0..100 {
            assert!(backdrop.frame_with_delta(1.0 / 60.0).is_some());
        }

        let state = backdrop.state();
        assert_eq!(state.frame, 100);
        assert!(
            state
                .stars
                .positions()
                .all(|p| p.z > FAR_BOUND && p.z <= FORWARD_BOUND)
        );
        assert_eq!(state.controls.speed, 1.0);
        assert_eq!(state.controls.scroll_sparkle, 0.0);
        for star in state.shooting_stars.active() {
            assert!(star.age() <= 1.0 / LIFE_DECAY_RATE);
        }

        assert_eq!(backdrop.outstanding_resources(), 3);
        assert!(released.lock().unwrap().is_empty(), "frames release nothing");

        assert_eq!(backdrop.unmount(), 3);
        assert_eq!(backdrop.outstanding_resources(), 0);
        assert_eq!(*released.lock().unwrap(), vec!["planet", "clouds", "stars"]);
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut backdrop = Backdrop::headless(&seeded_config(3), 800, 600, 1.0);
        let released = record_releases(&mut backdrop, &["frame-uniforms", "ring"]);
        assert_eq!(backdrop.outstanding_resources(), 2);

        assert_eq!(backdrop.unmount(), 2);
        assert_eq!(backdrop.unmount(), 0);
        assert_eq!(backdrop.outstanding_resources(), 0);
        assert_eq!(released.lock().unwrap().len(), 2, "each release runs once");
        assert!(!backdrop.is_mounted());
        assert_eq!(backdrop.render_loop().state(), LoopState::Stopped);

        drop(backdrop);
        assert_eq!(released.lock().unwrap().len(), 2, "drop after unmount releases nothing");
    }

    #[test]
    fn test_drop_unmounts() {
        let mut backdrop = Backdrop::headless(&seeded_config(11), 800, 600, 1.0);
        let released = record_releases(&mut backdrop, &["background"]);
        drop(backdrop);
        assert_eq!(*released.lock().unwrap(), vec!["background"]);
    }

    #[test]
    fn test_unmount_releases_gpu_scene() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mut config = seeded_config(12);
        config.scene.star_count = 64;
        let mut backdrop = Backdrop::headless(&config, 640, 480, 1.0);
        let mut shaders = ShaderLibrary::new();
        let _scene = GpuScene::new(
            &device,
            SCENE_COLOR_FORMAT,
            &backdrop.sim,
            GpuSceneOptions {
                nebula_overlay: true,
            },
            &mut shaders,
            &mut backdrop.ledger,
        );
        let outstanding = backdrop.outstanding_resources();
        assert!(outstanding > 0);

        assert_eq!(backdrop.unmount(), outstanding);
        assert_eq!(backdrop.outstanding_resources(), 0);
        assert_eq!(backdrop.unmount(), 0);
    }

    #[test]
    fn test_no_frames_after_unmount() {
        let mut backdrop = Backdrop::headless(&seeded_config(4), 800, 600, 1.0);
        backdrop.frame_with_delta(0.016);
        backdrop.unmount();
        assert!(backdrop.frame_with_delta(0.016).is_none());
        assert!(backdrop.frame().is_none());
        assert_eq!(backdrop.state().frame, 1);
    }

    #[test]
    fn test_unmount_before_first_frame() {
        let mut backdrop = Backdrop::headless(&seeded_config(5), 800, 600, 1.0);
        let released = record_releases(&mut backdrop, &["shooting-star-trails"]);
        assert_eq!(backdrop.unmount(), 1);
        assert_eq!(backdrop.state().frame, 0);
        assert_eq!(backdrop.outstanding_resources(), 0);
        assert_eq!(*released.lock().unwrap(), vec!["shooting-star-trails"]);
    }

    #[test]
    fn test_resize_after_teardown_ignored() {
        let mut backdrop = Backdrop::headless(&seeded_config(6), 800, 600, 1.0);
        backdrop.unmount();
        assert!(!backdrop.resize(1920, 1080));
        assert_eq!(backdrop.viewport().physical_size().width, 800);
    }

    #[test]
    fn test_resize_updates_aspect_and_render_size() {
        let mut backdrop = Backdrop::headless(&seeded_config(7), 800, 600, 2.0);
        assert!(backdrop.resize(1600, 800));
        assert!((backdrop.camera().aspect_ratio - 2.0).abs() < 1e-6);
        let render = backdrop.viewport().render_size();
        // 800x400 logical at the 1.5 cap.
        assert_eq!((render.width, render.height), (1200, 600));
        assert!(!backdrop.resize(1600, 800), "unchanged size is a no-op");
    }

    #[test]
    fn test_input_after_teardown_ignored() {
        let mut backdrop = Backdrop::headless(&seeded_config(8), 800, 600, 1.0);
        backdrop.unmount();
        backdrop.on_wheel(-500.0);
        backdrop.on_pointer_moved(400.0, 300.0);
        assert_eq!(backdrop.state().controls.speed, 1.0);
        assert_eq!(backdrop.state().controls.scroll_sparkle, 0.0);
    }

    #[test]
    fn test_pointer_is_normalized() {
        let mut backdrop = Backdrop::headless(&seeded_config(9), 800, 600, 1.0);
        backdrop.on_pointer_moved(800.0, 0.0);
        let pointer = backdrop.state().controls.pointer;
        assert!((pointer.x - 1.0).abs() < 1e-6);
        assert!((pointer.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_headless_has_no_gpu() {
        let backdrop = Backdrop::headless(&seeded_config(10), 640, 480, 1.0);
        assert!(!backdrop.has_gpu());
        assert!(backdrop.render_loop().is_running());
    }
}
