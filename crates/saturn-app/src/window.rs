//! Window creation and event handling via winit.
//!
//! [`BackdropHost`] implements winit's [`ApplicationHandler`]: it creates the
//! window, mounts the backdrop on it and forwards resize and input events. A
//! backdrop that fails to mount is logged and left out; the window stays open.

use std::sync::Arc;

use saturn_config::Config;
use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::input::{pointer_position, wheel_delta_y};
use crate::lifecycle::Backdrop;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attributes = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}

pub enum HostMode {
    /// No window yet.
    Pending,
    Animated(Backdrop),
    /// Mount failed; the window shows its plain background.
    Fallback,
}

pub struct BackdropHost {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub mode: HostMode,
}

impl BackdropHost {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            mode: HostMode::Pending,
        }
    }

    pub fn backdrop(&self) -> Option<&Backdrop> {
        match &self.mode {
            HostMode::Animated(backdrop) => Some(backdrop),
            _ => None,
        }
    }

    fn backdrop_mut(&mut self) -> Option<&mut Backdrop> {
        match &mut self.mode {
            HostMode::Animated(backdrop) => Some(backdrop),
            _ => None,
        }
    }

    fn mount(&mut self, window: Arc<Window>) {
        self.mode = match Backdrop::mount(window, &self.config) {
            Ok(backdrop) => HostMode::Animated(backdrop),
            Err(e) => {
                error!("Backdrop failed to mount, continuing without it: {e}");
                HostMode::Fallback
            }
        };
    }

    fn teardown(&mut self) {
        if let Some(backdrop) = self.backdrop_mut() {
            backdrop.unmount();
        }
    }
}

impl ApplicationHandler for BackdropHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.mount(window.clone());
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(backdrop) = self.backdrop_mut() {
                    backdrop.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(backdrop) = self.backdrop_mut() {
                    let (x, y) = pointer_position(position);
                    backdrop.on_pointer_moved(x, y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(backdrop) = self.backdrop_mut() {
                    backdrop.on_wheel(wheel_delta_y(delta));
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(backdrop) = self.backdrop_mut() else {
                    return;
                };
                if backdrop.frame().is_some()
                    && let Some(window) = &self.window
                {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Creates an event loop and runs the backdrop until the window is closed.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut host = BackdropHost::new(config);
    event_loop.run_app(&mut host)
}
