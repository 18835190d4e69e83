//! Viewport bookkeeping between the window and the offscreen scene target.
//!
//! The window surface always matches the window's physical size. The scene is
//! rendered at `logical size × pixel ratio`, where the pixel ratio is the
//! device scale factor sampled once at creation and capped, then scaled up
//! onto the surface.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Default cap applied to the device pixel ratio.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 1.5;

/// Physical pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Emitted when either the window surface or the scene target must be resized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportResize {
    /// New window surface size.
    pub surface: PhysicalSize,
    /// New scene target size.
    pub render: PhysicalSize,
}

/// `min(device_ratio, max)`, falling back to 1 for non-positive or non-finite input.
pub fn cap_pixel_ratio(device_ratio: f64, max: f64) -> f64 {
    if !device_ratio.is_finite() || device_ratio <= 0.0 {
        return 1.0;
    }
    device_ratio.min(max)
}

/// Window size, scale factor and the fixed render pixel ratio.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    pixel_ratio: f64,
    configured: bool,
}

impl SurfaceWrapper {
    /// `scale_factor` is the device pixel ratio at mount; it is capped at
    /// `max_pixel_ratio` and never re-sampled.
    pub fn new(
        physical_width: u32,
        physical_height: u32,
        scale_factor: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        let has_valid_size = physical_width > 0 && physical_height > 0;
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            pixel_ratio: cap_pixel_ratio(scale_factor, max_pixel_ratio),
            configured: has_valid_size,
        }
    }

    /// Handle a window resize in physical pixels. `None` when nothing changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<ViewportResize> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;

        Some(ViewportResize {
            surface: self.physical_size(),
            render: self.render_size(),
        })
    }

    /// Window surface size in physical pixels.
    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn logical_width(&self) -> f64 {
        self.physical_width as f64 / self.scale_factor
    }

    pub fn logical_height(&self) -> f64 {
        self.physical_height as f64 / self.scale_factor
    }

    /// Scene target size: logical size times the capped pixel ratio.
    pub fn render_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: ((self.logical_width() * self.pixel_ratio).round() as u32)
                .max(MIN_SURFACE_DIMENSION),
            height: ((self.logical_height() * self.pixel_ratio).round() as u32)
                .max(MIN_SURFACE_DIMENSION),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Whether a non-zero size has been seen.
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}
