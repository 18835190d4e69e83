//! Fixed perspective camera of the backdrop.

use glam::{Mat4, Vec3};

use crate::pipeline::FrameUniforms;

/// Perspective camera looking down −Z. Projection uses reverse-Z.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Camera at `(0, 0, z)` with the given vertical field of view in degrees.
    pub fn new(fov_y_degrees: f32, near: f32, far: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, z),
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near,
            far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    /// Reverse-Z: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio; zero heights are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Per-frame uniforms for a target of `viewport` pixels at elapsed `time`.
    pub fn to_uniforms(&self, viewport: [f32; 2], time: f32) -> FrameUniforms {
        FrameUniforms {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            view: self.view_matrix().to_cols_array_2d(),
            viewport,
            time,
            _padding: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(75.0, 0.1, 10_000.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ndc(camera: &Camera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_default_camera_matches_backdrop_setup() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 100.0));
        assert!((camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 10_000.0);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let p = ndc(&Camera::default(), Vec3::ZERO);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&p.z));
    }

    #[test]
    fn test_reverse_z_orders_depth() {
        let camera = Camera::default();
        let near = ndc(&camera, Vec3::new(0.0, 0.0, 50.0));
        let far = ndc(&camera, Vec3::new(0.0, 0.0, -3000.0));
        assert!(
            near.z > far.z,
            "closer points must have larger depth: {} vs {}",
            near.z,
            far.z
        );
    }

    #[test]
    fn test_points_behind_viewer_have_negative_w() {
        let camera = Camera::default();
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 150.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn test_set_aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(1920.0, 0.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniforms_carry_viewport_and_time() {
        let uniforms = Camera::default().to_uniforms([800.0, 600.0], 2.5);
        assert_eq!(uniforms.viewport, [800.0, 600.0]);
        assert_eq!(uniforms.time, 2.5);
    }
}
