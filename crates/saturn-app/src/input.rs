//! winit input translated into backdrop control signals.

use winit::dpi::PhysicalPosition;
use winit::event::MouseScrollDelta;

/// Pixels per wheel line, for devices that report lines.
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Vertical wheel movement in pixels, positive when scrolling down.
///
/// winit reports positive `y` for scrolling up on both variants.
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_x, y) => -y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

/// Cursor position in surface pixels.
pub fn pointer_position(position: PhysicalPosition<f64>) -> (f32, f32) {
    (position.x as f32, position.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scroll_up_is_negative() {
        let delta = wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 5.0));
        assert_eq!(delta, -500.0);
    }

    #[test]
    fn test_pixel_scroll_down_is_positive() {
        let delta = wheel_delta_y(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -42.0)));
        assert_eq!(delta, 42.0);
    }

    #[test]
    fn test_pointer_position_passthrough() {
        assert_eq!(
            pointer_position(PhysicalPosition::new(12.5, 300.0)),
            (12.5, 300.0)
        );
    }
}
