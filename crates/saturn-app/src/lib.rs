//! Saturn backdrop application: render loop controller, mount and teardown,
//! and the winit host that drives them.

pub mod input;
pub mod lifecycle;
pub mod render_loop;
pub mod window;

pub use lifecycle::{Backdrop, MountError};
pub use render_loop::{LoopState, MAX_FRAME_TIME, RenderLoop};
pub use window::{BackdropHost, HostMode, run};
