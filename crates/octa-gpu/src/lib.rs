//! wgpu renderers for the deforming mesh and the overlay pass.
//!
//! Both renderers draw into a caller-provided `TextureView` so the same code
//! serves the web host (one canvas per pass) and the native host (one
//! window surface shared by both passes).

mod helpers;
pub mod overlay;
pub mod scene;

pub use helpers::{
    acquire_frame, background_color, surface_formats, SurfaceFormats, DEPTH_FORMAT,
    SCENE_SAMPLE_COUNT,
};
pub use overlay::OverlayRenderer;
pub use scene::SceneRenderer;
