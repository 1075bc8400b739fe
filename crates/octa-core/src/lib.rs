pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod deform;
pub mod driver;
pub mod geometry;
pub mod overlay;
pub mod pattern;

pub use camera::*;
pub use clock::Clock;
pub use config::*;
pub use deform::*;
pub use driver::*;
pub use geometry::*;
pub use overlay::{OverlayError, OverlayProgram, Stage, UniformBlock};

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static OVERLAY_VERT_WGSL: &str = include_str!("../shaders/overlay_vert.wgsl");
pub static OVERLAY_FRAG_WGSL: &str = include_str!("../shaders/overlay_frag.wgsl");
