// Web host tuning: element ids and per-canvas clear values.

pub const SCENE_CANVAS_ID: &str = "scene-canvas";
pub const OVERLAY_CANVAS_ID: &str = "overlay-canvas";

// The overlay canvas starts every frame fully transparent
pub const OVERLAY_CLEAR_RGBA: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

// Smallest backing store we hand to a surface (zero-sized surfaces are invalid)
pub const MIN_CANVAS_PX: u32 = 1;
