//! CPU mirror of the overlay fragment program.
//!
//! Keeps the shader's math in one testable place; `overlay_frag.wgsl`
//! computes exactly these expressions per pixel.

use crate::constants::{
    EDGE_SOFTNESS, OVERLAY_MAX_ALPHA, PETAL_LOBES, PETAL_SPEED, RING_BAND, RING_FREQUENCY,
    RING_SPEED,
};

/// Hermite step, matching GLSL/WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pattern intensity in polar coordinates: `angle` in radians, `radius` in
/// aspect-corrected NDC units, `time_sec` in seconds.
#[inline]
pub fn intensity_polar(angle: f32, radius: f32, time_sec: f32) -> f32 {
    let petals = (angle * PETAL_LOBES + time_sec * PETAL_SPEED).cos() * 0.5 + 0.5;
    let band = (radius * RING_FREQUENCY - time_sec * RING_SPEED).sin().abs() * RING_BAND;
    smoothstep(band, band + EDGE_SOFTNESS, petals)
}

/// Map a pixel coordinate (bottom-left origin) to aspect-corrected NDC.
#[inline]
pub fn pixel_to_ndc(frag: [f32; 2], resolution: [f32; 2]) -> [f32; 2] {
    let x = frag[0] / resolution[0] * 2.0 - 1.0;
    let y = frag[1] / resolution[1] * 2.0 - 1.0;
    [x * (resolution[0] / resolution[1]), y]
}

/// RGBA written by the overlay for one pixel.
pub fn shade(frag: [f32; 2], resolution: [f32; 2], time_sec: f32) -> [f32; 4] {
    let [x, y] = pixel_to_ndc(frag, resolution);
    let c = intensity_polar(y.atan2(x), (x * x + y * y).sqrt(), time_sec);
    [c, c, c, c * OVERLAY_MAX_ALPHA]
}
