use crate::constants::{
    MS_TO_SECONDS, SPIN_X_PER_FRAME, SPIN_Y_PER_FRAME, WAVE_AMPLITUDE, WAVE_FREQUENCY, WAVE_SPEED,
};
use glam::{Mat4, Vec3};
use std::cell::Cell;

/// Radial sine wave parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub frequency: f64,
    pub speed: f64,
    pub amplitude: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: WAVE_FREQUENCY,
            speed: WAVE_SPEED,
            amplitude: WAVE_AMPLITUDE,
        }
    }
}

impl WaveParams {
    /// Signed displacement along the radial direction for a point at
    /// `distance` from the origin, `time_sec` seconds into the animation.
    #[inline]
    pub fn displacement(&self, distance: f64, time_sec: f64) -> f64 {
        (distance * self.frequency - time_sec * self.speed).sin() * self.amplitude
    }
}

/// Holds the rest pose of a mesh and rewrites a live buffer from it.
///
/// Every output point depends only on its rest point and the clock, so a
/// frame never inherits anything from the previous one.
#[derive(Clone, Debug)]
pub struct MeshDeformer {
    rest: Vec<Vec3>,
    wave: WaveParams,
    warned_len_mismatch: Cell<bool>,
}

impl MeshDeformer {
    pub fn new(rest: Vec<Vec3>) -> Self {
        Self::with_wave(rest, WaveParams::default())
    }

    pub fn with_wave(rest: Vec<Vec3>, wave: WaveParams) -> Self {
        Self {
            rest,
            wave,
            warned_len_mismatch: Cell::new(false),
        }
    }

    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn wave(&self) -> WaveParams {
        self.wave
    }

    /// Write the displaced positions for `time_ms` into `live`.
    ///
    /// Only the common prefix is written when the lengths disagree.
    pub fn update(&self, live: &mut [Vec3], time_ms: f64) {
        if live.len() != self.rest.len() && !self.warned_len_mismatch.replace(true) {
            log::warn!(
                "[deform] live buffer has {} vertices, rest buffer has {}",
                live.len(),
                self.rest.len()
            );
        }
        let time_sec = time_ms * MS_TO_SECONDS;
        for (out, &rest) in live.iter_mut().zip(&self.rest) {
            *out = displace(rest, time_sec, &self.wave);
        }
    }
}

/// Move `rest` along its direction from the origin by the wave displacement.
/// A point at the origin has no direction and is returned unchanged.
#[inline]
pub fn displace(rest: Vec3, time_sec: f64, wave: &WaveParams) -> Vec3 {
    let (ox, oy, oz) = (rest.x as f64, rest.y as f64, rest.z as f64);
    let distance = (ox * ox + oy * oy + oz * oz).sqrt();
    if distance == 0.0 {
        return rest;
    }
    let disp = wave.displacement(distance, time_sec);
    let scale = disp / distance;
    Vec3::new(
        (ox + ox * scale) as f32,
        (oy + oy * scale) as f32,
        (oz + oz * scale) as f32,
    )
}

/// Rotation state carried from frame to frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub x: f32,
    pub y: f32,
}

impl Spin {
    pub fn advance(&mut self) {
        self.y += SPIN_Y_PER_FRAME;
        self.x += SPIN_X_PER_FRAME;
    }

    /// Model matrix for Euler order XYZ (no Z rotation).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.x) * Mat4::from_rotation_y(self.y)
    }
}
