use octa_core::constants::*;
use octa_core::VisualConfig;

#[test]
#[allow(clippy::assertions_on_constants)]
fn wave_never_turns_the_mesh_inside_out() {
    // Amplitude must stay below the radius or vertices cross the origin.
    assert!(WAVE_AMPLITUDE > 0.0);
    assert!(WAVE_AMPLITUDE < OCTAHEDRON_RADIUS as f64);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_sees_the_whole_mesh() {
    let reach = OCTAHEDRON_RADIUS + WAVE_AMPLITUDE as f32;
    assert!(CAMERA_NEAR > 0.0 && CAMERA_NEAR < CAMERA_FAR);
    assert!(CAMERA_EYE[2] - reach > CAMERA_NEAR);
    assert!(CAMERA_EYE[2] + reach < CAMERA_FAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn overlay_stays_semi_transparent() {
    assert!(OVERLAY_MAX_ALPHA > 0.0 && OVERLAY_MAX_ALPHA <= 0.5);
    assert!(EDGE_SOFTNESS > 0.0);
}

#[test]
fn quad_covers_clip_space() {
    assert_eq!(QUAD_VERTICES.len(), 6);
    for corner in [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]] {
        assert!(QUAD_VERTICES.contains(&corner));
    }
}

#[test]
fn default_config_uses_stock_values() {
    let c = VisualConfig::default();
    assert_eq!(c.radius, 50.0);
    assert_eq!(c.detail, 0);
    assert_eq!(c.wave.frequency, 1.5);
    assert_eq!(c.wave.speed, 2.0);
    assert_eq!(c.wave.amplitude, 5.0);
    assert_eq!(c.style.material.metalness, 0.5);
    assert_eq!(c.style.material.roughness, 0.2);
    assert_eq!(c.style.background_rgb, [1.0, 1.0, 1.0]);
    let l = c.style.lights.direction_to_light();
    assert!((l.length() - 1.0).abs() < 1e-6);
    assert!(l.y > l.x && l.x == l.z);
}
