// Integration tests for the radial wave deformer and per-frame spin.

use glam::Vec3;
use octa_core::{displace, octahedron, MeshDeformer, Spin, WaveParams};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn literal_vertex_at_time_zero() {
    let deformer = MeshDeformer::new(vec![Vec3::new(50.0, 0.0, 0.0)]);
    let mut live = vec![Vec3::ZERO];
    deformer.update(&mut live, 0.0);

    // d = 50: sin(50 * 1.5) * 5 = sin(75) * 5 = -1.9389...
    let expected = 50.0 + (75.0_f64.sin() * 5.0) as f32;
    assert!(approx(live[0].x, expected, 1e-4));
    assert!(approx(live[0].x, 48.061, 1e-3));
    assert_eq!(live[0].y, 0.0);
    assert_eq!(live[0].z, 0.0);
}

#[test]
fn displaced_points_stay_on_their_ray_at_wave_distance() {
    let rest = vec![
        Vec3::new(50.0, 0.0, 0.0),
        Vec3::new(0.0, -50.0, 0.0),
        Vec3::new(3.0, 4.0, 12.0),
        Vec3::new(-7.5, 2.25, 31.0),
        Vec3::new(0.001, 0.0, -0.002),
    ];
    let deformer = MeshDeformer::new(rest.clone());
    let mut live = vec![Vec3::ZERO; rest.len()];

    for &time_ms in &[0.0, 16.7, 1234.5, 98_765.0] {
        deformer.update(&mut live, time_ms);
        let t = time_ms * 0.001;
        for (o, p) in rest.iter().zip(&live) {
            let d = o.length() as f64;
            let expected = (d + (d * 1.5 - t * 2.0).sin() * 5.0) as f32;
            // distance may go negative for tiny radii; the point then sits on the opposite ray
            let signed = if p.dot(*o) >= 0.0 { p.length() } else { -p.length() };
            assert!(
                approx(signed, expected, 1e-3),
                "t={time_ms} rest={o:?} got {signed} expected {expected}"
            );
            let cross = o.normalize().cross(*p).length();
            assert!(cross < 1e-3, "not collinear: rest={o:?} live={p:?}");
        }
    }
}

#[test]
fn update_is_deterministic_bit_for_bit() {
    let mesh = octahedron(50.0, 2);
    let deformer = MeshDeformer::new(mesh.positions.clone());
    let mut a = vec![Vec3::ZERO; mesh.positions.len()];
    let mut b = vec![Vec3::ZERO; mesh.positions.len()];
    deformer.update(&mut a, 4321.25);
    deformer.update(&mut b, 4321.25);
    let bits = |v: &[Vec3]| {
        v.iter()
            .flat_map(|p| p.to_array().map(f32::to_bits))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn output_does_not_depend_on_previous_frames() {
    let mesh = octahedron(50.0, 0);
    let deformer = MeshDeformer::new(mesh.positions.clone());

    let mut fresh = vec![Vec3::ZERO; mesh.positions.len()];
    deformer.update(&mut fresh, 500.0);

    let mut warmed = mesh.positions.clone();
    for i in 0..100 {
        deformer.update(&mut warmed, i as f64 * 16.0);
    }
    deformer.update(&mut warmed, 500.0);
    assert_eq!(fresh, warmed);
}

#[test]
fn rest_buffer_is_never_modified() {
    let mesh = octahedron(50.0, 1);
    let deformer = MeshDeformer::new(mesh.positions.clone());
    let mut live = mesh.positions.clone();
    for i in 0..50 {
        deformer.update(&mut live, i as f64 * 33.3);
    }
    assert_eq!(deformer.rest(), mesh.positions.as_slice());
}

#[test]
fn vertex_at_origin_is_left_in_place() {
    let deformer = MeshDeformer::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0)]);
    let mut live = vec![Vec3::splat(9.0); 2];
    deformer.update(&mut live, 1000.0);
    assert_eq!(live[0], Vec3::ZERO);
    assert!(live[0].is_finite());
    assert!(live[1].is_finite());
}

#[test]
fn shorter_live_buffer_only_writes_common_prefix() {
    let deformer = MeshDeformer::new(vec![Vec3::X * 10.0, Vec3::Y * 10.0, Vec3::Z * 10.0]);
    let mut live = vec![Vec3::ZERO; 2];
    deformer.update(&mut live, 0.0);
    assert!(live.iter().all(|p| p.length() > 0.0));
}

#[test]
fn custom_wave_parameters_are_honoured() {
    let wave = WaveParams {
        frequency: 0.0,
        speed: 0.0,
        amplitude: 3.0,
    };
    // sin(0) = 0 -> no displacement regardless of amplitude
    let p = displace(Vec3::new(10.0, 0.0, 0.0), 12.0, &wave);
    assert_eq!(p, Vec3::new(10.0, 0.0, 0.0));

    let wave = WaveParams {
        frequency: 0.0,
        speed: -std::f64::consts::FRAC_PI_2,
        amplitude: 3.0,
    };
    // sin(pi/2) = 1 at t = 1s -> pushed out by the full amplitude
    let p = displace(Vec3::new(10.0, 0.0, 0.0), 1.0, &wave);
    assert!(approx(p.x, 13.0, 1e-5));
}

#[test]
fn spin_accumulates_fixed_increments_per_frame() {
    let mut spin = Spin::default();
    for _ in 0..100 {
        spin.advance();
    }
    assert!(approx(spin.y, 1.0, 1e-4));
    assert!(approx(spin.x, 0.5, 1e-4));
}

#[test]
fn spin_model_matrix_is_a_rotation() {
    let mut spin = Spin::default();
    for _ in 0..37 {
        spin.advance();
    }
    let m = spin.model_matrix();
    let v = Vec3::new(3.0, -4.0, 12.0);
    let r = m.transform_vector3(v);
    assert!(approx(r.length(), v.length(), 1e-4));
    assert!(approx(m.determinant(), 1.0, 1e-5));
}
