use octa_core::overlay::{compile_stage, OverlayError, OverlayProgram, Stage};
use octa_core::{Viewport, OVERLAY_FRAG_WGSL, OVERLAY_VERT_WGSL};

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn bundled_program_builds_and_resolves_locations() {
    let program = OverlayProgram::standard().expect("bundled shaders must link");
    assert_eq!(program.position_location, 0);
    assert_eq!(program.vertex.entry_point, "vs_main");
    assert_eq!(program.fragment.entry_point, "fs_main");

    let block = program.uniforms.expect("uniform block");
    assert_eq!(block.binding, 0);
    assert_eq!(block.size, 16);
    assert_eq!(block.time_offset, Some(0));
    assert_eq!(block.resolution_offset, Some(8));
}

#[test]
fn uniforms_are_packed_at_reflected_offsets() {
    let program = OverlayProgram::standard().unwrap();
    let bytes = program.encode_uniforms(2500.0, Viewport::new(1280, 720));
    assert_eq!(bytes.len(), 16);
    assert_eq!(read_f32(&bytes, 0), 2.5);
    assert_eq!(read_f32(&bytes, 8), 1280.0);
    assert_eq!(read_f32(&bytes, 12), 720.0);
}

#[test]
fn syntax_error_is_a_compile_error_with_diagnostic() {
    let broken = "@fragment fn fs_main( -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
    let err = OverlayProgram::build(OVERLAY_VERT_WGSL, broken).unwrap_err();
    match err {
        OverlayError::ShaderCompile { stage, diagnostic } => {
            assert_eq!(stage, Stage::Fragment);
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected compile error, got {other:?}"),
    }
}

#[test]
fn type_error_in_vertex_stage_is_reported_for_that_stage() {
    let broken = r#"
@vertex
fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(a_position, 0.0, 1.0);
}
"#;
    let err = OverlayProgram::build(broken, OVERLAY_FRAG_WGSL).unwrap_err();
    assert!(matches!(
        err,
        OverlayError::ShaderCompile {
            stage: Stage::Vertex,
            ..
        }
    ));
}

#[test]
fn missing_entry_point_is_a_compile_error() {
    // Valid WGSL, but it only has a vertex entry point.
    let err = compile_stage(OVERLAY_VERT_WGSL, Stage::Fragment).unwrap_err();
    assert!(matches!(
        err,
        OverlayError::ShaderCompile {
            stage: Stage::Fragment,
            ..
        }
    ));
}

#[test]
fn unmatched_varying_fails_to_link() {
    let vs = r#"
@vertex
fn vs_main(@location(0) a_position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(a_position, 0.0, 1.0);
}
"#;
    let err = OverlayProgram::build(vs, OVERLAY_FRAG_WGSL).unwrap_err();
    assert!(matches!(err, OverlayError::ProgramLink(_)), "{err}");
}

#[test]
fn mismatched_varying_type_fails_to_link() {
    let vs = r#"
struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) v_uv: vec3<f32>,
};

@vertex
fn vs_main(@location(0) a_position: vec2<f32>) -> VertexOut {
    var out: VertexOut;
    out.v_uv = vec3<f32>(a_position, 0.0);
    out.clip = vec4<f32>(a_position, 0.0, 1.0);
    return out;
}
"#;
    let err = OverlayProgram::build(vs, OVERLAY_FRAG_WGSL).unwrap_err();
    assert!(matches!(err, OverlayError::ProgramLink(_)), "{err}");
}

#[test]
fn missing_position_attribute_fails_to_link() {
    let vs = r#"
struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) v_uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) corner: vec2<f32>) -> VertexOut {
    var out: VertexOut;
    out.v_uv = corner;
    out.clip = vec4<f32>(corner, 0.0, 1.0);
    return out;
}
"#;
    let err = OverlayProgram::build(vs, OVERLAY_FRAG_WGSL).unwrap_err();
    assert!(matches!(err, OverlayError::ProgramLink(_)), "{err}");
}

#[test]
fn missing_uniform_member_is_skipped_on_upload() {
    let fs = r#"
struct OverlayUniforms {
    iTime: f32,
};

@group(0) @binding(0) var<uniform> u: OverlayUniforms;

@fragment
fn fs_main(@location(0) v_uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_uv, sin(u.iTime), 1.0);
}
"#;
    let program = OverlayProgram::build(OVERLAY_VERT_WGSL, fs).unwrap();
    let block = program.uniforms.unwrap();
    assert_eq!(block.time_offset, Some(0));
    assert_eq!(block.resolution_offset, None);
    let bytes = program.encode_uniforms(1000.0, Viewport::new(10, 10));
    assert_eq!(bytes.len(), block.size as usize);
    assert_eq!(read_f32(&bytes, 0), 1.0);
}

#[test]
fn uniform_block_outside_group_zero_fails_to_link() {
    let fs = r#"
struct OverlayUniforms {
    iTime: f32,
    iResolution: vec2<f32>,
};

@group(1) @binding(0) var<uniform> u: OverlayUniforms;

@fragment
fn fs_main(@location(0) v_uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(v_uv, u.iTime, 1.0);
}
"#;
    let err = OverlayProgram::build(OVERLAY_VERT_WGSL, fs).unwrap_err();
    assert!(matches!(err, OverlayError::ProgramLink(_)), "{err}");
}

#[test]
fn build_or_log_swallows_errors() {
    assert!(OverlayProgram::build_or_log("not wgsl at all", OVERLAY_FRAG_WGSL).is_none());
    assert!(OverlayProgram::build_or_log(OVERLAY_VERT_WGSL, OVERLAY_FRAG_WGSL).is_some());
}
