// Host-side tests for the web host's constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn canvas_ids_are_distinct_and_non_empty() {
    assert!(!SCENE_CANVAS_ID.is_empty());
    assert!(!OVERLAY_CANVAS_ID.is_empty());
    assert_ne!(SCENE_CANVAS_ID, OVERLAY_CANVAS_ID);
}

#[test]
fn overlay_clears_to_transparent() {
    assert_eq!(OVERLAY_CLEAR_RGBA[3], 0.0);
    assert!(OVERLAY_CLEAR_RGBA.iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn canvases_never_collapse_to_zero() {
    assert!(MIN_CANVAS_PX >= 1);
}
