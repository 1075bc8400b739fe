// Host-side tests for resize bookkeeping shared by the listener and the frame loop.

#![allow(dead_code)]
mod resize {
    include!("../src/resize.rs");
}

use octa_core::Viewport;
use resize::{backing_viewport, PendingResize};

#[test]
fn backing_viewport_truncates_css_pixels() {
    assert_eq!(backing_viewport(1280.0, 720.0), Viewport::new(1280, 720));
    assert_eq!(backing_viewport(1280.7, 719.2), Viewport::new(1280, 719));
}

#[test]
fn backing_viewport_rejects_nonsense() {
    assert!(backing_viewport(0.0, 720.0).is_empty());
    assert!(backing_viewport(-5.0, 720.0).is_empty());
    assert!(backing_viewport(f64::NAN, 720.0).is_empty());
    assert!(backing_viewport(1280.0, f64::INFINITY).is_empty());
}

#[test]
fn pending_resize_keeps_only_the_latest_size() {
    let pending = PendingResize::default();
    assert_eq!(pending.take(), None);

    pending.record(800.0, 600.0);
    pending.record(1024.0, 768.0);
    assert_eq!(pending.take(), Some(Viewport::new(1024, 768)));
    // consumed by the frame that applied it
    assert_eq!(pending.take(), None);
}

#[test]
fn empty_sizes_do_not_replace_a_pending_one() {
    let pending = PendingResize::default();
    pending.record(640.0, 480.0);
    pending.record(0.0, 0.0);
    assert_eq!(pending.take(), Some(Viewport::new(640, 480)));
}
