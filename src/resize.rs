use octa_core::Viewport;
use std::cell::Cell;

/// Window size recorded by the `resize` listener and applied by the next
/// frame, so surfaces and the driver never change mid-frame.
#[derive(Debug, Default)]
pub struct PendingResize {
    size: Cell<Option<Viewport>>,
}

impl PendingResize {
    pub fn record(&self, inner_width: f64, inner_height: f64) {
        let viewport = backing_viewport(inner_width, inner_height);
        if !viewport.is_empty() {
            self.size.set(Some(viewport));
        }
    }

    /// Latest recorded size, if any arrived since the last call.
    pub fn take(&self) -> Option<Viewport> {
        self.size.take()
    }
}

/// Canvas backing size for a window of the given inner size in CSS pixels.
pub fn backing_viewport(inner_width: f64, inner_height: f64) -> Viewport {
    let px = |v: f64| if v.is_finite() && v > 0.0 { v.floor() as u32 } else { 0 };
    Viewport::new(px(inner_width), px(inner_height))
}
