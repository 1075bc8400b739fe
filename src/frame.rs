use crate::dom;
use crate::render::GpuState;
use crate::resize::PendingResize;
use octa_core::FrameDriver;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub driver: FrameDriver,
    pub gpu: GpuState,
    pub scene_canvas: web::HtmlCanvasElement,
    pub overlay_canvas: Option<web::HtmlCanvasElement>,
    pub pending_resize: Rc<PendingResize>,
}

impl FrameContext {
    /// One animation frame; `timestamp_ms` is the rAF timestamp.
    pub fn frame(&mut self, timestamp_ms: f64) {
        if let Some(viewport) = self.pending_resize.take() {
            dom::set_canvas_size(&self.scene_canvas, viewport);
            if let Some(canvas) = &self.overlay_canvas {
                dom::set_canvas_size(canvas, viewport);
            }
            self.gpu.resize_if_needed(viewport);
            self.driver.resize(viewport.width, viewport.height);
        }
        self.driver.tick(timestamp_ms, &mut self.gpu);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        frame_ctx.borrow_mut().frame(timestamp_ms);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    let tick = tick.borrow();
    if let Some(cb) = tick.as_ref() {
        if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }
}
