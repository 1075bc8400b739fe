use crate::constants::MIN_CANVAS_PX;
use crate::resize::backing_viewport;
use octa_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{id} is not a canvas: {:?}", e))
}

/// `innerWidth` and `innerHeight` of the window in CSS pixels.
pub fn window_inner_size(window: &web::Window) -> (f64, f64) {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

pub fn window_viewport(window: &web::Window) -> Viewport {
    let (w, h) = window_inner_size(window);
    backing_viewport(w, h)
}

pub fn set_canvas_size(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width.max(MIN_CANVAS_PX));
    canvas.set_height(viewport.height.max(MIN_CANVAS_PX));
}
