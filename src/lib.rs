#![cfg(target_arch = "wasm32")]
use octa_core::{FrameDriver, OverlayProgram, VisualConfig, OVERLAY_FRAG_WGSL, OVERLAY_VERT_WGSL};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod frame;
mod render;
mod resize;

use constants::{OVERLAY_CANVAS_ID, SCENE_CANVAS_ID};
use resize::PendingResize;

fn wire_window_resize(window: &web::Window, pending: Rc<PendingResize>) {
    let window_for_cb = window.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::window_inner_size(&window_for_cb);
        pending.record(w, h);
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("octa-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let scene_canvas = dom::canvas_by_id(&document, SCENE_CANVAS_ID)?;
    let overlay_canvas = match dom::canvas_by_id(&document, OVERLAY_CANVAS_ID) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("[overlay] {e}; rendering the scene only");
            None
        }
    };

    let viewport = dom::window_viewport(&window);
    dom::set_canvas_size(&scene_canvas, viewport);
    if let Some(c) = &overlay_canvas {
        dom::set_canvas_size(c, viewport);
    }

    let config = VisualConfig::default();
    let mut gpu =
        render::GpuState::new(&scene_canvas, overlay_canvas.as_ref(), config.style.background_rgb)
            .await?;

    let program = if overlay_canvas.is_some() {
        OverlayProgram::build_or_log(OVERLAY_VERT_WGSL, OVERLAY_FRAG_WGSL)
    } else {
        None
    };
    let mut driver = FrameDriver::new(config, viewport, program);
    if let Some(program) = driver.overlay().cloned() {
        if let Err(e) = gpu.attach_overlay(&program).await {
            log::error!("[overlay] {e}");
            driver.disable_overlay();
        }
    }

    let pending_resize = Rc::new(PendingResize::default());
    wire_window_resize(&window, pending_resize.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        driver,
        gpu,
        scene_canvas,
        overlay_canvas,
        pending_resize,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
