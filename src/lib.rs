#![cfg(target_arch = "wasm32")]
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod ambient;
mod constants;
mod core;
mod dom;
mod events;
mod form;
mod frame;
mod hero;
mod input;
mod overlay;
mod render;
mod showcase;
mod texture;
mod ui;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("studio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // Page chrome first so it works even where WebGPU is unavailable.
    form::wire_contact_form(&document);
    ui::start_typewriter(&document);
    if let Err(e) = ui::observe_feature_cards(&document) {
        log::warn!("feature cards not observed: {:?}", e);
    }

    if let Some(canvas) = dom::element_by_id::<web::HtmlCanvasElement>(&document, constants::HERO_CANVAS_ID) {
        wire_canvas_resize(&canvas);
        spawn_local(async move {
            if let Err(e) = hero::mount(&canvas).await {
                log::error!("[hero] init error: {:?}", e);
            }
        });
    }

    let ambient_doc = document.clone();
    spawn_local(async move {
        ambient::mount_all(&ambient_doc).await;
    });

    match showcase::mount(&document).await {
        Ok(Some(showcase)) => {
            events::controls::wire_controls(&showcase);
            events::pointer::wire_input_handlers(events::pointer::InputWiring::new(showcase));
        }
        Ok(None) => log::info!("[showcase] no viewport on this page"),
        Err(e) => log::error!("[showcase] init error: {:?}", e),
    }
    Ok(())
}
