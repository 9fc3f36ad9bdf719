use crate::input;
use crate::showcase::Showcase;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Orbit drag and wheel zoom on the showcase canvas.
#[derive(Clone)]
pub struct InputWiring {
    pub showcase: Showcase,
    pub drag_state: Rc<RefCell<input::DragState>>,
}

impl InputWiring {
    pub fn new(showcase: Showcase) -> Self {
        Self {
            showcase,
            drag_state: Rc::new(RefCell::new(input::DragState::default())),
        }
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.showcase.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.showcase.canvas);
        w.drag_state.borrow_mut().begin(ev.pointer_id(), pos);
        _ = w.showcase.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.showcase.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.showcase.canvas);
        let Some(delta) = w.drag_state.borrow_mut().update(ev.pointer_id(), pos) else {
            return;
        };
        let height = w.showcase.canvas.height() as f32;
        w.showcase
            .session
            .borrow_mut()
            .orbit_mut()
            .rotate_by_pixels(delta.x, delta.y, height);
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let canvas_for_listener = w.showcase.canvas.clone();
    for event in ["pointerup", "pointercancel"] {
        let w = w.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if w.drag_state.borrow_mut().end(ev.pointer_id()) {
                _ = w.showcase.canvas.release_pointer_capture(ev.pointer_id());
            }
        }) as Box<dyn FnMut(_)>);
        _ = canvas_for_listener.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.showcase.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let delta = input::wheel_pixels(ev.delta_y(), ev.delta_mode());
        w.showcase.session.borrow_mut().orbit_mut().zoom(delta);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    // non-passive so prevent_default keeps the page from scrolling
    let options = web::AddEventListenerOptions::new();
    options.set_passive(false);
    _ = canvas_for_listener.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &options,
    );
    closure.forget();
}
