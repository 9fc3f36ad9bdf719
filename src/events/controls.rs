use crate::constants::{
    AMBIENT_LIGHT_INPUT_ID, ANIMATION_TOGGLE_ID, AR_TOGGLE_ID, BACKGROUND_COLOR_INPUT_ID,
    MODEL_SCALE_INPUT_ID, ROTATION_SPEED_INPUT_ID, WIREFRAME_TOGGLE_ID,
};
use crate::core::parse_hex_color;
use crate::dom;
use crate::input;
use crate::showcase::Showcase;
use web_sys as web;

/// Wire the showcase's toggles and sliders to its session.
pub fn wire_controls(showcase: &Showcase) {
    let document = showcase.document().clone();

    on_checkbox(&document, WIREFRAME_TOGGLE_ID, showcase, |s, on| {
        s.session.borrow_mut().set_wireframe(on);
    });
    on_checkbox(&document, ANIMATION_TOGGLE_ID, showcase, |s, on| {
        s.session.borrow_mut().set_animation_enabled(on);
    });
    on_checkbox(&document, AR_TOGGLE_ID, showcase, |s, on| {
        log::info!("[ar] passthrough {}", if on { "requested" } else { "off" });
        s.set_ar_enabled(on);
    });

    on_value(&document, AMBIENT_LIGHT_INPUT_ID, showcase, |s, value| {
        if let Some(v) = input::parse_slider(value) {
            s.session.borrow_mut().set_ambient_intensity(v);
        }
    });
    on_value(&document, ROTATION_SPEED_INPUT_ID, showcase, |s, value| {
        if let Some(v) = input::parse_slider(value) {
            s.session.borrow_mut().set_rotation_speed(v);
        }
    });
    on_value(&document, MODEL_SCALE_INPUT_ID, showcase, |s, value| {
        if let Some(v) = input::parse_slider(value) {
            s.session.borrow_mut().set_model_scale(v);
        }
    });
    on_value(&document, BACKGROUND_COLOR_INPUT_ID, showcase, |s, value| match parse_hex_color(value) {
        Ok(rgb) => {
            if !s.session.borrow_mut().set_background(rgb) {
                log::debug!("[showcase] background ignored while passthrough is live");
            }
        }
        Err(e) => log::warn!("[showcase] {}", e),
    });
}

fn on_checkbox(document: &web::Document, id: &str, showcase: &Showcase, apply: impl Fn(&Showcase, bool) + 'static) {
    let Some(el) = dom::element_by_id::<web::HtmlInputElement>(document, id) else {
        return;
    };
    let showcase = showcase.clone();
    let input = el.clone();
    dom::add_listener(&el, "change", move |_ev: web::Event| apply(&showcase, input.checked()));
}

fn on_value(document: &web::Document, id: &str, showcase: &Showcase, apply: impl Fn(&Showcase, &str) + 'static) {
    let Some(el) = dom::element_by_id::<web::HtmlInputElement>(document, id) else {
        return;
    };
    let showcase = showcase.clone();
    let input = el.clone();
    dom::add_listener(&el, "input", move |_ev: web::Event| apply(&showcase, &input.value()));
}
