//! Contact modal and background form submission.

use crate::constants::{
    CLOSE_MODAL_ID, CONTACT_FORM_ID, CONTACT_MODAL_ID, CTA_BUTTON_ID, MODAL_VISIBLE_CLASS,
    NOTIFICATION_SHOW_CLASS, SUCCESS_NOTIFICATION_ID,
};
use crate::core::constants::NOTIFICATION_DURATION_MS;
use crate::core::SubmitOutcome;
use crate::dom;
use crate::overlay;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn wire_contact_form(document: &web::Document) {
    if let Some(cta) = document.get_element_by_id(CTA_BUTTON_ID) {
        let doc = document.clone();
        dom::add_listener(&cta, "click", move |ev: web::Event| {
            ev.prevent_default();
            overlay::add_class(&doc, CONTACT_MODAL_ID, MODAL_VISIBLE_CLASS);
        });
    }

    let doc = document.clone();
    dom::add_click_listener(document, CLOSE_MODAL_ID, move || {
        overlay::remove_class(&doc, CONTACT_MODAL_ID, MODAL_VISIBLE_CLASS);
    });

    if let Some(modal) = document.get_element_by_id(CONTACT_MODAL_ID) {
        let backdrop = modal.clone();
        dom::add_listener(&modal, "click", move |ev: web::Event| {
            // only clicks on the backdrop itself, not the dialog inside it
            let on_backdrop = ev
                .target()
                .and_then(|t| t.dyn_into::<web::Element>().ok())
                .is_some_and(|t| t == backdrop);
            if on_backdrop {
                _ = backdrop.class_list().remove_1(MODAL_VISIBLE_CLASS);
            }
        });
    }

    let Some(form) = dom::element_by_id::<web::HtmlFormElement>(document, CONTACT_FORM_ID) else {
        return;
    };
    let submitted = form.clone();
    let doc = document.clone();
    dom::add_listener(&form, "submit", move |ev: web::Event| {
        ev.prevent_default();
        let form = submitted.clone();
        let doc = doc.clone();
        spawn_local(async move {
            let outcome = submit(&form).await;
            finish(&doc, &form, &outcome);
        });
    });
}

async fn submit(form: &web::HtmlFormElement) -> SubmitOutcome {
    let action = form.get_attribute("action").unwrap_or_else(|| form.action());
    let data = match web::FormData::new_with_form(form) {
        Ok(data) => data,
        Err(e) => return SubmitOutcome::NetworkError(format!("{:?}", e)),
    };
    let request = match gloo_net::http::Request::post(&action)
        .header("Accept", "application/json")
        .body(data)
    {
        Ok(request) => request,
        Err(e) => return SubmitOutcome::NetworkError(e.to_string()),
    };
    match request.send().await {
        Ok(resp) => SubmitOutcome::from_status(resp.status()),
        Err(e) => SubmitOutcome::NetworkError(e.to_string()),
    }
}

fn finish(document: &web::Document, form: &web::HtmlFormElement, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Accepted => {
            log::info!("[form] submission accepted");
            form.reset();
            overlay::remove_class(document, CONTACT_MODAL_ID, MODAL_VISIBLE_CLASS);
            overlay::add_class(document, SUCCESS_NOTIFICATION_ID, NOTIFICATION_SHOW_CLASS);
            let doc = document.clone();
            Timeout::new(NOTIFICATION_DURATION_MS, move || {
                overlay::remove_class(&doc, SUCCESS_NOTIFICATION_ID, NOTIFICATION_SHOW_CLASS);
            })
            .forget();
        }
        SubmitOutcome::Rejected { status } => log::error!("[form] submission rejected with HTTP {}", status),
        SubmitOutcome::NetworkError(reason) => log::error!("[form] submission error: {}", reason),
    }
    if let (Some(message), Some(window)) = (outcome.alert_message(), web::window()) {
        _ = window.alert_with_message(message);
    }
}
