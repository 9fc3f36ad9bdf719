//! Headline typewriter and feature-card reveal.

use crate::constants::{FEATURE_CARD_SELECTOR, FEATURE_VISIBLE_CLASS, TYPING_TEXT_ID};
use crate::core::constants::TYPEWRITER_WORDS;
use crate::core::Typewriter;
use crate::dom;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn start_typewriter(document: &web::Document) {
    let Some(target) = document.get_element_by_id(TYPING_TEXT_ID) else {
        return;
    };
    spawn_local(async move {
        let mut typewriter = Typewriter::new(TYPEWRITER_WORDS);
        loop {
            let step = typewriter.step();
            target.set_text_content(Some(&step.text));
            TimeoutFuture::new(step.delay_ms).await;
        }
    });
}

pub fn observe_feature_cards(document: &web::Document) -> anyhow::Result<()> {
    let nodes = document
        .query_selector_all(FEATURE_CARD_SELECTOR)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let cards: Vec<web::Element> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect();
    if cards.is_empty() {
        return Ok(());
    }
    dom::observe_intersection(&cards, 0.1, |card, visible| {
        let classes = card.class_list();
        _ = if visible {
            classes.add_1(FEATURE_VISIBLE_CLASS)
        } else {
            classes.remove_1(FEATURE_VISIBLE_CLASS)
        };
    })?;
    Ok(())
}
