use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Look up `id` and cast it to a concrete element type.
pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        add_listener(&el, "click", move |_ev: web::Event| handler());
    }
}

/// Attach `handler` for `event` on `target` for the lifetime of the page.
pub fn add_listener<E>(target: &web::EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Size the canvas backing store from its parent's client box.
pub fn sync_canvas_to_parent(canvas: &web::HtmlCanvasElement) {
    let Some(parent) = canvas.parent_element() else {
        return;
    };
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let w_px = (parent.client_width() as f64 * dpr) as u32;
    let h_px = (parent.client_height() as f64 * dpr) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}

pub fn set_display(document: &web::Document, id: &str, display: &str) {
    if let Some(el) = element_by_id::<web::HtmlElement>(document, id) {
        _ = el.style().set_property("display", display);
    }
}

pub fn display_of(element: &web::HtmlElement) -> String {
    element
        .style()
        .get_property_value("display")
        .unwrap_or_default()
}

pub fn is_checked(document: &web::Document, id: &str) -> bool {
    element_by_id::<web::HtmlInputElement>(document, id)
        .map(|i| i.checked())
        .unwrap_or(false)
}

pub fn set_checked(document: &web::Document, id: &str, checked: bool) {
    if let Some(input) = element_by_id::<web::HtmlInputElement>(document, id) {
        input.set_checked(checked);
    }
}

/// Run `handler(is_intersecting)` for each observed element whenever it
/// crosses `threshold` of visibility.
pub fn observe_intersection(
    elements: &[web::Element],
    threshold: f64,
    mut handler: impl FnMut(&web::Element, bool) + 'static,
) -> anyhow::Result<web::IntersectionObserver> {
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _obs: web::IntersectionObserver| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                handler(&entry.target(), entry.is_intersecting());
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
    let options = web::IntersectionObserverInit::new();
    options.set_threshold(&wasm_bindgen::JsValue::from_f64(threshold));
    let observer = web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    callback.forget();
    for el in elements {
        observer.observe(el);
    }
    Ok(observer)
}

/// Call `handler` whenever `element` changes size.
pub fn observe_resize(element: &web::Element, mut handler: impl FnMut() + 'static) -> anyhow::Result<web::ResizeObserver> {
    let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array, _obs: web::ResizeObserver| {
        handler();
    }) as Box<dyn FnMut(js_sys::Array, web::ResizeObserver)>);
    let observer = web::ResizeObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    callback.forget();
    observer.observe(element);
    Ok(observer)
}
