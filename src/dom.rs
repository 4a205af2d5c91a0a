use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn body() -> Option<web::HtmlElement> {
    window_document().and_then(|d| d.body())
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

pub fn add_body_class(class: &str) {
    if let Some(b) = body() {
        _ = b.class_list().add_1(class);
    }
}

pub fn remove_body_class(class: &str) {
    if let Some(b) = body() {
        _ = b.class_list().remove_1(class);
    }
}

pub fn set_body_property(name: &str, value: &str) {
    if let Some(b) = body() {
        _ = b.style().set_property(name, value);
    }
}

/// Run `f` once after `ms` milliseconds.
pub fn after_ms(ms: i32, f: impl FnOnce() + 'static) {
    let Some(w) = web::window() else {
        return;
    };
    let closure = wasm_bindgen::closure::Closure::once(f);
    _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms,
    );
    closure.forget();
}

/// True while a form field has focus; typing there must not feed the unlock matchers.
pub fn text_entry_focused(document: &web::Document) -> bool {
    document
        .active_element()
        .is_some_and(|el| crate::input::is_text_entry_tag(&el.tag_name()))
}
