use crate::audio::Chime;
use crate::dom;
use crate::frame::PageClock;
use crate::input;
use protocol_core::Session;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    session: &Rc<RefCell<Session>>,
    chime: &Rc<RefCell<Chime>>,
    clock: PageClock,
) {
    if input::is_shortcut(ev.ctrl_key(), ev.meta_key(), ev.alt_key()) {
        return;
    }
    if dom::window_document().is_some_and(|d| dom::text_entry_focused(&d)) {
        return;
    }
    chime.borrow_mut().resume();
    session.borrow_mut().key_down(&ev.key(), clock.now());
}

pub fn wire_global_keydown(session: Rc<RefCell<Session>>, chime: Rc<RefCell<Chime>>, clock: PageClock) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &session, &chime, clock);
    }) as Box<dyn FnMut(_)>);
    if let Some(w) = web::window() {
        _ = w.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
