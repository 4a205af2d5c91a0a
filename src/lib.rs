#![cfg(target_arch = "wasm32")]
use protocol_core::{Session, WallClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod notice;
mod overlay;
mod render;

use constants::CANVAS_ID;

/// Local time of day from the browser, for the 11:11 unlock.
struct BrowserClock;

impl WallClock for BrowserClock {
    fn hour_minute(&self) -> (u32, u32) {
        let date = js_sys::Date::new_0();
        (date.get_hours(), date.get_minutes())
    }
}

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
    log::info!("protocol-web starting");

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

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let clock = frame::PageClock::start();
    let session = Rc::new(RefCell::new(Session::with_defaults(Box::new(BrowserClock), seed)));
    session.borrow_mut().start(clock.now());
    let chime = Rc::new(RefCell::new(audio::Chime::default()));

    events::wire_global_keydown(session.clone(), chime.clone(), clock);
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        session: session.clone(),
        chime: chime.clone(),
        clock,
    });

    // Without a GPU the page still runs triggers, overlays and banners
    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        chime,
        clock,
        canvas,
        document,
        gpu,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
