use crate::audio::Chime;
use crate::overlay;
use crate::render;
use instant::Instant;
use protocol_core::Session;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Seconds since page start; the one time base shared by input handlers and frames.
#[derive(Clone, Copy)]
pub struct PageClock {
    epoch: Instant,
}

impl PageClock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

pub struct FrameContext<'a> {
    pub session: Rc<RefCell<Session>>,
    pub chime: Rc<RefCell<Chime>>,
    pub clock: PageClock,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = self.clock.now();
        let (width, height) = (self.canvas.width(), self.canvas.height());

        let notices = {
            let mut session = self.session.borrow_mut();
            session.set_viewport(width as f32, height as f32);
            let report = session.frame(now);

            if let Some(gpu) = self.gpu.as_mut() {
                for instance in &report.released {
                    gpu.release(instance.id());
                }
                gpu.resize_if_needed(width, height);
                match gpu.render(&session.draw_list()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                    Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
                }
            }
            session.drain_notices()
        };

        if !notices.is_empty() {
            overlay::present(&self.document, &notices, &mut self.chime.borrow_mut());
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("GPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone()))
    else {
        return;
    };
    _ = w.request_animation_frame(cb.unchecked_ref());
}
