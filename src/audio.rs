use crate::constants::{
    CHIME_ATTACK_SEC, CHIME_BASE_HZ, CHIME_DURATION_SEC, CHIME_GAIN, CHIME_INTERVAL_RATIO,
    CHIME_STAGGER_SEC,
};
use web_sys as web;

/// Unlock chime. The context is created lazily and only sounds once a user
/// gesture has resumed it; until then chimes are silently dropped.
#[derive(Default)]
pub struct Chime {
    ctx: Option<web::AudioContext>,
}

impl Chime {
    /// Call from a user gesture handler.
    pub fn resume(&mut self) {
        if self.ctx.is_none() {
            match web::AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("[audio] AudioContext error: {:?}", e);
                    return;
                }
            }
        }
        if let Some(ctx) = &self.ctx {
            _ = ctx.resume();
        }
    }

    pub fn play(&mut self) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        if ctx.state() != web::AudioContextState::Running {
            return;
        }
        let t0 = ctx.current_time();
        let partials = [CHIME_BASE_HZ, CHIME_BASE_HZ * CHIME_INTERVAL_RATIO];
        for (i, freq) in partials.into_iter().enumerate() {
            if let Err(e) = tone(ctx, freq, t0 + i as f64 * CHIME_STAGGER_SEC) {
                log::warn!("[audio] chime error: {:?}", e);
            }
        }
    }
}

fn tone(ctx: &web::AudioContext, frequency_hz: f32, t0: f64) -> Result<(), wasm_bindgen::JsValue> {
    let src = web::OscillatorNode::new(ctx)?;
    src.set_type(web::OscillatorType::Sine);
    src.frequency().set_value(frequency_hz);

    let g = web::GainNode::new(ctx)?;
    g.gain().set_value(0.0);
    g.gain().set_value_at_time(0.0, t0)?;
    g.gain()
        .linear_ramp_to_value_at_time(CHIME_GAIN, t0 + CHIME_ATTACK_SEC)?;
    g.gain()
        .linear_ramp_to_value_at_time(0.0, t0 + CHIME_DURATION_SEC)?;

    src.connect_with_audio_node(&g)?;
    g.connect_with_audio_node(&ctx.destination())?;
    src.start_with_when(t0)?;
    src.stop_with_when(t0 + CHIME_DURATION_SEC + 0.05)?;
    Ok(())
}
