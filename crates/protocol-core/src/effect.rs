//! Per-effect state machine: activation, elapsed time and eased intensity.

use crate::action::Action;
use crate::constants::DEFAULT_EASING_RATE;
use crate::shaders::{ParamSet, PARAM_INTENSITY, PARAM_TIME};
use crate::timeline::TimerId;
use crate::transition::Slot;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectState {
    pub active: bool,
    /// Seconds spent active. Frozen while inactive.
    pub elapsed: f64,
    pub intensity: f32,
    pub target: f32,
}

/// What happens to `elapsed` when an effect is activated again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restart {
    /// Continue from where the last activation left off.
    Resume,
    /// Start from zero on every activation (bursts).
    Always,
}

/// Static description of an effect, declared by its module.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSpec {
    pub name: &'static str,
    pub slot: Option<Slot>,
    pub restart: Restart,
    pub easing_rate: f32,
    pub initial_intensity: f32,
    pub target: f32,
    /// Deactivate automatically this many seconds after the latest activation.
    pub lifetime: Option<f64>,
    /// Repeating action armed while active, cancelled on deactivation.
    pub repeat: Option<(f64, Action)>,
}

impl EffectSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: None,
            restart: Restart::Resume,
            easing_rate: DEFAULT_EASING_RATE,
            initial_intensity: 0.0,
            target: 1.0,
            lifetime: None,
            repeat: None,
        }
    }

    pub fn on_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn one_shot(mut self) -> Self {
        self.restart = Restart::Always;
        self
    }

    pub fn easing(mut self, rate: f32) -> Self {
        self.easing_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn starting_at(mut self, intensity: f32) -> Self {
        self.initial_intensity = intensity;
        self
    }

    pub fn lifetime(mut self, seconds: f64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn repeating(mut self, period: f64, action: Action) -> Self {
        self.repeat = Some((period, action));
        self
    }
}

#[derive(Debug)]
pub struct EffectController {
    spec: EffectSpec,
    state: EffectState,
    activated_once: bool,
    last_frame: Option<f64>,
    lifetime_timer: Option<TimerId>,
    repeat_timer: Option<TimerId>,
}

impl EffectController {
    pub fn new(spec: EffectSpec) -> Self {
        let state = EffectState {
            active: false,
            elapsed: 0.0,
            intensity: spec.initial_intensity,
            target: spec.target,
        };
        Self {
            spec,
            state,
            activated_once: false,
            last_frame: None,
            lifetime_timer: None,
            repeat_timer: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn slot(&self) -> Option<Slot> {
        self.spec.slot
    }

    pub fn spec(&self) -> &EffectSpec {
        &self.spec
    }

    pub fn state(&self) -> &EffectState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Returns `true` if the effect was inactive before the call.
    pub fn activate(&mut self) -> bool {
        let was_active = self.state.active;
        if self.spec.restart == Restart::Always || !self.activated_once {
            self.state.elapsed = 0.0;
        }
        self.activated_once = true;
        self.state.active = true;
        // The first frame after (re)activation only records its timestamp.
        self.last_frame = None;
        !was_active
    }

    /// Returns `true` if the effect was active before the call. State is frozen.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.state.active;
        self.state.active = false;
        self.last_frame = None;
        was_active
    }

    pub fn set_target(&mut self, target: f32) {
        self.state.target = target.clamp(0.0, 1.0);
    }

    /// Advance one frame and write `time`/`intensity` into `targets`.
    ///
    /// Does nothing while inactive. With an empty `targets` (slot not yet
    /// populated, or no slot at all) the degradation to a no-op covers the
    /// parameter writes only: elapsed time and intensity still advance, so
    /// slot-less overlays keep their timing.
    pub fn update<'a>(&mut self, now: f64, targets: impl IntoIterator<Item = &'a mut ParamSet>) {
        if !self.state.active {
            return;
        }
        let delta = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        self.state.elapsed += delta;
        self.state.intensity += (self.state.target - self.state.intensity) * self.spec.easing_rate;

        for params in targets {
            params.set(PARAM_TIME, self.state.elapsed as f32);
            params.set(PARAM_INTENSITY, self.state.intensity);
        }
    }

    pub(crate) fn replace_lifetime_timer(&mut self, timer: TimerId) -> Option<TimerId> {
        self.lifetime_timer.replace(timer)
    }

    pub(crate) fn set_repeat_timer(&mut self, timer: TimerId) {
        self.repeat_timer = Some(timer);
    }

    pub(crate) fn has_repeat_timer(&self) -> bool {
        self.repeat_timer.is_some()
    }

    /// Timers this controller owns; the caller cancels them.
    pub(crate) fn take_timers(&mut self) -> SmallVec<[TimerId; 2]> {
        self.lifetime_timer
            .take()
            .into_iter()
            .chain(self.repeat_timer.take())
            .collect()
    }
}
