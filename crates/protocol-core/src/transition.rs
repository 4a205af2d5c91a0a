//! Cross-fades between programs occupying a render slot.
//!
//! Each slot owns at most one current [`ProgramInstance`] and at most one
//! in-flight transition. Instances are moved, never cloned: when one leaves
//! its slot (transition completed or cancelled) it is pushed onto the
//! released queue exactly once, and the renderer drains that queue to free
//! the GPU resources it allocated for the instance.

use crate::shaders::ShaderProgram;
use std::sync::Arc;

/// Render slots, listed in draw order (back to front).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Background,
    Governance,
    Countdown,
    Logo,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Background, Slot::Governance, Slot::Countdown, Slot::Logo];

    pub fn index(self) -> usize {
        match self {
            Slot::Background => 0,
            Slot::Governance => 1,
            Slot::Countdown => 2,
            Slot::Logo => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Background => "background",
            Slot::Governance => "governance",
            Slot::Countdown => "countdown",
            Slot::Logo => "logo",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// A program bound to a slot together with its live parameter values.
#[derive(Debug)]
pub struct ProgramInstance {
    id: InstanceId,
    program: Arc<ShaderProgram>,
    pub params: crate::shaders::ParamSet,
}

impl ProgramInstance {
    fn new(id: InstanceId, program: Arc<ShaderProgram>) -> Self {
        let params = program.default_params();
        Self {
            id,
            program,
            params,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn name(&self) -> &'static str {
        self.program.name
    }

    fn set_blend(&mut self, value: f32) {
        if let Some(param) = self.program.blend_param() {
            self.params.set(param, value);
        }
    }

    /// Current value of the program's blend parameter, if it declares one.
    pub fn blend(&self) -> Option<f32> {
        self.program
            .blend_param()
            .and_then(|param| self.params.float(param))
    }
}

/// An in-flight cross-fade toward `to`. The outgoing program stays the slot's
/// current instance until the fade completes.
#[derive(Debug)]
pub struct TransitionState {
    to: ProgramInstance,
    start_time: f64,
    duration: f64,
    progress: f32,
}

impl TransitionState {
    pub fn target(&self) -> &ProgramInstance {
        &self.to
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

/// Ease-out cubic: fast start, gentle landing.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Default)]
struct SlotState {
    current: Option<ProgramInstance>,
    transition: Option<TransitionState>,
}

#[derive(Debug, Default)]
pub struct TransitionManager {
    slots: [SlotState; 4],
    next_id: u64,
    released: Vec<ProgramInstance>,
}

impl TransitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving `slot` to `program`.
    ///
    /// An in-flight transition on the same slot is cancelled and its target
    /// released immediately. The first assignment to an empty slot, or a
    /// non-positive `duration`, swaps without blending.
    pub fn transition_to(
        &mut self,
        slot: Slot,
        program: Arc<ShaderProgram>,
        duration: f64,
        now: f64,
    ) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        let mut instance = ProgramInstance::new(id, program);

        let state = &mut self.slots[slot.index()];
        if let Some(cancelled) = state.transition.take() {
            log::debug!(
                "[transition] {} cancelled fade to {} at {:.2}",
                slot.name(),
                cancelled.to.name(),
                cancelled.progress
            );
            self.released.push(cancelled.to);
        }

        if state.current.is_none() || duration.is_nan() || duration <= 0.0 {
            instance.set_blend(1.0);
            log::debug!("[transition] {} = {}", slot.name(), instance.name());
            if let Some(old) = state.current.replace(instance) {
                self.released.push(old);
            }
        } else {
            instance.set_blend(0.0);
            log::debug!(
                "[transition] {} -> {} over {:.2}s",
                slot.name(),
                instance.name(),
                duration
            );
            state.transition = Some(TransitionState {
                to: instance,
                start_time: now,
                duration,
                progress: 0.0,
            });
        }
        id
    }

    /// Advance every in-flight transition to `now`.
    pub fn step(&mut self, now: f64) {
        for state in self.slots.iter_mut() {
            let Some(transition) = state.transition.as_mut() else {
                continue;
            };
            let raw = ((now - transition.start_time) / transition.duration).clamp(0.0, 1.0) as f32;
            transition.progress = transition.progress.max(raw);
            transition.to.set_blend(ease_out_cubic(transition.progress));

            if transition.progress >= 1.0 {
                if let Some(done) = state.transition.take() {
                    if let Some(old) = state.current.replace(done.to) {
                        self.released.push(old);
                    }
                }
            }
        }
    }

    /// Drop the in-flight transition on `slot`, keeping the current program.
    pub fn cancel(&mut self, slot: Slot) -> bool {
        match self.slots[slot.index()].transition.take() {
            Some(cancelled) => {
                self.released.push(cancelled.to);
                true
            }
            None => false,
        }
    }

    pub fn current(&self, slot: Slot) -> Option<&ProgramInstance> {
        self.slots[slot.index()].current.as_ref()
    }

    pub fn transition(&self, slot: Slot) -> Option<&TransitionState> {
        self.slots[slot.index()].transition.as_ref()
    }

    pub fn is_transitioning(&self, slot: Slot) -> bool {
        self.slots[slot.index()].transition.is_some()
    }

    /// Instances that should be drawn for `slot`: the current program, then
    /// the incoming one if a fade is in flight.
    pub fn live(&self, slot: Slot) -> impl Iterator<Item = &ProgramInstance> {
        let state = &self.slots[slot.index()];
        state
            .current
            .iter()
            .chain(state.transition.iter().map(|t| &t.to))
    }

    pub fn live_mut(&mut self, slot: Slot) -> impl Iterator<Item = &mut ProgramInstance> {
        let state = &mut self.slots[slot.index()];
        state
            .current
            .iter_mut()
            .chain(state.transition.iter_mut().map(|t| &mut t.to))
    }

    pub fn all_live_mut(&mut self) -> impl Iterator<Item = &mut ProgramInstance> {
        self.slots.iter_mut().flat_map(|state| {
            state
                .current
                .iter_mut()
                .chain(state.transition.iter_mut().map(|t| &mut t.to))
        })
    }

    /// Take ownership of every instance that has left its slot since the last call.
    pub fn take_released(&mut self) -> Vec<ProgramInstance> {
        std::mem::take(&mut self.released)
    }
}
