//! Session context: everything one page instance owns.
//!
//! The front-end feeds input and frame times in and reads back the draw
//! list, released program instances and queued notices. Nothing here is
//! global, so several sessions (or tests) can run side by side.

use crate::action::Action;
use crate::config::SessionConfig;
use crate::effect::EffectController;
use crate::effects;
use crate::error::EffectError;
use crate::registry::{Dispatcher, EffectModule, Installer};
use crate::shaders::{ShaderLibrary, PARAM_MOUSE, PARAM_RESOLUTION};
use crate::timeline::{Scheduler, SequenceId, Timeline};
use crate::transition::{ProgramInstance, Slot, TransitionManager};
use crate::trigger::{TriggerEvent, TriggerSystem, UnlockSet};
use fnv::FnvHashMap;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Source of local wall-clock time for time-of-day triggers.
pub trait WallClock {
    fn hour_minute(&self) -> (u32, u32);
}

/// Events for the front-end to present (banners, CSS classes, chimes).
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Unlocked {
        name: &'static str,
        label: &'static str,
    },
    Started(&'static str),
    Ended(&'static str),
    Pulse(&'static str),
    Gesture {
        name: &'static str,
        at: Vec2,
    },
}

#[derive(Debug, Default)]
pub struct FrameReport {
    /// Instances that left their slot this frame; free their GPU resources.
    pub released: Vec<ProgramInstance>,
}

pub struct Session {
    config: SessionConfig,
    library: Arc<ShaderLibrary>,
    controllers: Vec<EffectController>,
    index: FnvHashMap<&'static str, usize>,
    triggers: TriggerSystem,
    dispatcher: Dispatcher,
    timelines: FnvHashMap<&'static str, Timeline>,
    running: FnvHashMap<&'static str, SequenceId>,
    startup: Vec<Action>,
    intervals: Vec<(f64, Action)>,
    slots: TransitionManager,
    scheduler: Scheduler,
    rng: StdRng,
    clock: Box<dyn WallClock>,
    notices: Vec<Notice>,
    now: f64,
    resolution: Vec2,
    pointer: Vec2,
    started: bool,
}

impl Session {
    pub fn new(
        library: Arc<ShaderLibrary>,
        config: SessionConfig,
        clock: Box<dyn WallClock>,
        seed: u64,
    ) -> Self {
        let triggers = TriggerSystem::new(&config);
        Self {
            config,
            library,
            controllers: Vec::new(),
            index: FnvHashMap::default(),
            triggers,
            dispatcher: Dispatcher::new(),
            timelines: FnvHashMap::default(),
            running: FnvHashMap::default(),
            startup: Vec::new(),
            intervals: Vec::new(),
            slots: TransitionManager::new(),
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            clock,
            notices: Vec::new(),
            now: 0.0,
            resolution: Vec2::ONE,
            pointer: Vec2::splat(0.5),
            started: false,
        }
    }

    /// Built-in shader library, default tuning and every built-in effect module.
    pub fn with_defaults(clock: Box<dyn WallClock>, seed: u64) -> Self {
        let mut session = Self::new(
            Arc::new(ShaderLibrary::builtin()),
            SessionConfig::default(),
            clock,
            seed,
        );
        for module in effects::default_modules() {
            if let Err(e) = session.install(module.as_ref()) {
                log::warn!("[session] module {} skipped: {e}", module.name());
            }
        }
        session
    }

    /// Register a module's effects, reactions and timelines.
    ///
    /// All-or-nothing: a name clash rejects the whole module.
    pub fn install(&mut self, module: &dyn EffectModule) -> Result<(), EffectError> {
        let mut installer = Installer::new(module.name());
        module.install(&mut installer);

        let mut names: Vec<&'static str> = Vec::with_capacity(installer.effects.len());
        for spec in &installer.effects {
            if self.index.contains_key(spec.name) || names.contains(&spec.name) {
                return Err(EffectError::DuplicateEffect(spec.name.to_string()));
            }
            names.push(spec.name);
        }
        let mut timeline_names: Vec<&'static str> = Vec::new();
        for (name, _) in &installer.timelines {
            if self.timelines.contains_key(name) || timeline_names.contains(name) {
                return Err(EffectError::DuplicateTimeline(name.to_string()));
            }
            timeline_names.push(name);
        }

        for spec in installer.effects {
            self.index.insert(spec.name, self.controllers.len());
            self.controllers.push(EffectController::new(spec));
        }
        for (trigger, reaction) in installer.reactions {
            self.dispatcher.register(trigger, reaction);
        }
        self.timelines.extend(installer.timelines);
        self.intervals.extend(installer.intervals);
        self.startup.extend(installer.startup);
        log::debug!("[session] installed module {}", module.name());
        Ok(())
    }

    /// Arm interval timers and run startup actions. Later calls are ignored.
    pub fn start(&mut self, now: f64) {
        if self.started {
            return;
        }
        self.started = true;
        self.now = now;
        self.scheduler.every(now, self.config.clock_poll, Action::PollClock);
        for (period, action) in std::mem::take(&mut self.intervals) {
            self.scheduler.every(now, period, action);
        }
        let startup = std::mem::take(&mut self.startup);
        self.run(startup);
        log::info!(
            "[session] started with {} effects, {} programs",
            self.controllers.len(),
            self.library.len()
        );
    }

    pub fn key_down(&mut self, key: &str, now: f64) {
        self.now = now;
        for event in self.triggers.key_down(key) {
            self.fire(event);
        }
    }

    /// `pos` in CSS pixels.
    pub fn click(&mut self, pos: Vec2, now: f64) {
        self.now = now;
        for event in self.triggers.click(pos, now) {
            self.fire(event);
        }
    }

    /// Pointer position in uv space (0..1, y up).
    pub fn pointer_moved(&mut self, uv: Vec2) {
        self.pointer = uv.clamp(Vec2::ZERO, Vec2::ONE);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.resolution = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Advance one frame: due timers, transitions, controllers, shared params.
    pub fn frame(&mut self, now: f64) -> FrameReport {
        self.now = now;
        // One at a time, so an action cancelling a later timer takes effect.
        // Bounded so zero-delay timers armed while draining cannot spin.
        let mut budget = self.scheduler.len();
        while budget > 0 {
            let Some(action) = self.scheduler.pop_due(now) else {
                break;
            };
            budget -= 1;
            self.run(vec![action]);
        }

        self.slots.step(now);
        for controller in self.controllers.iter_mut() {
            match controller.slot() {
                Some(slot) => {
                    controller.update(now, self.slots.live_mut(slot).map(|i| &mut i.params))
                }
                None => controller.update(now, std::iter::empty()),
            }
        }

        let (resolution, pointer) = (self.resolution, self.pointer);
        for instance in self.slots.all_live_mut() {
            instance.params.set(PARAM_RESOLUTION, resolution);
            instance.params.set(PARAM_MOUSE, pointer);
        }

        let released = self.slots.take_released();
        for instance in &released {
            log::debug!("[session] released {} ({:?})", instance.name(), instance.id());
        }
        FrameReport { released }
    }

    /// Instances to draw this frame, back to front. A slot is skipped while
    /// every effect bound to it is inactive.
    pub fn draw_list(&self) -> Vec<&ProgramInstance> {
        Slot::ALL
            .iter()
            .copied()
            .filter(|slot| self.slot_visible(*slot))
            .flat_map(|slot| self.slots.live(slot))
            .collect()
    }

    fn slot_visible(&self, slot: Slot) -> bool {
        let mut bound = self.controllers.iter().filter(|c| c.slot() == Some(slot)).peekable();
        bound.peek().is_none() || bound.any(|c| c.is_active())
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn controller(&self, name: &str) -> Option<&EffectController> {
        self.index.get(name).map(|&i| &self.controllers[i])
    }

    pub fn controllers(&self) -> impl Iterator<Item = &EffectController> {
        self.controllers.iter()
    }

    pub fn unlocks(&self) -> &UnlockSet {
        self.triggers.unlocks()
    }

    pub fn slots(&self) -> &TransitionManager {
        &self.slots
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn library(&self) -> &ShaderLibrary {
        &self.library
    }

    pub fn is_running(&self, timeline: &str) -> bool {
        self.running
            .get(timeline)
            .is_some_and(|&seq| self.scheduler.sequence_pending(seq))
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    fn fire(&mut self, event: TriggerEvent) {
        if event.is_unlock() {
            self.notices.push(Notice::Unlocked {
                name: event.name,
                label: event.label,
            });
        } else if let Some(at) = event.at {
            self.notices.push(Notice::Gesture {
                name: event.name,
                at,
            });
        }
        let actions = self.dispatcher.dispatch(&event);
        if actions.is_empty() {
            log::debug!("[session] no reactions for {}", event.name);
        }
        self.run(actions);
    }

    /// Apply actions in order. A failing action is logged and skipped.
    fn run(&mut self, actions: Vec<Action>) {
        for action in actions {
            if let Err(e) = self.apply(action) {
                log::warn!("[session] {e}");
            }
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<(), EffectError> {
        match action {
            Action::Activate(name) => self.activate(name)?,
            Action::Deactivate(name) => self.deactivate(name)?,
            Action::SetTarget(name, target) => self.controller_mut(name)?.set_target(target),
            Action::SetParam { slot, name, value } => {
                for instance in self.slots.live_mut(slot) {
                    instance.params.set(name, value);
                }
            }
            Action::Transition {
                slot,
                program,
                duration,
            } => {
                let program = self
                    .library
                    .get(program)
                    .ok_or_else(|| EffectError::UnknownProgram(program.to_string()))?;
                self.slots.transition_to(slot, program, duration, self.now);
            }
            Action::Unlock(name) => {
                if self.triggers.unlocks_mut().insert(name) {
                    log::info!("[session] {name} unlocked");
                    self.notices.push(Notice::Unlocked { name, label: name });
                }
            }
            Action::Play(name) => {
                let timeline = self
                    .timelines
                    .get(name)
                    .ok_or_else(|| EffectError::UnknownTimeline(name.to_string()))?;
                if let Some(previous) = self.running.remove(name) {
                    self.scheduler.cancel_sequence(previous);
                }
                let sequence = self.scheduler.play(self.now, timeline);
                self.running.insert(name, sequence);
            }
            Action::Stop(name) => {
                if !self.timelines.contains_key(name) {
                    return Err(EffectError::UnknownTimeline(name.to_string()));
                }
                if let Some(previous) = self.running.remove(name) {
                    self.scheduler.cancel_sequence(previous);
                }
            }
            Action::Emit(name) => self.notices.push(Notice::Pulse(name)),
            Action::Chance {
                probability,
                action,
            } => {
                if self.rng.gen::<f32>() < probability {
                    self.apply(*action)?;
                }
            }
            Action::PollClock => {
                let (hour, minute) = self.clock.hour_minute();
                if let Some(event) = self.triggers.clock(hour, minute) {
                    self.fire(event);
                }
            }
        }
        Ok(())
    }

    fn controller_mut(&mut self, name: &str) -> Result<&mut EffectController, EffectError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.controllers[i]),
            None => Err(EffectError::UnknownEffect(name.to_string())),
        }
    }

    fn activate(&mut self, name: &'static str) -> Result<(), EffectError> {
        let now = self.now;
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| EffectError::UnknownEffect(name.to_string()))?;
        let controller = &mut self.controllers[index];
        let fresh = controller.activate();

        if let Some(lifetime) = controller.spec().lifetime {
            let timer = self.scheduler.after(now, lifetime, Action::Deactivate(name));
            if let Some(previous) = controller.replace_lifetime_timer(timer) {
                self.scheduler.cancel(previous);
            }
        }
        if !controller.has_repeat_timer() {
            if let Some((period, action)) = controller.spec().repeat.clone() {
                let timer = self.scheduler.every(now, period, action);
                controller.set_repeat_timer(timer);
            }
        }

        if fresh {
            log::debug!("[session] {name} on");
            self.notices.push(Notice::Started(name));
        }
        Ok(())
    }

    fn deactivate(&mut self, name: &'static str) -> Result<(), EffectError> {
        let controller = self.controller_mut(name)?;
        let was_active = controller.deactivate();
        let timers = controller.take_timers();
        for timer in timers {
            self.scheduler.cancel(timer);
        }
        if was_active {
            log::debug!("[session] {name} off");
            self.notices.push(Notice::Ended(name));
        }
        Ok(())
    }
}
