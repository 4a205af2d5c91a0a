//! Plugin registration: effect modules declare controllers, reactions and
//! timelines against a central dispatcher at install time.

use crate::action::Action;
use crate::effect::EffectSpec;
use crate::timeline::Timeline;
use crate::trigger::TriggerEvent;
use fnv::FnvHashMap;

pub type Reaction = Box<dyn Fn(&TriggerEvent) -> Vec<Action>>;

/// Trigger name -> reactions, run in registration order.
#[derive(Default)]
pub struct Dispatcher {
    reactions: FnvHashMap<&'static str, Vec<Reaction>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, trigger: &'static str, reaction: Reaction) {
        self.reactions.entry(trigger).or_default().push(reaction);
    }

    pub fn handles(&self, trigger: &str) -> bool {
        self.reactions.get(trigger).is_some_and(|r| !r.is_empty())
    }

    pub fn dispatch(&self, event: &TriggerEvent) -> Vec<Action> {
        self.reactions
            .get(event.name)
            .map(|reactions| reactions.iter().flat_map(|r| r(event)).collect())
            .unwrap_or_default()
    }
}

/// Collects one module's declarations. The session validates and merges them.
pub struct Installer {
    module: &'static str,
    pub(crate) effects: Vec<EffectSpec>,
    pub(crate) reactions: Vec<(&'static str, Reaction)>,
    pub(crate) timelines: Vec<(&'static str, Timeline)>,
    pub(crate) startup: Vec<Action>,
    pub(crate) intervals: Vec<(f64, Action)>,
}

impl Installer {
    pub(crate) fn new(module: &'static str) -> Self {
        Self {
            module,
            effects: Vec::new(),
            reactions: Vec::new(),
            timelines: Vec::new(),
            startup: Vec::new(),
            intervals: Vec::new(),
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn effect(&mut self, spec: EffectSpec) -> &mut Self {
        self.effects.push(spec);
        self
    }

    /// React to a trigger with a computed list of actions.
    pub fn on<F>(&mut self, trigger: &'static str, reaction: F) -> &mut Self
    where
        F: Fn(&TriggerEvent) -> Vec<Action> + 'static,
    {
        self.reactions.push((trigger, Box::new(reaction)));
        self
    }

    /// React to a trigger with a fixed list of actions.
    pub fn on_fixed(&mut self, trigger: &'static str, actions: Vec<Action>) -> &mut Self {
        self.on(trigger, move |_| actions.clone())
    }

    pub fn timeline(&mut self, name: &'static str, timeline: Timeline) -> &mut Self {
        self.timelines.push((name, timeline));
        self
    }

    /// Applied once when the session starts.
    pub fn on_start(&mut self, action: Action) -> &mut Self {
        self.startup.push(action);
        self
    }

    /// Repeating action armed when the session starts.
    pub fn every(&mut self, period: f64, action: Action) -> &mut Self {
        self.intervals.push((period, action));
        self
    }
}

pub trait EffectModule {
    fn name(&self) -> &'static str;
    fn install(&self, installer: &mut Installer);
}
