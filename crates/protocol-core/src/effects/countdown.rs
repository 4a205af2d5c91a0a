use crate::action::Action;
use crate::effect::EffectSpec;
use crate::registry::{EffectModule, Installer};
use crate::shaders::COUNTDOWN_GLITCH;
use crate::transition::Slot;

/// Random glitch bursts over the countdown digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountdownModule {
    /// Seconds between glitch rolls.
    pub period: f64,
    /// Chance that a roll starts a burst.
    pub probability: f32,
    /// Burst length in seconds.
    pub burst: f64,
}

impl Default for CountdownModule {
    fn default() -> Self {
        Self {
            period: 2.0,
            probability: 0.05,
            burst: 0.25,
        }
    }
}

impl EffectModule for CountdownModule {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn install(&self, installer: &mut Installer) {
        let glitch = super::COUNTDOWN_GLITCH;
        installer
            .effect(
                EffectSpec::new(glitch)
                    .on_slot(Slot::Countdown)
                    .one_shot()
                    .easing(0.35)
                    .lifetime(self.burst),
            )
            .on_start(Action::transition(Slot::Countdown, COUNTDOWN_GLITCH, 0.0))
            .every(self.period, Action::chance(self.probability, Action::Activate(glitch)))
            .on_fixed("GLITCH", vec![Action::Activate(glitch)]);
    }
}
