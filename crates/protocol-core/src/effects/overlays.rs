use crate::action::Action;
use crate::constants::{
    FULL_POWER_FEATURES, FULL_POWER_STAGGER_SEC, TRIGGER_BREACH_CLICK, TRIGGER_ELEVEN,
    TRIGGER_KONAMI, TRIGGER_TRIANGLE,
};
use crate::effect::EffectSpec;
use crate::registry::{EffectModule, Installer};
use crate::timeline::Timeline;

// Overlay name, lifetime in seconds (None = stays until the page closes)
const OVERLAYS: [(&str, Option<f64>); 11] = [
    (super::MATRIX_RAIN, Some(45.0)),
    (super::TRANSCEND, Some(5.0)),
    (super::INFINITY, Some(10.0)),
    (super::BREACH, Some(3.0)),
    (super::TRIANGLE_PORTAL, Some(2.0)),
    (super::SYNCHRONICITY, Some(11.0)),
    (super::PROTOCOL_FILTER, Some(5.0)),
    (super::RAINBOW, Some(5.0)),
    (super::PHOENIX, Some(6.0)),
    (super::GLITCH, None),
    (super::SOVEREIGN, None),
];

// Breach mode opens a reality tear every period until it expires
const BREACH_MODE_SEC: f64 = 30.0;
const REALITY_TEAR_PERIOD_SEC: f64 = 2.0;

// Trigger -> overlay it switches on
const REACTIONS: [(&str, &str); 11] = [
    ("MATRIX", super::MATRIX_RAIN),
    ("TRANSCEND", super::TRANSCEND),
    ("INFINITY", super::INFINITY),
    ("PROTOCOL", super::PROTOCOL_FILTER),
    ("GLITCH", super::GLITCH),
    ("PHOENIX", super::PHOENIX),
    ("SOVEREIGN", super::SOVEREIGN),
    ("BREACH", super::BREACH_MODE),
    (TRIGGER_BREACH_CLICK, super::BREACH),
    (TRIGGER_TRIANGLE, super::TRIANGLE_PORTAL),
    (TRIGGER_ELEVEN, super::SYNCHRONICITY),
];

/// Unlocks the full-power feature set one notice at a time.
pub fn full_power() -> Timeline {
    FULL_POWER_FEATURES
        .iter()
        .enumerate()
        .fold(Timeline::new(), |timeline, (i, feature)| {
            timeline.at(i as f64 * FULL_POWER_STAGGER_SEC, Action::Unlock(*feature))
        })
}

/// Page-level overlays rendered by the front-end (CSS classes and DOM nodes),
/// each with a scheduled cleanup.
pub struct OverlayModule;

impl EffectModule for OverlayModule {
    fn name(&self) -> &'static str {
        "overlays"
    }

    fn install(&self, installer: &mut Installer) {
        for (name, lifetime) in OVERLAYS {
            let spec = EffectSpec::new(name).easing(0.1);
            installer.effect(match lifetime {
                Some(seconds) => spec.lifetime(seconds),
                None => spec,
            });
        }
        installer.effect(
            EffectSpec::new(super::BREACH_MODE)
                .easing(0.1)
                .lifetime(BREACH_MODE_SEC)
                .repeating(REALITY_TEAR_PERIOD_SEC, Action::Emit(super::REALITY_TEAR)),
        );

        for (trigger, overlay) in REACTIONS {
            installer.on_fixed(trigger, vec![Action::Activate(overlay)]);
        }

        installer
            .timeline(super::FULL_POWER, full_power())
            .on_fixed(
                TRIGGER_KONAMI,
                vec![Action::Activate(super::RAINBOW), Action::Play(super::FULL_POWER)],
            );
    }
}
