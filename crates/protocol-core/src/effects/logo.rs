use crate::action::Action;
use crate::effect::EffectSpec;
use crate::registry::{EffectModule, Installer};
use crate::shaders::{
    CONSCIOUSNESS_FIELD, DIMENSIONAL_PORTAL, GROWTH, NEURAL_NETWORK, PROTOCOL_LOGO,
    QUANTUM_ENTANGLEMENT,
};
use crate::transition::Slot;

// Unlock command -> (logo program, fade seconds)
const LOGO_MODES: [(&str, &str, f64); 6] = [
    ("PROTOCOL", CONSCIOUSNESS_FIELD, 2.5),
    ("QUANTUM", QUANTUM_ENTANGLEMENT, 2.0),
    ("NEXUS", NEURAL_NETWORK, 1.5),
    ("VOID", DIMENSIONAL_PORTAL, 3.0),
    ("AWAKEN", GROWTH, 2.0),
    ("SOVEREIGN", PROTOCOL_LOGO, 1.0),
];

/// The triangle mark. Unlock commands cross-fade it into alternate programs.
pub struct LogoModule;

impl EffectModule for LogoModule {
    fn name(&self) -> &'static str {
        "logo"
    }

    fn install(&self, installer: &mut Installer) {
        installer
            .effect(EffectSpec::new(super::LOGO).on_slot(Slot::Logo).starting_at(1.0))
            .on_start(Action::transition(Slot::Logo, PROTOCOL_LOGO, 0.0))
            .on_start(Action::Activate(super::LOGO));

        for (command, program, seconds) in LOGO_MODES {
            installer.on_fixed(command, vec![Action::transition(Slot::Logo, program, seconds)]);
        }
    }
}
