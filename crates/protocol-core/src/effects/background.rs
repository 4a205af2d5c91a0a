use crate::action::Action;
use crate::effect::EffectSpec;
use crate::registry::{EffectModule, Installer};
use crate::shaders::VOID_FIELD;
use crate::transition::Slot;

/// Fullscreen void field behind everything else. Always on.
pub struct BackgroundModule;

impl EffectModule for BackgroundModule {
    fn name(&self) -> &'static str {
        "background"
    }

    fn install(&self, installer: &mut Installer) {
        installer
            .effect(EffectSpec::new(super::BACKGROUND).on_slot(Slot::Background).easing(0.02))
            .on_start(Action::transition(Slot::Background, VOID_FIELD, 0.0))
            .on_start(Action::Activate(super::BACKGROUND));
    }
}
