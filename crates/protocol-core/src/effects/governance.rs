use crate::action::Action;
use crate::effect::EffectSpec;
use crate::registry::{EffectModule, Installer};
use crate::shaders::PLASMA_FLOW;
use crate::timeline::Timeline;
use crate::transition::Slot;

const STAGE: &str = "stage";
const CONSENSUS: &str = "consensus";

/// Proposal flowing through the governance tiers:
/// proposer, technical review, council, core, consensus; then fade out.
pub fn proposal_flow() -> Timeline {
    let g = super::GOVERNANCE;
    let stage = |n: f32| Action::set_param(Slot::Governance, STAGE, n);
    Timeline::new()
        .at(0.0, Action::SetTarget(g, 1.0))
        .at(0.0, Action::set_param(Slot::Governance, CONSENSUS, 0.0))
        .at(0.0, stage(0.0))
        .at(0.5, Action::Activate(g))
        .at(1.5, stage(1.0))
        .at(2.5, stage(2.0))
        .at(3.5, stage(3.0))
        .at(4.5, Action::set_param(Slot::Governance, CONSENSUS, 1.0))
        .at(6.5, Action::SetTarget(g, 0.0))
        .at(7.0, Action::Deactivate(g))
}

pub struct GovernanceModule;

impl EffectModule for GovernanceModule {
    fn name(&self) -> &'static str {
        "governance"
    }

    fn install(&self, installer: &mut Installer) {
        installer
            .effect(EffectSpec::new(super::GOVERNANCE).on_slot(Slot::Governance).easing(0.08))
            .timeline(super::PROPOSAL_FLOW, proposal_flow())
            .on_start(Action::transition(Slot::Governance, PLASMA_FLOW, 0.0))
            .on_start(Action::Play(super::PROPOSAL_FLOW))
            .on_fixed("CYBER", vec![Action::Play(super::PROPOSAL_FLOW)]);
    }
}
