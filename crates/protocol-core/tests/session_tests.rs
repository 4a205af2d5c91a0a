// End-to-end session behaviour with the built-in effect modules.

use glam::Vec2;
use protocol_core::constants::{FULL_POWER_FEATURES, KONAMI_SEQUENCE};
use protocol_core::effects::{self, PROPOSAL_FLOW};
use protocol_core::registry::{EffectModule, Installer};
use protocol_core::shaders::{
    COUNTDOWN_GLITCH, DIMENSIONAL_PORTAL, PROTOCOL_LOGO, QUANTUM_ENTANGLEMENT, VOID_FIELD,
};
use protocol_core::{Action, EffectError, EffectSpec, Notice, Session, Slot, WallClock};
use std::cell::Cell;
use std::rc::Rc;

struct FixedClock(Rc<Cell<(u32, u32)>>);

impl WallClock for FixedClock {
    fn hour_minute(&self) -> (u32, u32) {
        self.0.get()
    }
}

fn session() -> (Session, Rc<Cell<(u32, u32)>>) {
    let time = Rc::new(Cell::new((9, 30)));
    let mut session = Session::with_defaults(Box::new(FixedClock(time.clone())), 7);
    session.start(0.0);
    session.frame(0.0);
    session.drain_notices();
    (session, time)
}

fn type_text(session: &mut Session, text: &str, now: f64) {
    for c in text.chars() {
        session.key_down(&c.to_string(), now);
    }
}

fn unlocked(notices: &[Notice]) -> Vec<&'static str> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::Unlocked { name, .. } => Some(*name),
            _ => None,
        })
        .collect()
}

fn is_active(session: &Session, name: &str) -> bool {
    session.controller(name).is_some_and(|c| c.is_active())
}

#[test]
fn start_fills_the_always_on_slots() {
    let (session, _) = session();
    let names: Vec<_> = session.draw_list().iter().map(|i| i.name()).collect();
    // Governance waits for its timeline, countdown for a glitch
    assert_eq!(names, vec![VOID_FIELD, PROTOCOL_LOGO]);
    assert!(session.slots().current(Slot::Countdown).is_some());
    assert_eq!(
        session.slots().current(Slot::Countdown).unwrap().name(),
        COUNTDOWN_GLITCH
    );
}

#[test]
fn command_unlocks_once_and_cross_fades_the_logo() {
    let (mut session, _) = session();
    type_text(&mut session, "quantum", 1.0);
    assert_eq!(unlocked(&session.drain_notices()), vec!["QUANTUM"]);
    assert!(session.unlocks().contains("QUANTUM"));

    session.frame(1.0);
    let incoming = session.slots().transition(Slot::Logo).unwrap();
    assert_eq!(incoming.target().name(), QUANTUM_ENTANGLEMENT);
    assert_eq!(incoming.duration(), 2.0);

    session.frame(2.0);
    assert!(session.frame(2.5).released.is_empty());
    let report = session.frame(3.0);
    let released: Vec<_> = report.released.iter().map(|i| i.name()).collect();
    assert_eq!(released, vec![PROTOCOL_LOGO]);
    assert_eq!(
        session.slots().current(Slot::Logo).unwrap().name(),
        QUANTUM_ENTANGLEMENT
    );

    // Second time is a silent no-op
    type_text(&mut session, "QUANTUM", 4.0);
    assert!(unlocked(&session.drain_notices()).is_empty());
    assert!(!session.slots().is_transitioning(Slot::Logo));
}

#[test]
fn overlay_cleans_itself_up_without_further_input() {
    let (mut session, _) = session();
    type_text(&mut session, "MATRIX", 1.0);
    assert!(is_active(&session, effects::MATRIX_RAIN));

    session.frame(45.9);
    assert!(is_active(&session, effects::MATRIX_RAIN));
    session.frame(46.0);
    assert!(!is_active(&session, effects::MATRIX_RAIN));
    assert!(session
        .drain_notices()
        .contains(&Notice::Ended(effects::MATRIX_RAIN)));
}

#[test]
fn deactivation_clears_the_repeating_timer() {
    let (mut session, _) = session();
    type_text(&mut session, "BREACH", 1.0);
    assert!(is_active(&session, effects::BREACH_MODE));
    session.drain_notices();

    let pulses = |notices: Vec<Notice>| {
        notices
            .iter()
            .filter(|n| **n == Notice::Pulse(effects::REALITY_TEAR))
            .count()
    };
    session.frame(3.0);
    session.frame(5.0);
    assert_eq!(pulses(session.drain_notices()), 2);

    session.apply(Action::Deactivate(effects::BREACH_MODE)).unwrap();
    session.frame(7.0);
    session.frame(9.0);
    assert_eq!(pulses(session.drain_notices()), 0);
}

#[test]
fn breach_mode_expires_on_its_own() {
    let (mut session, _) = session();
    type_text(&mut session, "BREACH", 1.0);
    assert!(is_active(&session, effects::BREACH_MODE));

    let mut notices = Vec::new();
    let mut t = 1.5;
    while t <= 40.0 {
        session.frame(t);
        notices.extend(session.drain_notices());
        t += 0.5;
    }
    assert!(!is_active(&session, effects::BREACH_MODE));
    assert!(notices.contains(&Notice::Ended(effects::BREACH_MODE)));
    // Tears at +2 .. +28; the one due with the expiry is cancelled
    let tears = notices
        .iter()
        .filter(|n| **n == Notice::Pulse(effects::REALITY_TEAR))
        .count();
    assert_eq!(tears, 14);

    session.frame(60.0);
    assert!(!session
        .drain_notices()
        .contains(&Notice::Pulse(effects::REALITY_TEAR)));
}

#[test]
fn glitch_burst_shows_the_countdown_slot_briefly() {
    let (mut session, _) = session();
    type_text(&mut session, "GLITCH", 1.0);
    assert!(is_active(&session, effects::COUNTDOWN_GLITCH));
    assert!(is_active(&session, effects::GLITCH));

    session.frame(1.0);
    assert!(session
        .draw_list()
        .iter()
        .any(|i| i.name() == COUNTDOWN_GLITCH));

    session.frame(1.25);
    assert!(!is_active(&session, effects::COUNTDOWN_GLITCH));
    assert!(session
        .draw_list()
        .iter()
        .all(|i| i.name() != COUNTDOWN_GLITCH));
}

#[test]
fn eleven_eleven_fires_once() {
    let (mut session, time) = session();
    session.frame(60.0);
    assert!(unlocked(&session.drain_notices()).is_empty());

    time.set((11, 11));
    session.frame(120.0);
    let notices = session.drain_notices();
    assert!(notices.contains(&Notice::Unlocked {
        name: "ELEVEN",
        label: "11:11"
    }));
    assert!(is_active(&session, effects::SYNCHRONICITY));

    session.frame(180.0);
    assert!(unlocked(&session.drain_notices()).is_empty());
}

#[test]
fn konami_unlocks_full_power_one_at_a_time() {
    let (mut session, _) = session();
    for key in KONAMI_SEQUENCE {
        session.key_down(key, 1.0);
    }
    assert!(is_active(&session, effects::RAINBOW));

    session.frame(1.0);
    assert_eq!(unlocked(&session.drain_notices()).len(), 1);
    let mut all = Vec::new();
    for t in [1.4, 1.8, 2.2, 2.6, 3.0] {
        session.frame(t);
        all.extend(unlocked(&session.drain_notices()));
    }
    assert_eq!(all.len(), FULL_POWER_FEATURES.len() - 1);
    for feature in FULL_POWER_FEATURES {
        assert!(session.unlocks().contains(feature));
    }

    // Already unlocked: typing it does nothing
    type_text(&mut session, "PROTOCOL", 4.0);
    assert!(unlocked(&session.drain_notices()).is_empty());
    assert!(!session.slots().is_transitioning(Slot::Logo));

    // The sequence itself stays repeatable
    session.frame(10.0);
    assert!(!is_active(&session, effects::RAINBOW));
    for key in KONAMI_SEQUENCE {
        session.key_down(key, 20.0);
    }
    assert!(is_active(&session, effects::RAINBOW));
}

#[test]
fn triangle_gesture_opens_a_portal_at_the_centroid() {
    let (mut session, _) = session();
    session.click(Vec2::new(100.0, 100.0), 1.0);
    session.click(Vec2::new(400.0, 100.0), 1.6);
    session.click(Vec2::new(100.0, 400.0), 2.2);

    let notices = session.drain_notices();
    assert!(notices.contains(&Notice::Gesture {
        name: "TRIANGLE",
        at: Vec2::new(200.0, 200.0)
    }));
    assert!(is_active(&session, effects::TRIANGLE_PORTAL));
    session.frame(4.5);
    assert!(!is_active(&session, effects::TRIANGLE_PORTAL));
}

#[test]
fn triple_click_opens_a_breach() {
    let (mut session, _) = session();
    session.click(Vec2::new(50.0, 60.0), 1.0);
    session.click(Vec2::new(50.0, 60.0), 1.2);
    session.click(Vec2::new(50.0, 60.0), 1.4);
    assert!(is_active(&session, effects::BREACH));
    session.frame(4.5);
    assert!(!is_active(&session, effects::BREACH));
}

#[test]
fn proposal_flow_walks_the_tiers_and_fades() {
    let (mut session, _) = session();
    assert!(session.is_running(PROPOSAL_FLOW));
    assert!(!is_active(&session, effects::GOVERNANCE));

    session.frame(0.5);
    assert!(is_active(&session, effects::GOVERNANCE));
    session.frame(2.0);
    let stage = |s: &Session| {
        s.slots()
            .current(Slot::Governance)
            .and_then(|i| i.params.float("stage"))
    };
    assert_eq!(stage(&session), Some(1.0));
    session.frame(4.0);
    assert_eq!(stage(&session), Some(3.0));

    session.frame(7.0);
    assert!(!is_active(&session, effects::GOVERNANCE));
    assert!(!session.is_running(PROPOSAL_FLOW));
}

#[test]
fn replaying_the_flow_cancels_the_previous_run() {
    let (mut session, _) = session();
    session.frame(3.0);
    type_text(&mut session, "CYBER", 3.0);

    // The first run would have deactivated at 7.0
    session.frame(7.0);
    assert!(is_active(&session, effects::GOVERNANCE));
    session.frame(10.0);
    assert!(!is_active(&session, effects::GOVERNANCE));
}

#[test]
fn shared_params_reach_every_live_program() {
    let (mut session, _) = session();
    session.set_viewport(800.0, 600.0);
    session.pointer_moved(Vec2::new(0.25, 0.75));
    session.frame(0.1);

    for slot in [Slot::Background, Slot::Logo] {
        let params = &session.slots().current(slot).unwrap().params;
        assert_eq!(
            params.get("resolution"),
            Some(Vec2::new(800.0, 600.0).into())
        );
        assert_eq!(params.get("mouse"), Some(Vec2::new(0.25, 0.75).into()));
    }
}

struct Broken;

impl EffectModule for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn install(&self, installer: &mut Installer) {
        installer.on_fixed(
            "VOID",
            vec![
                Action::Activate("missing"),
                Action::transition(Slot::Logo, "missing_program", 1.0),
                Action::Play("missing_timeline"),
                Action::Activate(effects::INFINITY),
            ],
        );
    }
}

#[test]
fn one_broken_reaction_does_not_stop_the_others() {
    let (mut session, _) = session();
    session.install(&Broken).unwrap();
    type_text(&mut session, "VOID", 1.0);

    // Built-in reaction still ran, and so did the healthy part of the broken one
    let incoming = session.slots().transition(Slot::Logo).unwrap();
    assert_eq!(incoming.target().name(), DIMENSIONAL_PORTAL);
    assert!(is_active(&session, effects::INFINITY));

    assert_eq!(
        session.apply(Action::Activate("missing")),
        Err(EffectError::UnknownEffect("missing".into()))
    );
}

struct Duplicate;

impl EffectModule for Duplicate {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn install(&self, installer: &mut Installer) {
        installer
            .effect(EffectSpec::new("fresh"))
            .effect(EffectSpec::new(effects::LOGO));
    }
}

#[test]
fn installing_a_clashing_module_changes_nothing() {
    let (mut session, _) = session();
    assert_eq!(
        session.install(&Duplicate),
        Err(EffectError::DuplicateEffect("logo".into()))
    );
    assert!(session.controller("fresh").is_none());
}

#[test]
fn sessions_do_not_share_unlocks() {
    let (mut a, _) = session();
    let (b, _) = session();
    type_text(&mut a, "NEXUS", 1.0);
    assert!(a.unlocks().contains("NEXUS"));
    assert!(!b.unlocks().contains("NEXUS"));
}

struct Ticking;

impl EffectModule for Ticking {
    fn name(&self) -> &'static str {
        "ticking"
    }

    fn install(&self, installer: &mut Installer) {
        installer.effect(
            EffectSpec::new("fx")
                .lifetime(2.0)
                .repeating(2.0, Action::Emit("tick")),
        );
    }
}

#[test]
fn expiry_cancels_a_repeat_due_in_the_same_frame() {
    let (mut session, _) = session();
    session.install(&Ticking).unwrap();
    session.apply(Action::Activate("fx")).unwrap();
    session.drain_notices();

    session.frame(2.0);
    let notices = session.drain_notices();
    assert!(notices.contains(&Notice::Ended("fx")));
    assert!(!notices.contains(&Notice::Pulse("tick")));

    session.frame(4.0);
    assert!(!session.drain_notices().contains(&Notice::Pulse("tick")));
}
