//! Commands produced by trigger reactions, timelines and timers.
//!
//! Reactions never touch state directly; they return actions and the session
//! applies them in order. A failing action is logged and skipped.

use crate::shaders::ParamValue;
use crate::transition::Slot;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Activate a named effect controller.
    Activate(&'static str),
    /// Deactivate a named effect controller and cancel the timers it owns.
    Deactivate(&'static str),
    /// Set the intensity an effect eases toward.
    SetTarget(&'static str, f32),
    /// Write a parameter on every live program in `slot`.
    SetParam {
        slot: Slot,
        name: &'static str,
        value: ParamValue,
    },
    /// Move `slot` to the named program over `duration` seconds.
    Transition {
        slot: Slot,
        program: &'static str,
        duration: f64,
    },
    /// Record a feature as unlocked and announce it if it is new.
    Unlock(&'static str),
    /// Start a registered timeline, replacing any run already in flight.
    Play(&'static str),
    /// Stop a running timeline.
    Stop(&'static str),
    /// Fire-and-forget visual event for the front-end.
    Emit(&'static str),
    /// Apply `action` with the given probability.
    Chance { probability: f32, action: Box<Action> },
    /// Sample the wall clock for time-of-day triggers.
    PollClock,
}

impl Action {
    pub fn chance(probability: f32, action: Action) -> Self {
        Action::Chance {
            probability,
            action: Box::new(action),
        }
    }

    pub fn set_param(slot: Slot, name: &'static str, value: impl Into<ParamValue>) -> Self {
        Action::SetParam {
            slot,
            name,
            value: value.into(),
        }
    }

    pub fn transition(slot: Slot, program: &'static str, duration: f64) -> Self {
        Action::Transition {
            slot,
            program,
            duration,
        }
    }
}
