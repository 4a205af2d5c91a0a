//! Effect orchestration for The Protocol announcement site.
//!
//! Platform-agnostic: the web front-end feeds key, click, pointer and frame
//! events into a [`Session`] and reads back the programs to draw, the
//! instances to free and the notices to show.

pub mod action;
pub mod config;
pub mod constants;
pub mod effect;
pub mod effects;
pub mod error;
pub mod registry;
pub mod session;
pub mod shaders;
pub mod timeline;
pub mod transition;
pub mod trigger;

pub use action::Action;
pub use config::SessionConfig;
pub use effect::{EffectController, EffectSpec, EffectState, Restart};
pub use error::EffectError;
pub use registry::{Dispatcher, EffectModule, Installer};
pub use session::{FrameReport, Notice, Session, WallClock};
pub use shaders::{ParamSet, ParamValue, ShaderLibrary, ShaderProgram};
pub use timeline::{Scheduler, SequenceId, Timeline, TimerId};
pub use transition::{InstanceId, ProgramInstance, Slot, TransitionManager};
pub use trigger::{TriggerEvent, TriggerKind, TriggerSystem, UnlockSet};
