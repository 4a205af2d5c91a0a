use thiserror::Error;

/// Failures raised while wiring or driving decorative effects.
///
/// None of these are fatal: the session logs them and skips the offending
/// action so the remaining effects keep running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("unknown shader program `{0}`")]
    UnknownProgram(String),
    #[error("shader program `{0}` is already registered")]
    DuplicateProgram(String),
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),
    #[error("effect `{0}` is already registered")]
    DuplicateEffect(String),
    #[error("unknown timeline `{0}`")]
    UnknownTimeline(String),
    #[error("timeline `{0}` is already registered")]
    DuplicateTimeline(String),
}
