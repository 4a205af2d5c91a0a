//! Built-in effect modules. Each registers itself with the session at install
//! time; none of them knows about the others.

mod background;
mod countdown;
mod governance;
mod logo;
mod overlays;

pub use background::BackgroundModule;
pub use countdown::CountdownModule;
pub use governance::{proposal_flow, GovernanceModule};
pub use logo::LogoModule;
pub use overlays::{full_power, OverlayModule};

use crate::registry::EffectModule;

// Effect names
pub const BACKGROUND: &str = "background";
pub const LOGO: &str = "logo";
pub const COUNTDOWN_GLITCH: &str = "countdown_glitch";
pub const GOVERNANCE: &str = "governance";

// Timelines
pub const PROPOSAL_FLOW: &str = "proposal_flow";
pub const FULL_POWER: &str = "full_power";

// DOM overlays (front-end toggles `fx-<name>` on the body)
pub const MATRIX_RAIN: &str = "matrix";
pub const TRANSCEND: &str = "transcend";
pub const INFINITY: &str = "infinity";
pub const BREACH: &str = "breach";
pub const BREACH_MODE: &str = "breach_mode";
pub const TRIANGLE_PORTAL: &str = "triangle_portal";
pub const SYNCHRONICITY: &str = "synchronicity";
pub const PROTOCOL_FILTER: &str = "protocol_filter";
pub const RAINBOW: &str = "rainbow";
pub const GLITCH: &str = "glitch";
pub const PHOENIX: &str = "phoenix";
pub const SOVEREIGN: &str = "sovereign";

// Pulses emitted while an overlay runs
pub const REALITY_TEAR: &str = "reality_tear";

/// Every built-in module, in install order.
pub fn default_modules() -> Vec<Box<dyn EffectModule>> {
    vec![
        Box::new(BackgroundModule),
        Box::new(GovernanceModule),
        Box::new(CountdownModule::default()),
        Box::new(LogoModule),
        Box::new(OverlayModule),
    ]
}
