/// Page wiring and presentation constants for the web front-end.
///
/// Element ids must match the markup served from the web root.
pub const CANVAS_ID: &str = "protocol-canvas";
pub const NOTICE_CONTAINER_ID: &str = "unlock-notices";

// Unlock banner lifetime (milliseconds)
pub const BANNER_VISIBLE_MS: i32 = 3000;
// Short flash class lifetime for pulse notices (milliseconds)
pub const FLASH_VISIBLE_MS: i32 = 400;

// Unlock chime: two rising sine partials
pub const CHIME_BASE_HZ: f32 = 660.0;
pub const CHIME_INTERVAL_RATIO: f32 = 1.5;
pub const CHIME_GAIN: f32 = 0.12;
pub const CHIME_ATTACK_SEC: f64 = 0.01;
pub const CHIME_DURATION_SEC: f64 = 0.6;
pub const CHIME_STAGGER_SEC: f64 = 0.08;

// Surface clear color behind the background slot
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.02, 1.0];
