// Trigger tables and effect tuning constants shared by the web front-end and tests.

// Text commands, in match priority order (first registered wins on overlap)
pub const TEXT_COMMANDS: [&str; 14] = [
    "PROTOCOL",
    "MATRIX",
    "QUANTUM",
    "GLITCH",
    "NEXUS",
    "AWAKEN",
    "SOVEREIGN",
    "KONAMI",
    "BREACH",
    "CYBER",
    "VOID",
    "PHOENIX",
    "TRANSCEND",
    "INFINITY",
];

// Raw key identifiers of the repeatable fixed sequence
pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

// Features unlocked by the fixed sequence ("full power")
pub const FULL_POWER_FEATURES: [&str; 5] = ["PROTOCOL", "MATRIX", "QUANTUM", "NEXUS", "SOVEREIGN"];
pub const FULL_POWER_STAGGER_SEC: f64 = 0.4; // delay between successive full-power unlock notices

// Pattern and time triggers (names dispatched alongside text commands)
pub const TRIGGER_KONAMI: &str = "KONAMI";
pub const TRIGGER_TRIANGLE: &str = "TRIANGLE";
pub const TRIGGER_BREACH_CLICK: &str = "DIMENSIONAL_BREACH";
pub const TRIGGER_ELEVEN: &str = "ELEVEN";
pub const ELEVEN_LABEL: &str = "11:11";

// Click patterns
pub const CLICK_WINDOW_SEC: f64 = 2.0; // triangle candidates must be this recent
pub const TRIANGLE_MIN_AREA: f32 = 10_000.0; // px^2, inclusive
pub const TRIANGLE_MAX_AREA: f32 = 50_000.0; // px^2, inclusive
pub const TRIPLE_CLICK_WINDOW_SEC: f64 = 0.5; // max gap between consecutive clicks
pub const TRIPLE_CLICK_COUNT: u32 = 3;

// Time of day
pub const SYNC_HOUR: u32 = 11;
pub const SYNC_MINUTE: u32 = 11;
pub const CLOCK_POLL_SEC: f64 = 60.0;

// Effects
pub const DEFAULT_EASING_RATE: f32 = 0.05; // fraction of the remaining distance per frame
pub const DEFAULT_TRANSITION_SEC: f64 = 1.0;
