//! Session tuning. `Default` carries the production values from [`crate::constants`].

use crate::constants::*;
use std::ops::RangeInclusive;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub commands: Vec<&'static str>,
    pub sequence: Vec<&'static str>,
    pub click_window: f64,
    pub triangle_area: RangeInclusive<f32>,
    pub burst_window: f64,
    pub burst_clicks: u32,
    pub sync_time: (u32, u32),
    pub clock_poll: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            commands: TEXT_COMMANDS.to_vec(),
            sequence: KONAMI_SEQUENCE.to_vec(),
            click_window: CLICK_WINDOW_SEC,
            triangle_area: TRIANGLE_MIN_AREA..=TRIANGLE_MAX_AREA,
            burst_window: TRIPLE_CLICK_WINDOW_SEC,
            burst_clicks: TRIPLE_CLICK_COUNT,
            sync_time: (SYNC_HOUR, SYNC_MINUTE),
            clock_poll: CLOCK_POLL_SEC,
        }
    }
}
