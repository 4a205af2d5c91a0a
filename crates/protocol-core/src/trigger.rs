//! Input pattern matchers and the session's unlock set.
//!
//! Matchers are plain state machines fed one event at a time. Gating by the
//! [`UnlockSet`] happens in [`TriggerSystem`]: text commands and the
//! time-of-day trigger fire once per session, gestures (fixed sequence,
//! click patterns) fire every time.

use crate::config::SessionConfig;
use crate::constants::{ELEVEN_LABEL, TRIGGER_BREACH_CLICK, TRIGGER_ELEVEN, TRIGGER_KONAMI, TRIGGER_TRIANGLE};
use fnv::FnvHashSet;
use glam::Vec2;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::ops::RangeInclusive;

/// Features unlocked so far. Entries are never removed within a session.
#[derive(Clone, Debug, Default)]
pub struct UnlockSet {
    names: FnvHashSet<&'static str>,
    order: Vec<&'static str>,
}

impl UnlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was not unlocked before.
    pub fn insert(&mut self, name: &'static str) -> bool {
        if self.names.insert(name) {
            self.order.push(name);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Unlocked names in unlock order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Ring buffer of typed letters matched against a command table by substring.
#[derive(Clone, Debug)]
pub struct TextCommandMatcher {
    commands: Vec<&'static str>,
    buffer: String,
    capacity: usize,
}

impl TextCommandMatcher {
    /// Commands are expected upper-case; the buffer holds as many letters as
    /// the longest command.
    pub fn new(commands: &[&'static str]) -> Self {
        let capacity = commands.iter().map(|c| c.len()).max().unwrap_or(1).max(1);
        Self {
            commands: commands.to_vec(),
            buffer: String::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Feed one key identifier. Anything other than a single ASCII letter is ignored.
    pub fn push(&mut self, key: &str) -> Option<&'static str> {
        let mut chars = key.chars();
        let c = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return None,
        };
        self.buffer.push(c);
        if self.buffer.len() > self.capacity {
            let excess = self.buffer.len() - self.capacity;
            self.buffer.drain(..excess);
        }

        let hit = self
            .commands
            .iter()
            .copied()
            .find(|cmd| self.buffer.contains(*cmd));
        if hit.is_some() {
            self.buffer.clear();
        }
        hit
    }
}

/// Exact match of the last `target.len()` raw key identifiers.
#[derive(Clone, Debug)]
pub struct SequenceMatcher {
    target: Vec<&'static str>,
    recent: VecDeque<String>,
}

impl SequenceMatcher {
    pub fn new(target: &[&'static str]) -> Self {
        Self {
            target: target.to_vec(),
            recent: VecDeque::with_capacity(target.len() + 1),
        }
    }

    /// Case-sensitive; returns `true` (and resets) on a full contiguous match.
    pub fn push(&mut self, key: &str) -> bool {
        if self.target.is_empty() {
            return false;
        }
        self.recent.push_back(key.to_string());
        while self.recent.len() > self.target.len() {
            self.recent.pop_front();
        }
        let matched = self.recent.len() == self.target.len()
            && self.recent.iter().zip(&self.target).all(|(a, b)| a == b);
        if matched {
            self.recent.clear();
        }
        matched
    }
}

/// Shoelace area of the triangle `abc`.
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)).abs() * 0.5
}

/// Three recent clicks whose triangle area lies inside a band.
#[derive(Clone, Debug)]
pub struct TrianglePatternMatcher {
    window: f64,
    band: RangeInclusive<f32>,
    clicks: SmallVec<[(Vec2, f64); 4]>,
}

impl TrianglePatternMatcher {
    pub fn new(window: f64, band: RangeInclusive<f32>) -> Self {
        Self {
            window,
            band,
            clicks: SmallVec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.clicks.len()
    }

    /// Returns the centroid when the last three clicks form a matching triangle.
    ///
    /// Clicks older than the window are dropped first. Once three remain
    /// the buffer is cleared whatever the outcome.
    pub fn push(&mut self, pos: Vec2, now: f64) -> Option<Vec2> {
        self.clicks.push((pos, now));
        let window = self.window;
        self.clicks.retain(|(_, t)| now - *t <= window);
        if self.clicks.len() != 3 {
            return None;
        }
        let (a, b, c) = (self.clicks[0].0, self.clicks[1].0, self.clicks[2].0);
        self.clicks.clear();
        let area = triangle_area(a, b, c);
        log::debug!("[trigger] triangle area {area:.0}");
        self.band.contains(&area).then(|| (a + b + c) / 3.0)
    }
}

/// N clicks, each within `window` seconds of the previous one.
#[derive(Clone, Debug)]
pub struct ClickBurstMatcher {
    window: f64,
    needed: u32,
    count: u32,
    last: Option<f64>,
}

impl ClickBurstMatcher {
    pub fn new(window: f64, needed: u32) -> Self {
        Self {
            window,
            needed: needed.max(1),
            count: 0,
            last: None,
        }
    }

    pub fn push(&mut self, now: f64) -> bool {
        let chained = self.last.is_some_and(|last| now - last <= self.window);
        self.count = if chained { self.count + 1 } else { 1 };
        self.last = Some(now);
        if self.count >= self.needed {
            self.count = 0;
            self.last = None;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOfDayMatcher {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDayMatcher {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn matches(&self, hour: u32, minute: u32) -> bool {
        hour == self.hour && minute == self.minute
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
    Command,
    Sequence,
    Pattern,
    ClickBurst,
    TimeOfDay,
}

/// A recognized input pattern, ready for dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: TriggerKind,
    /// Pixel position for pointer gestures.
    pub at: Option<Vec2>,
}

impl TriggerEvent {
    fn new(name: &'static str, kind: TriggerKind) -> Self {
        Self {
            name,
            label: name,
            kind,
            at: None,
        }
    }

    /// Gated triggers announce a fresh unlock when they fire.
    pub fn is_unlock(&self) -> bool {
        matches!(self.kind, TriggerKind::Command | TriggerKind::TimeOfDay)
    }
}

pub type Triggers = SmallVec<[TriggerEvent; 2]>;

/// All matchers plus the unlock set they are gated by.
#[derive(Clone, Debug)]
pub struct TriggerSystem {
    text: TextCommandMatcher,
    sequence: SequenceMatcher,
    triangle: TrianglePatternMatcher,
    burst: ClickBurstMatcher,
    time_of_day: TimeOfDayMatcher,
    unlocks: UnlockSet,
}

impl TriggerSystem {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            text: TextCommandMatcher::new(&config.commands),
            sequence: SequenceMatcher::new(&config.sequence),
            triangle: TrianglePatternMatcher::new(config.click_window, config.triangle_area.clone()),
            burst: ClickBurstMatcher::new(config.burst_window, config.burst_clicks),
            time_of_day: TimeOfDayMatcher::new(config.sync_time.0, config.sync_time.1),
            unlocks: UnlockSet::new(),
        }
    }

    pub fn unlocks(&self) -> &UnlockSet {
        &self.unlocks
    }

    pub fn unlocks_mut(&mut self) -> &mut UnlockSet {
        &mut self.unlocks
    }

    pub fn text(&self) -> &TextCommandMatcher {
        &self.text
    }

    pub fn key_down(&mut self, key: &str) -> Triggers {
        let mut out = Triggers::new();
        if let Some(cmd) = self.text.push(key) {
            if self.unlocks.insert(cmd) {
                log::info!("[trigger] {cmd} unlocked");
                out.push(TriggerEvent::new(cmd, TriggerKind::Command));
            }
        }
        if self.sequence.push(key) {
            log::info!("[trigger] sequence complete");
            out.push(TriggerEvent::new(TRIGGER_KONAMI, TriggerKind::Sequence));
        }
        out
    }

    pub fn click(&mut self, pos: Vec2, now: f64) -> Triggers {
        let mut out = Triggers::new();
        if self.burst.push(now) {
            out.push(TriggerEvent {
                at: Some(pos),
                ..TriggerEvent::new(TRIGGER_BREACH_CLICK, TriggerKind::ClickBurst)
            });
        }
        if let Some(centroid) = self.triangle.push(pos, now) {
            log::info!("[trigger] triangle at ({:.0}, {:.0})", centroid.x, centroid.y);
            out.push(TriggerEvent {
                at: Some(centroid),
                ..TriggerEvent::new(TRIGGER_TRIANGLE, TriggerKind::Pattern)
            });
        }
        out
    }

    pub fn clock(&mut self, hour: u32, minute: u32) -> Option<TriggerEvent> {
        if !self.time_of_day.matches(hour, minute) || !self.unlocks.insert(TRIGGER_ELEVEN) {
            return None;
        }
        log::info!("[trigger] {ELEVEN_LABEL} synchronicity");
        Some(TriggerEvent {
            label: ELEVEN_LABEL,
            ..TriggerEvent::new(TRIGGER_ELEVEN, TriggerKind::TimeOfDay)
        })
    }
}
