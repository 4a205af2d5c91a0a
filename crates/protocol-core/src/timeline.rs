//! Timers and declarative timelines driven by the frame clock.
//!
//! Every delayed or repeating action in a session goes through one
//! [`Scheduler`]. Timers fire one at a time from [`Scheduler::pop_due`] in
//! due-time order (ties in creation order), so cancellation is just removal
//! and takes effect even for timers due in the same frame.

use crate::action::Action;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

/// Shortest period a repeating timer may have.
const MIN_PERIOD: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct TimedStep {
    pub at: f64,
    pub action: Action,
}

/// Ordered list of actions at offsets (seconds) from the moment it is played.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    steps: Vec<TimedStep>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, at: f64, action: Action) -> Self {
        self.steps.push(TimedStep {
            at: at.max(0.0),
            action,
        });
        self
    }

    pub fn steps(&self) -> &[TimedStep] {
        &self.steps
    }

    /// Offset of the last step.
    pub fn duration(&self) -> f64 {
        self.steps.iter().map(|s| s.at).fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due: f64,
    period: Option<f64>,
    sequence: Option<SequenceId>,
    action: Action,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, due: f64, period: Option<f64>, sequence: Option<SequenceId>, action: Action) -> TimerId {
        let id = TimerId(self.next());
        self.timers.push(Timer {
            id,
            due,
            period,
            sequence,
            action,
        });
        id
    }

    /// Fire `action` once, `delay` seconds after `now`.
    pub fn after(&mut self, now: f64, delay: f64, action: Action) -> TimerId {
        self.push(now + delay.max(0.0), None, None, action)
    }

    /// Fire `action` every `period` seconds, first at `now + period`.
    pub fn every(&mut self, now: f64, period: f64, action: Action) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(now + period, Some(period), None, action)
    }

    /// Schedule every step of `timeline` relative to `now`.
    pub fn play(&mut self, now: f64, timeline: &Timeline) -> SequenceId {
        let sequence = SequenceId(self.next());
        for step in timeline.steps() {
            self.push(now + step.at, None, Some(sequence), step.action.clone());
        }
        sequence
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending step of a played timeline.
    pub fn cancel_sequence(&mut self, sequence: SequenceId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.sequence != Some(sequence));
        before - self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn sequence_pending(&self, sequence: SequenceId) -> bool {
        self.timers.iter().any(|t| t.sequence == Some(sequence))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove and return every action due at `now`, in due order.
    ///
    /// Nothing runs between pops here; callers whose actions may cancel
    /// other timers should drain with [`Scheduler::pop_due`] instead.
    pub fn due(&mut self, now: f64) -> Vec<Action> {
        std::iter::from_fn(|| self.pop_due(now)).collect()
    }

    /// Remove and return the earliest action due at `now` (ties in creation order).
    ///
    /// One-shot timers are dropped once fired. A repeating timer is re-armed
    /// one period later; if the caller fell behind by several periods it
    /// skips ahead past `now`, so it fires at most once per drain.
    pub fn pop_due(&mut self, now: f64) -> Option<Action> {
        let i = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        match self.timers[i].period {
            Some(period) => {
                let timer = &mut self.timers[i];
                let mut next = timer.due + period;
                if next <= now {
                    next = now + period;
                }
                timer.due = next;
                Some(timer.action.clone())
            }
            None => Some(self.timers.swap_remove(i).action),
        }
    }
}
