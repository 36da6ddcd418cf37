use std::collections::VecDeque;
use std::time::Duration;

/// Run counter. Every scheduled timer carries the generation it was created under and is only
/// applied while that generation is still current.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Stage timing of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageTiming {
    /// Delay between consecutive layer reveals.
    pub interval: Duration,
    /// Extra delay after the last reveal slot before the run completes.
    pub settle: Duration,
}

impl Default for StageTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(700),
            settle: Duration::from_millis(500),
        }
    }
}

impl StageTiming {
    /// Offset of the reveal of `layer` from the trigger instant.
    pub fn reveal_offset(&self, layer: usize) -> Duration {
        self.interval * u32::try_from(layer).unwrap_or(u32::MAX)
    }

    /// Offset of run completion for a network of `layers` layers (`layers * interval + settle`).
    pub fn completion_offset(&self, layers: usize) -> Duration {
        self.reveal_offset(layers) + self.settle
    }
}

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageAction {
    /// Reveal layers up to and including this index.
    RevealStage(usize),
    /// Mark the run complete and show the final caption.
    Complete,
}

/// One delayed action, anchored to the trigger instant of its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTimer {
    /// Absolute fire time on the caller's clock.
    pub at: Duration,
    /// Run this timer belongs to.
    pub generation: Generation,
    /// Effect on the engine.
    pub action: StageAction,
}

/// Build the whole timer set of a run up front: one reveal per layer at
/// `anchor + i * interval`, then completion at `anchor + layers * interval + settle`.
pub fn schedule_run(
    anchor: Duration,
    layers: usize,
    timing: StageTiming,
    generation: Generation,
) -> Vec<ScheduledTimer> {
    let mut out = Vec::with_capacity(layers + 1);
    for layer in 0..layers {
        out.push(ScheduledTimer {
            at: anchor + timing.reveal_offset(layer),
            generation,
            action: StageAction::RevealStage(layer),
        });
    }
    out.push(ScheduledTimer {
        at: anchor + timing.completion_offset(layers),
        generation,
        action: StageAction::Complete,
    });
    out
}

/// Pending timers ordered by fire time; equal times keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    timers: VecDeque<ScheduledTimer>,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a timer after every timer due at or before it.
    pub fn push(&mut self, timer: ScheduledTimer) {
        let idx = self.timers.partition_point(|t| t.at <= timer.at);
        self.timers.insert(idx, timer);
    }

    /// Insert many timers.
    pub fn extend(&mut self, timers: impl IntoIterator<Item = ScheduledTimer>) {
        for t in timers {
            self.push(t);
        }
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledTimer> {
        if self.timers.front()?.at <= now {
            return self.timers.pop_front();
        }
        None
    }

    /// Fire time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.front().map(|t| t.at)
    }

    /// Drop every pending timer; returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pending timers in fire order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTimer> {
        self.timers.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
