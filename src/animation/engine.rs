use std::time::Duration;

use crate::animation::clock::AnimationClock;
use crate::animation::sampling::{HighlightSet, RandomSource, sample_edges};
use crate::animation::timeline::{
    Generation, ScheduledTimer, StageAction, StageTiming, TimerQueue, schedule_run,
};
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::network::topology::NetworkTopology;
use crate::prediction::PredictionResult;

/// Default number of random edges drawn per hidden layer.
pub const DEFAULT_EDGES_PER_LAYER: usize = 30;

/// Engine tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOpts {
    /// Reveal interval and settle delay.
    pub timing: StageTiming,
    /// Random edges drawn per hidden layer on every trigger.
    pub edges_per_layer: usize,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            timing: StageTiming::default(),
            edges_per_layer: DEFAULT_EDGES_PER_LAYER,
        }
    }
}

impl EngineOpts {
    /// Reject timings under which every stage would fire at the trigger instant.
    pub fn validate(&self) -> ScopeResult<()> {
        if self.timing.interval.is_zero() {
            return Err(ScopeError::animation("stage interval must be > 0"));
        }
        Ok(())
    }
}

/// Coarse engine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No run has been triggered yet.
    Idle,
    /// A run is in progress; `stage` is `None` until layer 0 is revealed.
    Revealing {
        /// Highest revealed layer.
        stage: Option<usize>,
    },
    /// Every layer is revealed and the caption flag is set.
    Complete,
}

/// Observable state change produced by a fired timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// Layers up to `stage` became active.
    StageRevealed {
        /// Run the reveal belongs to.
        generation: Generation,
        /// Newly revealed stage.
        stage: usize,
        /// Scheduled instant of the reveal.
        at: Duration,
    },
    /// The run finished and the caption flag was set.
    Completed {
        /// Run that completed.
        generation: Generation,
        /// Scheduled instant of completion.
        at: Duration,
    },
}

/// Time-sequenced "signal propagation" state machine.
///
/// A trigger computes the whole run up front: a fresh [`HighlightSet`] and one timer per stage,
/// all anchored to the trigger instant. Timers are plain values carrying their
/// [`Generation`]; [`AnimationEngine::fire`] refuses any timer whose generation is no longer
/// current, so a restarted run can never be touched by the previous run's continuations, even
/// when an external scheduler still holds them.
///
/// Time is whatever monotonic `Duration` the caller uses consistently (a session epoch, frame
/// times of a render, or a paused test clock).
#[derive(Clone, Debug)]
pub struct AnimationEngine {
    topology: NetworkTopology,
    opts: EngineOpts,
    generation: Generation,
    state: EngineState,
    clock: AnimationClock,
    prediction: Option<PredictionResult>,
    highlights: HighlightSet,
    timers: TimerQueue,
    anchor: Option<Duration>,
    revealed_at: Vec<Option<Duration>>,
    completed_at: Option<Duration>,
}

impl AnimationEngine {
    /// Idle engine for `topology`.
    pub fn new(topology: NetworkTopology, opts: EngineOpts) -> Self {
        let layers = topology.len();
        Self {
            topology,
            opts,
            generation: Generation::default(),
            state: EngineState::Idle,
            clock: AnimationClock::new(),
            prediction: None,
            highlights: HighlightSet::new(),
            timers: TimerQueue::new(),
            anchor: None,
            revealed_at: vec![None; layers],
            completed_at: None,
        }
    }

    /// Start (or restart) a run at `now`.
    ///
    /// Any previous run is invalidated: its pending timers are dropped and its generation
    /// retired. `prediction` may be `None`; the run then proceeds without output emphasis.
    #[tracing::instrument(skip(self, rng), fields(generation))]
    pub fn trigger(
        &mut self,
        prediction: Option<PredictionResult>,
        now: Duration,
        rng: &mut dyn RandomSource,
    ) -> Generation {
        let dropped = self.timers.cancel_all();
        self.generation = self.generation.next();
        tracing::Span::current().record("generation", self.generation.0);

        self.clock.reset();
        self.state = EngineState::Revealing { stage: None };
        self.prediction = prediction;
        self.highlights = sample_edges(&self.topology, self.opts.edges_per_layer, rng);
        self.anchor = Some(now);
        self.revealed_at.iter_mut().for_each(|r| *r = None);
        self.completed_at = None;

        self.timers.extend(schedule_run(
            now,
            self.topology.len(),
            self.opts.timing,
            self.generation,
        ));

        tracing::debug!(
            dropped_timers = dropped,
            highlighted = self.highlights.len(),
            label = prediction.map(|p| p.label.get()),
            "animation run scheduled"
        );
        self.generation
    }

    /// Abandon the current run and go back to [`EngineState::Idle`].
    ///
    /// Pending timers are dropped and the run's generation is retired, so timers still held by
    /// an external scheduler are rejected by [`AnimationEngine::fire`]. Returns `false` when
    /// the engine was already idle; the generation is left alone in that case.
    pub fn cancel(&mut self) -> bool {
        if self.state == EngineState::Idle {
            return false;
        }
        let dropped = self.timers.cancel_all();
        let retired = self.generation;
        self.generation = self.generation.next();

        self.clock.reset();
        self.state = EngineState::Idle;
        self.prediction = None;
        self.highlights = HighlightSet::new();
        self.anchor = None;
        self.revealed_at.iter_mut().for_each(|r| *r = None);
        self.completed_at = None;

        tracing::debug!(
            retired = retired.0,
            dropped_timers = dropped,
            "animation run cancelled"
        );
        true
    }

    /// Fire every timer due at or before `now`, in schedule order.
    pub fn advance(&mut self, now: Duration) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.timers.pop_due(now) {
            if let Some(ev) = self.fire(timer) {
                events.push(ev);
            }
        }
        events
    }

    /// Apply one timer if it belongs to the current run.
    ///
    /// Returns `None` for stale timers and for timers that would not move the run forward.
    pub fn fire(&mut self, timer: ScheduledTimer) -> Option<EngineEvent> {
        if timer.generation != self.generation {
            tracing::debug!(
                stale = timer.generation.0,
                current = self.generation.0,
                "discarding timer from superseded run"
            );
            return None;
        }

        match timer.action {
            StageAction::RevealStage(stage) => {
                if stage >= self.topology.len() || self.state == EngineState::Complete {
                    return None;
                }
                if !self.clock.reveal(stage) {
                    return None;
                }
                self.revealed_at[stage] = Some(timer.at);
                self.state = EngineState::Revealing { stage: Some(stage) };
                tracing::debug!(generation = timer.generation.0, stage, "layer revealed");
                Some(EngineEvent::StageRevealed {
                    generation: timer.generation,
                    stage,
                    at: timer.at,
                })
            }
            StageAction::Complete => {
                if !self.clock.show_caption() {
                    return None;
                }
                // Completion implies every layer is visible, even if a reveal was skipped by
                // a coarse external scheduler.
                let last = self.topology.output_layer();
                if self.clock.reveal(last) {
                    self.revealed_at[last] = Some(timer.at);
                }
                self.state = EngineState::Complete;
                self.completed_at = Some(timer.at);
                tracing::info!(
                    generation = timer.generation.0,
                    label = self.prediction.map(|p| p.label.get()),
                    "animation run complete"
                );
                Some(EngineEvent::Completed {
                    generation: timer.generation,
                    at: timer.at,
                })
            }
        }
    }

    /// Earliest pending timer, for callers that sleep until the next change.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Pending timers of the current run, in fire order.
    pub fn pending_timers(&self) -> impl Iterator<Item = &ScheduledTimer> {
        self.timers.iter()
    }

    /// Static topology the engine animates.
    pub fn topology(&self) -> &NetworkTopology {
        &self.topology
    }

    /// Engine options.
    pub fn opts(&self) -> EngineOpts {
        self.opts
    }

    /// Current run generation (`Generation(0)` before the first trigger).
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Coarse state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Stage clock.
    pub fn clock(&self) -> AnimationClock {
        self.clock
    }

    /// `true` once the current run reached [`EngineState::Complete`].
    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Complete
    }

    /// Prediction of the current run.
    pub fn prediction(&self) -> Option<PredictionResult> {
        self.prediction
    }

    /// Highlighted hidden-layer edges of the current run.
    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// Trigger instant of the current run.
    pub fn anchor(&self) -> Option<Duration> {
        self.anchor
    }

    /// Instant at which `layer` was revealed in the current run.
    pub fn revealed_at(&self, layer: usize) -> Option<Duration> {
        self.revealed_at.get(layer).copied().flatten()
    }

    /// Instant at which the current run completed.
    pub fn completed_at(&self) -> Option<Duration> {
        self.completed_at
    }

    /// Total length of a run from trigger to completion.
    pub fn run_length(&self) -> Duration {
        self.opts.timing.completion_offset(self.topology.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
