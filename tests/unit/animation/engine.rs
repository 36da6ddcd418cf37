use super::*;
use crate::animation::sampling::Rng64;
use crate::prediction::Label;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine() -> AnimationEngine {
    AnimationEngine::new(NetworkTopology::mnist_demo(), EngineOpts::default())
}

fn predicted(k: i64) -> Option<PredictionResult> {
    Some(PredictionResult::new(Label::new(k, 10).unwrap()))
}

#[test]
fn idle_until_triggered() {
    let mut e = engine();
    assert_eq!(e.state(), EngineState::Idle);
    assert!(e.advance(ms(10_000)).is_empty());
    assert_eq!(e.generation(), Generation(0));
    assert_eq!(e.next_deadline(), None);
}

#[test]
fn trigger_enters_revealing_minus_one_and_schedules_everything() {
    let mut e = engine();
    let g = e.trigger(predicted(3), ms(100), &mut Rng64::new(1));
    assert_eq!(g, Generation(1));
    assert_eq!(e.state(), EngineState::Revealing { stage: None });
    assert_eq!(e.clock().stage_index(), -1);
    assert_eq!(e.pending_timers().count(), 5);
    assert_eq!(e.next_deadline(), Some(ms(100)));
    assert!(!e.highlights().is_empty());
    assert_eq!(e.anchor(), Some(ms(100)));
    assert_eq!(e.run_length(), ms(3_300));
}

#[test]
fn stages_follow_the_fixed_schedule() {
    let mut e = engine();
    e.trigger(predicted(5), ms(0), &mut Rng64::new(1));

    assert_eq!(
        e.advance(ms(0)),
        vec![EngineEvent::StageRevealed {
            generation: Generation(1),
            stage: 0,
            at: ms(0)
        }]
    );
    assert!(e.advance(ms(699)).is_empty());
    assert_eq!(e.clock().stage(), Some(0));
    assert_eq!(e.advance(ms(700)).len(), 1);
    assert_eq!(e.clock().stage(), Some(1));
    assert_eq!(e.advance(ms(2_100)).len(), 2);
    assert_eq!(e.clock().stage(), Some(3));
    assert!(!e.clock().caption_visible());
    assert!(e.advance(ms(3_299)).is_empty());

    assert_eq!(
        e.advance(ms(3_300)),
        vec![EngineEvent::Completed {
            generation: Generation(1),
            at: ms(3_300)
        }]
    );
    assert!(e.is_complete());
    assert!(e.clock().caption_visible());
    assert_eq!(e.completed_at(), Some(ms(3_300)));
    assert_eq!(e.revealed_at(2), Some(ms(1_400)));
}

#[test]
fn stage_sequence_is_monotonic_and_ends_complete() {
    let mut e = engine();
    e.trigger(predicted(1), ms(0), &mut Rng64::new(9));

    let mut seen = vec![e.clock().stage_index()];
    let mut now = ms(0);
    while now <= ms(5_000) {
        e.advance(now);
        seen.push(e.clock().stage_index());
        now += ms(37);
    }
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(*seen.last().unwrap(), 3);
    assert!(e.clock().caption_visible());
}

#[test]
fn coarse_advance_fires_everything_in_order() {
    let mut e = engine();
    e.trigger(predicted(2), ms(0), &mut Rng64::new(2));
    let events = e.advance(ms(60_000));
    let stages: Vec<usize> = events
        .iter()
        .filter_map(|ev| match ev {
            EngineEvent::StageRevealed { stage, .. } => Some(*stage),
            EngineEvent::Completed { .. } => None,
        })
        .collect();
    assert_eq!(stages, vec![0, 1, 2, 3]);
    assert!(matches!(events.last(), Some(EngineEvent::Completed { .. })));
}

#[test]
fn restart_invalidates_previous_run() {
    let mut e = engine();
    let first = e.trigger(predicted(4), ms(0), &mut Rng64::new(1));
    e.advance(ms(1_500));
    assert_eq!(e.clock().stage(), Some(2));
    let stale: Vec<ScheduledTimer> = e.pending_timers().copied().collect();
    assert_eq!(stale.len(), 2);

    let second = e.trigger(predicted(6), ms(1_500), &mut Rng64::new(2));
    assert_ne!(first, second);
    assert_eq!(e.clock().stage(), None);
    assert_eq!(e.state(), EngineState::Revealing { stage: None });

    // Continuations of the first run are refused even if someone still holds them.
    for t in stale {
        assert_eq!(e.fire(t), None);
    }
    assert_eq!(e.clock().stage(), None);

    let events = e.advance(ms(2_100));
    assert!(events.iter().all(|ev| match ev {
        EngineEvent::StageRevealed { generation, .. } => *generation == second,
        EngineEvent::Completed { generation, .. } => *generation == second,
    }));
    // Stage 0 at 1500 only; the first run's stage 3 at 2100 must not appear.
    assert_eq!(e.clock().stage(), Some(0));
}

#[test]
fn restart_after_complete_resets_caption() {
    let mut e = engine();
    e.trigger(predicted(0), ms(0), &mut Rng64::new(1));
    e.advance(ms(10_000));
    assert!(e.is_complete());

    e.trigger(predicted(8), ms(10_000), &mut Rng64::new(1));
    assert!(!e.clock().caption_visible());
    assert_eq!(e.completed_at(), None);
    assert_eq!(e.revealed_at(0), None);
    assert_eq!(e.prediction(), predicted(8));
}

#[test]
fn highlights_are_regenerated_per_trigger() {
    let mut e = engine();
    e.trigger(predicted(0), ms(0), &mut Rng64::new(11));
    let a = e.highlights().clone();
    e.trigger(predicted(0), ms(10), &mut Rng64::new(12));
    assert_ne!(&a, e.highlights());
    assert!(e.highlights().iter().all(|edge| edge.layer != 3));
}

#[test]
fn missing_prediction_still_completes() {
    let mut e = engine();
    e.trigger(None, ms(0), &mut Rng64::new(1));
    e.advance(ms(10_000));
    assert!(e.is_complete());
    assert_eq!(e.prediction(), None);
}

#[test]
fn duplicate_timers_do_not_emit_twice() {
    let mut e = engine();
    e.trigger(predicted(3), ms(0), &mut Rng64::new(1));
    let timers: Vec<ScheduledTimer> = e.pending_timers().copied().collect();
    e.advance(ms(10_000));
    for t in timers {
        assert_eq!(e.fire(t), None);
    }
}

#[test]
fn zero_interval_is_rejected() {
    let mut opts = EngineOpts::default();
    assert!(opts.validate().is_ok());
    opts.timing.interval = Duration::ZERO;
    assert!(matches!(opts.validate(), Err(ScopeError::Animation(_))));
}

#[test]
fn cancel_mid_run_drops_every_pending_timer() {
    let mut e = engine();
    let run = e.trigger(predicted(4), ms(0), &mut Rng64::new(1));
    e.advance(ms(800));
    assert_eq!(e.clock().stage(), Some(1));
    let held: Vec<ScheduledTimer> = e.pending_timers().copied().collect();
    assert_eq!(held.len(), 3);

    assert!(e.cancel());
    assert_eq!(e.state(), EngineState::Idle);
    assert_ne!(e.generation(), run);
    assert_eq!(e.next_deadline(), None);
    assert_eq!(e.clock().stage(), None);
    assert_eq!(e.prediction(), None);
    assert!(e.highlights().is_empty());

    assert!(e.advance(ms(10_000)).is_empty());
    for t in held {
        assert_eq!(e.fire(t), None);
    }
    assert!(!e.is_complete());
}

#[test]
fn cancel_when_idle_keeps_the_generation() {
    let mut e = engine();
    assert!(!e.cancel());
    assert_eq!(e.generation(), Generation(0));

    e.trigger(None, ms(0), &mut Rng64::new(3));
    e.advance(ms(10_000));
    assert!(e.is_complete());
    assert!(e.cancel());
    assert_eq!(e.generation(), Generation(2));
    assert!(!e.clock().caption_visible());
}
