//! Simulation clock, deferred timers and fixed-step accumulation
//!
//! Timers are keyed by elapsed simulation time, not wall time, so a session
//! replays identically from the same inputs.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};

/// Monotonic simulation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub now_ms: f64,
    pub delta_ms: f64,
}

impl Clock {
    /// Advance by one tick. Negative or NaN deltas count as zero.
    pub fn advance(&mut self, delta_ms: f64) {
        let delta_ms = if delta_ms > 0.0 { delta_ms } else { 0.0 };
        self.delta_ms = delta_ms;
        self.now_ms += delta_ms;
    }
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Decrement the countdown
    CountdownTick,
    /// Accrue score from scroll speed
    ScoreTick,
    /// Remove a flashed projectile trail
    TrailExpire(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    id: TimerId,
    due_ms: f64,
    /// `Some` for repeating timers
    interval_ms: Option<f64>,
    event: TimerEvent,
}

/// Deferred one-shot and repeating callbacks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, now_ms: f64, delay_ms: f64, event: TimerEvent) -> TimerId {
        self.push(now_ms + delay_ms.max(0.0), None, event)
    }

    /// First firing is one interval from now. Intervals must be positive.
    pub fn schedule_repeating(
        &mut self,
        now_ms: f64,
        interval_ms: f64,
        event: TimerEvent,
    ) -> TimerId {
        debug_assert!(interval_ms > 0.0, "repeating timer needs a positive interval");
        self.push(now_ms + interval_ms, Some(interval_ms), event)
    }

    fn push(&mut self, due_ms: f64, interval_ms: Option<f64>, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms,
            interval_ms,
            event,
        });
        id
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop every firing due at or before `now_ms`, ordered by due time.
    ///
    /// Repeating timers reschedule at `due + interval` and may fire several
    /// times if the tick was long.
    pub fn due(&mut self, now_ms: f64) -> Vec<TimerEvent> {
        let mut fired: Vec<(f64, TimerId, TimerEvent)> = Vec::new();

        self.timers.retain_mut(|timer| {
            while timer.due_ms <= now_ms {
                fired.push((timer.due_ms, timer.id, timer.event));
                match timer.interval_ms {
                    Some(interval) if interval > 0.0 => timer.due_ms += interval,
                    _ => return false,
                }
            }
            true
        });

        // Ties resolve by creation order
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.0.cmp(&b.1.0)));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }
}

/// Turns variable frame time into fixed simulation steps
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `SIM_DT_MS` steps to run for this frame. Time beyond
    /// `MAX_SUBSTEPS` steps is dropped.
    pub fn steps(&mut self, frame_ms: f64) -> u32 {
        if frame_ms > 0.0 {
            self.accumulator += frame_ms;
        }

        let mut steps = 0;
        while self.accumulator >= SIM_DT_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = Clock::default();
        clock.advance(16.0);
        clock.advance(-5.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.now_ms, 16.0);
        assert_eq!(clock.delta_ms, 0.0);
    }

    #[test]
    fn test_once_fires_once() {
        let mut timers = Scheduler::new();
        timers.schedule_once(0.0, 100.0, TimerEvent::ScoreTick);

        assert!(timers.due(99.0).is_empty());
        assert_eq!(timers.due(100.0), vec![TimerEvent::ScoreTick]);
        assert!(timers.due(500.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_catches_up_without_drift() {
        let mut timers = Scheduler::new();
        timers.schedule_repeating(0.0, 100.0, TimerEvent::ScoreTick);

        assert_eq!(timers.due(150.0).len(), 1);
        // 200, 300, 400
        assert_eq!(timers.due(420.0).len(), 3);
        // Next due stays on the 100 ms grid
        assert!(timers.due(499.0).is_empty());
        assert_eq!(timers.due(500.0).len(), 1);
    }

    #[test]
    fn test_due_orders_by_time() {
        let mut timers = Scheduler::new();
        let trail = EntityId::new(7);
        timers.schedule_once(0.0, 50.0, TimerEvent::TrailExpire(trail));
        timers.schedule_repeating(0.0, 30.0, TimerEvent::CountdownTick);

        let fired = timers.due(60.0);
        assert_eq!(
            fired,
            vec![
                TimerEvent::CountdownTick,
                TimerEvent::TrailExpire(trail),
                TimerEvent::CountdownTick,
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let mut timers = Scheduler::new();
        let id = timers.schedule_repeating(0.0, 10.0, TimerEvent::CountdownTick);
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.due(100.0).is_empty());
    }

    #[test]
    fn test_fixed_step() {
        let mut step = FixedStep::new();
        assert_eq!(step.steps(SIM_DT_MS * 0.5), 0);
        assert_eq!(step.steps(SIM_DT_MS * 0.5), 1);
        assert_eq!(step.steps(SIM_DT_MS * 2.0), 2);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new();
        assert_eq!(step.steps(10_000.0), MAX_SUBSTEPS);
        // Excess was dropped rather than replayed
        assert!(step.steps(0.0) <= 1);
    }
}
