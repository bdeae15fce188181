//! Game phase transitions
//!
//! Intro -> Countdown -> Active -> GameOver. GameOver is terminal.

use super::clock::TimerEvent;
use super::combat::GameOverReason;
use super::state::{GameEvent, GamePhase, GameState};

impl GameState {
    fn set_phase(&mut self, to: GamePhase) {
        let from = self.session.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?} at {:.0} ms", from, to, self.now_ms());
        self.session.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Intro -> Countdown on the first fire press
    pub(crate) fn begin_countdown(&mut self) {
        if self.session.phase != GamePhase::Intro {
            return;
        }
        self.session.countdown_remaining = self.tuning.countdown_start;
        let interval = self.tuning.countdown_interval_ms;
        self.countdown_timer =
            Some(
                self.timers
                    .schedule_repeating(self.clock.now_ms, interval, TimerEvent::CountdownTick),
            );
        self.set_phase(GamePhase::Countdown);
    }

    /// Countdown -> Active once the countdown has gone past GO
    pub(crate) fn update_countdown(&mut self) {
        if self.session.phase == GamePhase::Countdown && self.session.countdown_remaining < 0 {
            self.activate();
        }
    }

    fn activate(&mut self) {
        if let Some(id) = self.countdown_timer.take() {
            self.timers.cancel(id);
        }
        self.entities.reset_hp_icons();

        let now = self.clock.now_ms;
        self.spawners.enemy.arm(now);
        self.score_timer = Some(self.timers.schedule_repeating(
            now,
            self.tuning.score_interval_ms,
            TimerEvent::ScoreTick,
        ));
        self.set_phase(GamePhase::Active);
    }

    /// Enter the terminal phase. Only the first call has any effect.
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.session.phase == GamePhase::GameOver {
            return;
        }
        match reason {
            GameOverReason::NoHpIcons => log::warn!("Hit with no HP icons left, ending game"),
            GameOverReason::HpDepleted => log::info!("Player HP depleted"),
        }

        self.timers.clear();
        // Their expiry timers went with the rest
        self.entities.trails.retain(|t| !t.flashing);
        self.countdown_timer = None;
        self.score_timer = None;
        self.session.game_over = Some(reason);
        self.set_phase(GamePhase::GameOver);

        let score = self.session.score;
        log::info!("Game over, final score {}", score);
        self.emit(GameEvent::GameOver { reason, score });
    }

    /// Apply one fired timer
    pub(crate) fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::CountdownTick => {
                if self.session.phase == GamePhase::Countdown {
                    self.session.countdown_remaining -= 1;
                }
            }
            TimerEvent::ScoreTick => {
                if self.session.phase == GamePhase::Active {
                    self.session.score += self.session.scroll_speed.floor().max(0.0) as u64;
                }
            }
            TimerEvent::TrailExpire(trail) => {
                if !self.entities.destroy_trail(trail) {
                    log::trace!("Trail {} already gone", trail.raw());
                }
            }
        }
    }
}
