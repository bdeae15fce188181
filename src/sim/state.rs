//! Game state and core simulation types
//!
//! Everything a session needs lives in `GameState`; there is no global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, Scheduler, TimerId};
use super::collision::CollisionQueue;
use super::combat::GameOverReason;
use super::entity::{EntityId, EntityStore};
use super::spawner::Spawners;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Tutorial text shown, waiting for the first fire press
    Intro,
    /// 3, 2, 1, GO
    Countdown,
    /// Active gameplay
    Active,
    /// Run ended (terminal)
    GameOver,
}

/// Something that happened during a tick, for presentation and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ProjectileFired { id: EntityId },
    EnemySpawned { id: EntityId },
    EnemyHit { id: EntityId, hp_left: i32 },
    EnemyDestroyed { id: EntityId, score_value: u64 },
    PlayerHit { hp_left: u8 },
    Culled { id: EntityId },
    GameOver { reason: GameOverReason, score: u64 },
}

/// Score, phase and pacing of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// 3, 2, 1 are shown as numbers, 0 as GO, -1 ends the countdown
    pub countdown_remaining: i32,
    pub score: u64,
    pub scroll_speed: f32,
    /// Background offset accumulated from scroll speed
    pub scroll_offset: f32,
    pub game_over: Option<GameOverReason>,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Intro,
            countdown_remaining: tuning.countdown_start,
            score: 0,
            scroll_speed: tuning.scroll_speed_start,
            scroll_offset: 0.0,
            game_over: None,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub clock: Clock,
    pub timers: Scheduler,
    pub entities: EntityStore,
    pub spawners: Spawners,
    pub session: Session,
    /// Collision-pair-start events waiting for the next tick
    pub collisions: CollisionQueue,
    pub(crate) rng: Pcg32,
    /// Events produced by the current tick
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    /// Fire state on the previous tick, for edge detection
    pub(crate) prev_fire: bool,
    pub(crate) countdown_timer: Option<TimerId>,
    pub(crate) score_timer: Option<TimerId>,
}

impl GameState {
    /// Create a new game state with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new game state with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            clock: Clock::default(),
            timers: Scheduler::new(),
            entities: EntityStore::new(&tuning),
            spawners: Spawners::new(&tuning),
            session: Session::new(&tuning),
            collisions: CollisionQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            prev_fire: false,
            countdown_timer: None,
            score_timer: None,
            tuning,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms
    }

    /// Play area size
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.play_width, self.tuning.play_height)
    }

    pub fn is_game_over(&self) -> bool {
        self.session.phase == GamePhase::GameOver
    }

    /// Events from the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
