//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::resolve_pending;
use super::culling::cull;
use super::spawner::{spawn_enemy, spawn_projectile};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::PHYSICS_STEP_MS;

/// Debounced key states for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// WASD alternates
    pub a: bool,
    pub d: bool,
    pub w: bool,
    pub s: bool,
    /// Space
    pub fire: bool,
}

impl TickInput {
    pub fn firing() -> Self {
        Self {
            fire: true,
            ..Default::default()
        }
    }

    /// Unit direction per axis (-1, 0, 1). Left/up win over right/down.
    pub fn direction(&self) -> Vec2 {
        let x = if self.left || self.a {
            -1.0
        } else if self.right || self.d {
            1.0
        } else {
            0.0
        };
        let y = if self.up || self.w {
            -1.0
        } else if self.down || self.s {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Advance the game state by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();

    // Terminal: no spawning, movement or scoring
    if state.is_game_over() {
        state.collisions.drain();
        return;
    }

    state.clock.advance(dt_ms);
    let now = state.clock.now_ms;
    let delta = state.clock.delta_ms;

    for event in state.timers.due(now) {
        state.on_timer(event);
    }

    let fire_pressed = input.fire && !state.prev_fire;
    state.prev_fire = input.fire;

    match state.session.phase {
        GamePhase::Intro => {
            if fire_pressed {
                state.begin_countdown();
            }
        }
        GamePhase::Countdown => state.update_countdown(),
        GamePhase::Active => {
            let session = &mut state.session;
            session.scroll_speed = (session.scroll_speed + state.tuning.scroll_speed_step)
                .min(state.tuning.scroll_speed_max);
        }
        GamePhase::GameOver => {}
    }
    state.session.scroll_offset += state.session.scroll_speed;

    // Player velocity is per physics step, like every other body
    let speed = state.tuning.player_speed * (delta / 1000.0) as f32;
    state.entities.player.body.vel = input.direction() * speed;
    let bounds = state.bounds();
    state
        .entities
        .integrate((delta / PHYSICS_STEP_MS) as f32, bounds);

    if input.fire && state.spawners.projectile.try_fire(now) {
        let id = spawn_projectile(&mut state.entities, &state.tuning);
        state.emit(GameEvent::ProjectileFired { id });
    }
    if state.session.phase == GamePhase::Active && state.spawners.enemy.try_fire(now) {
        let id = spawn_enemy(&mut state.entities, &state.tuning, &mut state.rng);
        state.emit(GameEvent::EnemySpawned { id });
    }

    state.entities.sync_trails();

    for id in cull(&mut state.entities, bounds) {
        state.emit(GameEvent::Culled { id });
    }

    resolve_pending(state);

    // Ensure deterministic ordering
    state.entities.normalize_order();
}
