//! Collision resolution
//!
//! The physics engine reports pairs that started touching. They are queued and
//! resolved as one batch per tick. Pairs arrive in no particular order and the
//! same entity may appear in several of them, so every rule re-checks that
//! both sides are still alive before acting.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::clock::TimerEvent;
use super::combat::{PlayerHit, apply_damage};
use super::entity::EntityId;
use super::layers::Category;
use super::state::{GameEvent, GameState};

/// One side of a contact, as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRef {
    pub id: EntityId,
    pub category: Category,
}

/// A collision-pair-start event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: ContactRef,
    pub b: ContactRef,
}

impl CollisionEvent {
    pub fn new(a: (EntityId, Category), b: (EntityId, Category)) -> Self {
        Self {
            a: ContactRef {
                id: a.0,
                category: a.1,
            },
            b: ContactRef {
                id: b.0,
                category: b.1,
            },
        }
    }
}

/// Gameplay meaning of an unordered category pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    PlayerEnemy { enemy: EntityId },
    ProjectileEnemy { projectile: EntityId, enemy: EntityId },
    /// Resolved physically by the engine, no gameplay effect
    Structural,
}

pub fn classify(event: &CollisionEvent) -> PairKind {
    use Category::*;
    let (a, b) = (event.a, event.b);
    match (a.category, b.category) {
        (Player, Enemy) => PairKind::PlayerEnemy { enemy: b.id },
        (Enemy, Player) => PairKind::PlayerEnemy { enemy: a.id },
        (PlayerProjectile, Enemy) => PairKind::ProjectileEnemy {
            projectile: a.id,
            enemy: b.id,
        },
        (Enemy, PlayerProjectile) => PairKind::ProjectileEnemy {
            projectile: b.id,
            enemy: a.id,
        },
        _ => PairKind::Structural,
    }
}

/// Pair-start events delivered by the engine between ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionQueue {
    pending: VecDeque<CollisionEvent>,
}

impl CollisionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CollisionEvent) {
        self.pending.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        self.pending.extend(events);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        self.pending.drain(..).collect()
    }
}

/// Resolve every queued pair against the current state
pub fn resolve_pending(state: &mut GameState) {
    let batch = state.collisions.drain();
    resolve(state, &batch);
}

/// Resolve a batch of pair-start events
pub fn resolve(state: &mut GameState, batch: &[CollisionEvent]) {
    for event in batch {
        if state.is_game_over() {
            log::trace!("Dropping {} collisions after game over", batch.len());
            return;
        }
        match classify(event) {
            PairKind::PlayerEnemy { enemy } => player_enemy(state, enemy),
            PairKind::ProjectileEnemy { projectile, enemy } => {
                projectile_enemy(state, projectile, enemy)
            }
            PairKind::Structural => {
                log::trace!("Structural contact {:?} x {:?}", event.a, event.b);
            }
        }
    }
}

fn player_enemy(state: &mut GameState, enemy: EntityId) {
    if state.entities.enemy(enemy).is_none() {
        log::trace!("Player contact with stale enemy {}", enemy.raw());
        return;
    }

    let now = state.now_ms();
    let window = state.tuning.invulnerability_ms;
    match state.entities.player.take_hit(now, window) {
        PlayerHit::Ignored => {
            log::trace!("Player invulnerable, contact with enemy {} ignored", enemy.raw());
        }
        PlayerHit::Damaged { hp_left } => {
            log::debug!("Player hit by enemy {}, {} HP left", enemy.raw(), hp_left);
            state.emit(GameEvent::PlayerHit { hp_left });
        }
        PlayerHit::Fatal(reason) => {
            state.emit(GameEvent::PlayerHit { hp_left: 0 });
            state.end_game(reason);
        }
    }
}

fn projectile_enemy(state: &mut GameState, projectile: EntityId, enemy: EntityId) {
    let Some(damage) = state.entities.projectile(projectile).map(|p| p.damage) else {
        log::trace!("Stale projectile {} ignored", projectile.raw());
        return;
    };
    let Some(target) = state.entities.enemy_mut(enemy) else {
        log::trace!("Stale enemy {} ignored", enemy.raw());
        return;
    };

    let outcome = apply_damage(target.hp, damage);
    target.hp = outcome.hp;

    // Projectiles are single-use
    if let Some(spent) = state.entities.destroy_projectile(projectile) {
        if let Some(trail_id) = spent.trail {
            flash_trail(state, trail_id, spent.body.pos);
        }
    }

    if outcome.destroyed {
        if let Some(dead) = state.entities.destroy_enemy(enemy) {
            state.session.score += dead.score_value;
            log::debug!(
                "Enemy {} destroyed (+{}), score {}",
                enemy.raw(),
                dead.score_value,
                state.session.score
            );
            state.emit(GameEvent::EnemyDestroyed {
                id: enemy,
                score_value: dead.score_value,
            });
        }
    } else {
        state.emit(GameEvent::EnemyHit {
            id: enemy,
            hp_left: outcome.hp,
        });
    }
}

/// Detach the trail at the impact point and remove it shortly after
fn flash_trail(state: &mut GameState, trail_id: EntityId, at: glam::Vec2) {
    let Some(trail) = state.entities.trail_mut(trail_id) else {
        return;
    };
    trail.flashing = true;
    trail.pos = at;

    let now = state.now_ms();
    let delay = state.tuning.trail_flash_ms;
    state
        .timers
        .schedule_once(now, delay, TimerEvent::TrailExpire(trail_id));
}
