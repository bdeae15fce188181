//! Positional removal of entities that left the play area
//!
//! Independent of the wall bodies: walls would stop entities, not remove them.

use glam::Vec2;

use super::entity::{EntityId, EntityStore};

/// Projectiles leave through the right edge
#[inline]
pub fn outside_right(pos: Vec2, bounds: Vec2) -> bool {
    pos.x > bounds.x || pos.y.abs() > bounds.y
}

/// Enemies leave through the left edge (one play width past it)
#[inline]
pub fn outside_left(pos: Vec2, bounds: Vec2) -> bool {
    pos.x < -bounds.x || pos.y.abs() > bounds.y
}

/// Destroy everything out of bounds. Culled projectiles take their trail with
/// them. Returns the culled ids.
pub fn cull(store: &mut EntityStore, bounds: Vec2) -> Vec<EntityId> {
    let projectiles: Vec<EntityId> = store
        .projectiles
        .iter()
        .filter(|p| outside_right(p.body.pos, bounds))
        .map(|p| p.id)
        .collect();
    let enemies: Vec<EntityId> = store
        .enemies
        .iter()
        .filter(|e| outside_left(e.body.pos, bounds))
        .map(|e| e.id)
        .collect();

    for &id in &projectiles {
        if let Some(trail) = store.destroy_projectile(id).and_then(|p| p.trail) {
            store.destroy_trail(trail);
        }
    }
    for &id in &enemies {
        store.destroy_enemy(id);
    }

    let mut culled = projectiles;
    culled.extend(enemies);
    if !culled.is_empty() {
        log::debug!("Culled {} entities", culled.len());
    }
    culled
}
