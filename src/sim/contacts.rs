//! Headless contact detection
//!
//! Stand-in for the physics engine when running without one: reports
//! pair-start events for overlapping bodies whose filters accept each other.
//! Walls are left out since wall contacts carry no gameplay rule.

use std::collections::HashSet;

use super::collision::CollisionEvent;
use super::entity::{Body, EntityId, EntityStore};

#[derive(Debug, Clone, Default)]
pub struct HeadlessContacts {
    /// Pairs touching on the previous step, smaller id first
    touching: HashSet<(EntityId, EntityId)>,
}

impl HeadlessContacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs that started touching since the last call
    pub fn step(&mut self, store: &EntityStore) -> Vec<CollisionEvent> {
        let mut bodies: Vec<(EntityId, &Body)> = Vec::with_capacity(
            1 + store.projectiles.len() + store.enemies.len(),
        );
        bodies.push((store.player.id, &store.player.body));
        bodies.extend(store.projectiles.iter().map(|p| (p.id, &p.body)));
        bodies.extend(store.enemies.iter().map(|e| (e.id, &e.body)));

        let mut now_touching = HashSet::new();
        let mut started = Vec::new();

        for (i, &(id_a, a)) in bodies.iter().enumerate() {
            for &(id_b, b) in &bodies[i + 1..] {
                if !a.filter.can_collide(&b.filter) || !a.overlaps(b) {
                    continue;
                }
                let key = if id_a < id_b { (id_a, id_b) } else { (id_b, id_a) };
                if !self.touching.contains(&key) {
                    started.push(CollisionEvent::new(
                        (id_a, a.category()),
                        (id_b, b.category()),
                    ));
                }
                now_touching.insert(key);
            }
        }

        self.touching = now_touching;
        started
    }
}
