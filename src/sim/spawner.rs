//! Cooldown-gated spawners for projectiles and enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EnemySpawn, EntityId, EntityStore, ProjectileSpawn};
use crate::tuning::{CooldownPolicy, Tuning};

/// Minimum spacing between two firings of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// `None` until the first firing (ready immediately)
    pub last_fired_ms: Option<f64>,
    pub cooldown_ms: f64,
    pub policy: CooldownPolicy,
}

impl Cooldown {
    pub fn new(cooldown_ms: f64, policy: CooldownPolicy) -> Self {
        Self {
            last_fired_ms: None,
            cooldown_ms,
            policy,
        }
    }

    /// Strictly more than one cooldown since the last firing
    pub fn is_ready(&self, now_ms: f64) -> bool {
        match self.last_fired_ms {
            None => true,
            Some(last) => now_ms > last + self.cooldown_ms,
        }
    }

    /// Fire if ready and re-arm. Returns whether it fired.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if !self.is_ready(now_ms) {
            return false;
        }
        self.last_fired_ms = Some(match (self.policy, self.last_fired_ms) {
            (CooldownPolicy::Accumulate, Some(last)) => {
                let next = last + self.cooldown_ms;
                // A long idle gap must not bank a burst of shots
                if now_ms - next > self.cooldown_ms { now_ms } else { next }
            }
            _ => now_ms,
        });
        true
    }

    /// Start the cooldown as if it had just fired
    pub fn arm(&mut self, now_ms: f64) {
        self.last_fired_ms = Some(now_ms);
    }
}

/// The two independent spawners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawners {
    pub projectile: Cooldown,
    pub enemy: Cooldown,
}

impl Spawners {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            projectile: Cooldown::new(tuning.projectile_cooldown_ms, tuning.cooldown_policy),
            enemy: Cooldown::new(tuning.enemy_cooldown_ms, tuning.cooldown_policy),
        }
    }
}

/// Fire from the player's position, travelling right, sprite turned 90 degrees
pub fn spawn_projectile(store: &mut EntityStore, tuning: &Tuning) -> EntityId {
    let id = store.spawn_projectile(ProjectileSpawn {
        pos: store.player.body.pos,
        vel: Vec2::new(tuning.projectile_speed, 0.0),
        angle: std::f32::consts::FRAC_PI_2,
        extents: tuning.projectile_extents,
        damage: tuning.projectile_damage,
        with_trail: tuning.projectile_trails,
    });
    log::debug!("Projectile {} fired", id.raw());
    id
}

/// Spawn an enemy just off the right edge at a random height, drifting left
pub fn spawn_enemy<R: Rng>(store: &mut EntityStore, tuning: &Tuning, rng: &mut R) -> EntityId {
    let speed = rng.random_range(tuning.enemy_speed_min..=tuning.enemy_speed_max) as f32
        * tuning.difficulty_level as f32;
    let angle_deg = rng.random_range(0..360u32);
    // Integer heights, like the rest of the spawn rolls
    let y = rng.random_range(0..=tuning.play_height.floor() as u32);

    let id = store.spawn_enemy(EnemySpawn {
        pos: Vec2::new(tuning.play_width + tuning.enemy_spawn_margin, y as f32),
        vel: Vec2::new(-speed, 0.0),
        angle: (angle_deg as f32).to_radians(),
        extents: tuning.enemy_extents,
        hp: tuning.enemy_hp,
        score_value: tuning.enemy_score,
    });
    log::debug!("Enemy {} spawned at y={} speed={}", id.raw(), y, speed);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cooldown_strict_boundary() {
        let mut cd = Cooldown::new(300.0, CooldownPolicy::ResetToNow);
        assert!(cd.try_fire(0.0));
        assert!(!cd.try_fire(250.0));
        assert!(!cd.try_fire(300.0));
        assert!(cd.try_fire(301.0));
        assert_eq!(cd.last_fired_ms, Some(301.0));
    }

    #[test]
    fn test_reset_to_now_drifts() {
        let mut cd = Cooldown::new(100.0, CooldownPolicy::ResetToNow);
        assert!(cd.try_fire(0.0));
        assert!(cd.try_fire(116.0));
        assert_eq!(cd.last_fired_ms, Some(116.0));
    }

    #[test]
    fn test_accumulate_stays_on_grid() {
        let mut cd = Cooldown::new(100.0, CooldownPolicy::Accumulate);
        assert!(cd.try_fire(0.0));
        assert!(cd.try_fire(116.0));
        assert_eq!(cd.last_fired_ms, Some(100.0));
        assert!(cd.try_fire(216.0));
        assert_eq!(cd.last_fired_ms, Some(200.0));
    }

    #[test]
    fn test_accumulate_does_not_bank_shots() {
        let mut cd = Cooldown::new(100.0, CooldownPolicy::Accumulate);
        assert!(cd.try_fire(0.0));
        assert!(cd.try_fire(5000.0));
        assert_eq!(cd.last_fired_ms, Some(5000.0));
        assert!(!cd.try_fire(5001.0));
    }

    #[test]
    fn test_arm_delays_first_firing() {
        let mut cd = Cooldown::new(2500.0, CooldownPolicy::ResetToNow);
        cd.arm(1000.0);
        assert!(!cd.try_fire(3500.0));
        assert!(cd.try_fire(3501.0));
    }

    #[test]
    fn test_spawn_projectile_from_player() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let id = spawn_projectile(&mut store, &tuning);
        let p = store.projectile(id).expect("spawned");
        assert_eq!(p.body.pos, store.player.body.pos);
        assert_eq!(p.body.vel, Vec2::new(12.0, 0.0));
        assert_eq!(p.damage, 1);
        assert!((p.body.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(p.trail.is_some());
    }

    #[test]
    fn test_spawn_enemy_ranges() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..200 {
            let id = spawn_enemy(&mut store, &tuning, &mut rng);
            let e = store.enemy(id).expect("spawned");
            assert_eq!(e.body.pos.x, 1010.0);
            assert!((0.0..=540.0).contains(&e.body.pos.y));
            assert!((-5.0..=-3.0).contains(&e.body.vel.x));
            assert_eq!(e.body.vel.y, 0.0);
            assert!((0.0..std::f32::consts::TAU).contains(&e.body.angle));
            assert_eq!(e.hp, 3);
            assert_eq!(e.score_value, 64);
        }
    }

    #[test]
    fn test_difficulty_scales_speed() {
        let tuning = Tuning {
            difficulty_level: 2,
            ..Default::default()
        };
        let mut store = EntityStore::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let id = spawn_enemy(&mut store, &tuning, &mut rng);
            let vx = store.enemy(id).map(|e| e.body.vel.x).unwrap_or_default();
            assert!([-6.0, -8.0, -10.0].contains(&vx));
        }
    }

    #[test]
    fn test_huge_difficulty_does_not_overflow() {
        let tuning = Tuning {
            difficulty_level: u32::MAX,
            ..Default::default()
        };
        let mut store = EntityStore::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        let id = spawn_enemy(&mut store, &tuning, &mut rng);
        let vx = store.enemy(id).map(|e| e.body.vel.x).unwrap_or_default();
        assert!(vx.is_finite() && vx < 0.0);
    }
}
