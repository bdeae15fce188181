//! Property tests for combat, cooldowns, culling and collision idempotence

use glam::Vec2;
use meteor_strafe::CooldownPolicy;
use meteor_strafe::sim::entity::{EnemySpawn, ProjectileSpawn};
use meteor_strafe::sim::{
    Category, CollisionEvent, Cooldown, EntityStore, GamePhase, GameState, PlayerHit,
    outside_left, outside_right, resolve,
};
use meteor_strafe::Tuning;
use proptest::prelude::*;

const BOUNDS: Vec2 = Vec2::new(960.0, 540.0);

proptest! {
    #[test]
    fn player_hp_stays_in_range_and_never_rises(gaps in prop::collection::vec(0.0f64..2500.0, 1..40)) {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        store.reset_hp_icons();
        let player = &mut store.player;

        let mut now = 0.0;
        let mut prev = player.hp;
        let mut accepted = 0u32;
        let mut last_accepted: Option<f64> = None;

        for gap in gaps {
            now += gap;
            let hit = player.take_hit(now, tuning.invulnerability_ms);
            prop_assert!(player.hp <= player.max_hp);
            prop_assert!(player.hp <= prev);
            prev = player.hp;

            match hit {
                PlayerHit::Ignored => {
                    let last = last_accepted.unwrap_or(f64::NEG_INFINITY);
                    prop_assert!(now - last < tuning.invulnerability_ms);
                }
                _ => {
                    accepted += 1;
                    last_accepted = Some(now);
                }
            }
        }
        let expected_hp = (tuning.player_max_hp as u32).saturating_sub(accepted);
        prop_assert_eq!(player.hp as u32, expected_hp);
    }

    #[test]
    fn cooldown_count_matches_hold_time(cooldown in 100u32..1000, hold in 1u32..10_000) {
        let mut cd = Cooldown::new(cooldown as f64, CooldownPolicy::ResetToNow);
        let fired = (0..hold).filter(|&t| cd.try_fire(t as f64)).count() as i64;
        let expected = (hold / cooldown) as i64;
        prop_assert!((fired - expected).abs() <= 1, "fired {} expected {}", fired, expected);
    }

    #[test]
    fn accumulate_policy_never_fires_more(cooldown in 100u32..1000, hold in 1u32..10_000) {
        let mut drift = Cooldown::new(cooldown as f64, CooldownPolicy::ResetToNow);
        let mut grid = Cooldown::new(cooldown as f64, CooldownPolicy::Accumulate);
        let a = (0..hold).filter(|&t| drift.try_fire(t as f64)).count() as i64;
        let b = (0..hold).filter(|&t| grid.try_fire(t as f64)).count() as i64;
        prop_assert!(b >= a);
        prop_assert!(b - (hold / cooldown) as i64 <= 1);
    }

    #[test]
    fn culling_is_strict_at_the_edges(x in -2000.0f32..2000.0, y in -600.0f32..600.0) {
        let pos = Vec2::new(x, y);
        prop_assert_eq!(outside_right(pos, BOUNDS), x > 960.0 || y.abs() > 540.0);
        prop_assert_eq!(outside_left(pos, BOUNDS), x < -960.0 || y.abs() > 540.0);
    }

    #[test]
    fn collision_batches_never_double_count(
        enemy_hp in 1i32..6,
        picks in prop::collection::vec(0usize..8, 0..24),
    ) {
        let mut state = GameState::new(11);
        state.session.phase = GamePhase::Active;
        let enemy = state.entities.spawn_enemy(EnemySpawn {
            pos: Vec2::new(500.0, 200.0),
            vel: Vec2::ZERO,
            angle: 0.0,
            extents: Vec2::splat(80.0),
            hp: enemy_hp,
            score_value: 64,
        });
        let projectiles: Vec<_> = (0..8)
            .map(|_| {
                state.entities.spawn_projectile(ProjectileSpawn {
                    pos: Vec2::new(480.0, 200.0),
                    vel: Vec2::ZERO,
                    angle: 0.0,
                    extents: Vec2::new(54.0, 9.0),
                    damage: 1,
                    with_trail: false,
                })
            })
            .collect();

        // Duplicates allowed: the same projectile may appear many times
        let batch: Vec<_> = picks
            .iter()
            .map(|&i| {
                CollisionEvent::new(
                    (projectiles[i], Category::PlayerProjectile),
                    (enemy, Category::Enemy),
                )
            })
            .collect();
        resolve(&mut state, &batch);

        let mut distinct = picks.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let hits = (distinct.len() as i32).min(enemy_hp);

        let spent = projectiles.len() - state.entities.projectiles.len();
        prop_assert_eq!(spent as i32, hits);
        if hits >= enemy_hp {
            prop_assert!(state.entities.enemy(enemy).is_none());
            prop_assert_eq!(state.session.score, 64);
        } else {
            prop_assert_eq!(state.entities.enemy(enemy).map(|e| e.hp), Some(enemy_hp - hits));
            prop_assert_eq!(state.session.score, 0);
        }
    }
}
