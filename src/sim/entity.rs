//! Entity store
//!
//! Owns the player, the live projectiles and enemies, projectile trails and
//! the world-bound walls. Entities are addressed by stable ids that are never
//! reused, so a reference to a destroyed entity simply fails to resolve.
//! Relations between entities (projectile -> trail) are ids, never owners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layers::{Category, CollisionFilter};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Physical state shared by every body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Units per physics step
    pub vel: Vec2,
    /// Orientation (radians)
    pub angle: f32,
    /// Full width and height
    pub extents: Vec2,
    pub filter: CollisionFilter,
    pub fixed_rotation: bool,
    pub alive: bool,
}

impl Body {
    pub fn new(category: Category, pos: Vec2, extents: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            extents,
            filter: CollisionFilter::for_category(category),
            fixed_rotation: false,
            alive: true,
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.filter.category
    }

    /// Move by `steps` physics steps worth of velocity
    #[inline]
    pub fn integrate(&mut self, steps: f32) {
        self.pos += self.vel * steps;
    }

    /// Axis-aligned overlap of the two bodies' extents
    pub fn overlaps(&self, other: &Body) -> bool {
        let d = (self.pos - other.pos).abs();
        let reach = (self.extents + other.extents) * 0.5;
        d.x < reach.x && d.y < reach.y
    }
}

/// Registration data handed to the physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub extents: Vec2,
    pub filter: CollisionFilter,
    pub fixed_rotation: bool,
    /// Static bodies never move (walls)
    pub is_static: bool,
    pub friction: f32,
    pub air_friction: f32,
}

impl BodyDesc {
    fn of(id: EntityId, body: &Body, is_static: bool) -> Self {
        Self {
            id,
            pos: body.pos,
            vel: body.vel,
            angle: body.angle,
            extents: body.extents,
            filter: body.filter,
            fixed_rotation: body.fixed_rotation,
            is_static,
            friction: 0.0,
            air_friction: 0.0,
        }
    }
}

/// Outbound instructions for the physics engine adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsCommand {
    Register(BodyDesc),
    Remove(EntityId),
}

/// The single player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub body: Body,
    pub max_hp: u8,
    pub hp: u8,
    /// Time of the last accepted hit
    pub last_hit_ms: Option<f64>,
    /// HUD icons, one per remaining HP once play starts
    pub hp_icons: Vec<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub body: Body,
    pub damage: i32,
    pub trail: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    pub hp: i32,
    pub score_value: u64,
}

/// Cosmetic trail that follows a projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub id: EntityId,
    /// Weak link: looked up by id each tick
    pub projectile: EntityId,
    pub pos: Vec2,
    /// Detached and briefly shown after its projectile hit something
    pub flashing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub body: Body,
}

/// Parameters for a new projectile
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub extents: Vec2,
    pub damage: i32,
    pub with_trail: bool,
}

/// Parameters for a new enemy
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub extents: Vec2,
    pub hp: i32,
    pub score_value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub trails: Vec<Trail>,
    pub walls: Vec<Wall>,
    /// Pending engine commands (not part of a snapshot)
    #[serde(skip)]
    physics: Vec<PhysicsCommand>,
    next_id: u32,
}

impl EntityStore {
    /// Create the walls and the player
    pub fn new(tuning: &Tuning) -> Self {
        let mut player_body = Body::new(Category::Player, tuning.player_start, tuning.player_extents);
        player_body.angle = std::f32::consts::FRAC_PI_2;
        player_body.fixed_rotation = true;

        let mut store = Self {
            player: Player {
                id: EntityId(0),
                body: player_body,
                max_hp: tuning.player_max_hp,
                hp: tuning.player_max_hp,
                last_hit_ms: None,
                hp_icons: Vec::new(),
            },
            projectiles: Vec::new(),
            enemies: Vec::new(),
            trails: Vec::new(),
            walls: Vec::new(),
            physics: Vec::new(),
            next_id: 1,
        };

        store.spawn_walls(tuning);
        store
            .physics
            .push(PhysicsCommand::Register(BodyDesc::of(store.player.id, &store.player.body, false)));
        store
    }

    /// Four static walls just outside each edge of the play area
    fn spawn_walls(&mut self, tuning: &Tuning) {
        let (w, h, t) = (tuning.play_width, tuning.play_height, tuning.wall_thickness);
        let walls = [
            // left, right, top, bottom
            (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
            (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h + 2.0 * t)),
            (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w + 2.0 * t, t)),
            (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w + 2.0 * t, t)),
        ];
        for (pos, extents) in walls {
            let id = self.next_entity_id();
            let mut body = Body::new(Category::WorldBound, pos, extents);
            body.fixed_rotation = true;
            self.physics
                .push(PhysicsCommand::Register(BodyDesc::of(id, &body, true)));
            self.walls.push(Wall { id, body });
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> EntityId {
        let id = self.next_entity_id();
        let mut body = Body::new(Category::PlayerProjectile, spawn.pos, spawn.extents);
        body.vel = spawn.vel;
        body.angle = spawn.angle;

        let trail = if spawn.with_trail {
            let trail_id = self.next_entity_id();
            self.trails.push(Trail {
                id: trail_id,
                projectile: id,
                pos: spawn.pos,
                flashing: false,
            });
            Some(trail_id)
        } else {
            None
        };

        self.physics
            .push(PhysicsCommand::Register(BodyDesc::of(id, &body, false)));
        self.projectiles.push(Projectile {
            id,
            body,
            damage: spawn.damage,
            trail,
        });
        id
    }

    pub fn spawn_enemy(&mut self, spawn: EnemySpawn) -> EntityId {
        let id = self.next_entity_id();
        let mut body = Body::new(Category::Enemy, spawn.pos, spawn.extents);
        body.vel = spawn.vel;
        body.angle = spawn.angle;

        self.physics
            .push(PhysicsCommand::Register(BodyDesc::of(id, &body, false)));
        self.enemies.push(Enemy {
            id,
            body,
            hp: spawn.hp,
            score_value: spawn.score_value,
        });
        id
    }

    /// Replace the player's HP icons with one per remaining HP
    pub fn reset_hp_icons(&mut self) {
        let count = self.player.hp as usize;
        let icons: Vec<EntityId> = (0..count).map(|_| self.next_entity_id()).collect();
        self.player.hp_icons = icons;
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn trail(&self, id: EntityId) -> Option<&Trail> {
        self.trails.iter().find(|t| t.id == id)
    }

    pub fn trail_mut(&mut self, id: EntityId) -> Option<&mut Trail> {
        self.trails.iter_mut().find(|t| t.id == id)
    }

    /// Remove a projectile. The caller decides what happens to its trail.
    pub fn destroy_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        let idx = self.projectiles.iter().position(|p| p.id == id)?;
        let mut projectile = self.projectiles.remove(idx);
        projectile.body.alive = false;
        self.physics.push(PhysicsCommand::Remove(id));
        Some(projectile)
    }

    pub fn destroy_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        let mut enemy = self.enemies.remove(idx);
        enemy.body.alive = false;
        self.physics.push(PhysicsCommand::Remove(id));
        Some(enemy)
    }

    /// Trails have no physics body
    pub fn destroy_trail(&mut self, id: EntityId) -> bool {
        let before = self.trails.len();
        self.trails.retain(|t| t.id != id);
        self.trails.len() != before
    }

    /// Any live entity: bodies, trails and HP icons
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.category_of(id).is_some()
            || self.trail(id).is_some()
            || self.player.hp_icons.contains(&id)
    }

    /// Category of a live body
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        if id == self.player.id {
            return Some(Category::Player);
        }
        if self.projectile(id).is_some() {
            return Some(Category::PlayerProjectile);
        }
        if self.enemy(id).is_some() {
            return Some(Category::Enemy);
        }
        self.walls
            .iter()
            .any(|w| w.id == id)
            .then_some(Category::WorldBound)
    }

    /// Move every dynamic body by `steps` physics steps and keep the player
    /// inside the play area
    pub fn integrate(&mut self, steps: f32, bounds: Vec2) {
        let player = &mut self.player.body;
        player.integrate(steps);
        let half = player.extents * 0.5;
        let min = half.min(bounds * 0.5);
        let max = (bounds - half).max(min);
        player.pos = player.pos.clamp(min, max);

        for projectile in &mut self.projectiles {
            projectile.body.integrate(steps);
        }
        for enemy in &mut self.enemies {
            enemy.body.integrate(steps);
        }
    }

    /// Following trails copy their projectile's position
    pub fn sync_trails(&mut self) {
        let projectiles = &self.projectiles;
        for trail in self.trails.iter_mut().filter(|t| !t.flashing) {
            if let Some(projectile) = projectiles.iter().find(|p| p.id == trail.projectile) {
                trail.pos = projectile.body.pos;
            }
        }
    }

    pub fn drain_physics_commands(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.physics)
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.enemies.sort_by_key(|e| e.id);
        self.trails.sort_by_key(|t| t.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile_at(pos: Vec2, with_trail: bool) -> ProjectileSpawn {
        ProjectileSpawn {
            pos,
            vel: Vec2::new(12.0, 0.0),
            angle: std::f32::consts::FRAC_PI_2,
            extents: Vec2::new(54.0, 9.0),
            damage: 1,
            with_trail,
        }
    }

    #[test]
    fn test_new_registers_walls_and_player() {
        let mut store = EntityStore::new(&Tuning::default());
        let commands = store.drain_physics_commands();
        assert_eq!(commands.len(), 5);
        let statics = commands
            .iter()
            .filter(|c| matches!(c, PhysicsCommand::Register(d) if d.is_static))
            .count();
        assert_eq!(statics, 4);
        assert!(store.drain_physics_commands().is_empty());
        assert_eq!(store.category_of(store.player.id), Some(Category::Player));
        assert_eq!(store.player.hp, 3);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = EntityStore::new(&Tuning::default());
        let a = store.spawn_projectile(projectile_at(Vec2::ZERO, false));
        assert!(store.destroy_projectile(a).is_some());
        let b = store.spawn_projectile(projectile_at(Vec2::ZERO, false));
        assert_ne!(a, b);
        assert!(!store.is_alive(a));
        assert!(store.is_alive(b));
    }

    #[test]
    fn test_destroy_twice_is_noop() {
        let mut store = EntityStore::new(&Tuning::default());
        let id = store.spawn_enemy(EnemySpawn {
            pos: Vec2::new(500.0, 100.0),
            vel: Vec2::new(-3.0, 0.0),
            angle: 0.0,
            extents: Vec2::splat(80.0),
            hp: 3,
            score_value: 64,
        });
        store.drain_physics_commands();

        let dead = store.destroy_enemy(id).expect("enemy was alive");
        assert!(!dead.body.alive);
        assert!(store.destroy_enemy(id).is_none());
        assert_eq!(store.drain_physics_commands(), vec![PhysicsCommand::Remove(id)]);
    }

    #[test]
    fn test_registration_has_no_friction() {
        let mut store = EntityStore::new(&Tuning::default());
        store.drain_physics_commands();
        store.spawn_projectile(projectile_at(Vec2::new(10.0, 10.0), true));
        let commands = store.drain_physics_commands();
        let [PhysicsCommand::Register(desc)] = commands.as_slice() else {
            panic!("expected one registration, got {commands:?}");
        };
        assert_eq!(desc.friction, 0.0);
        assert_eq!(desc.air_friction, 0.0);
        assert_eq!(desc.filter.category, Category::PlayerProjectile);
    }

    #[test]
    fn test_trail_follows_projectile() {
        let mut store = EntityStore::new(&Tuning::default());
        let id = store.spawn_projectile(projectile_at(Vec2::new(100.0, 100.0), true));
        let trail_id = store.projectile(id).and_then(|p| p.trail).expect("trail");

        store.integrate(1.0, Vec2::new(960.0, 540.0));
        store.sync_trails();
        assert_eq!(store.trail(trail_id).map(|t| t.pos), Some(Vec2::new(112.0, 100.0)));

        // Orphaned trail keeps its last position
        store.destroy_projectile(id);
        store.sync_trails();
        assert_eq!(store.trail(trail_id).map(|t| t.pos), Some(Vec2::new(112.0, 100.0)));
    }

    #[test]
    fn test_player_clamped_to_play_area() {
        let mut store = EntityStore::new(&Tuning::default());
        store.player.body.vel = Vec2::new(-10_000.0, 10_000.0);
        store.integrate(1.0, Vec2::new(960.0, 540.0));
        let half = store.player.body.extents * 0.5;
        assert_eq!(store.player.body.pos, Vec2::new(half.x, 540.0 - half.y));
    }

    #[test]
    fn test_overlaps() {
        let a = Body::new(Category::Player, Vec2::ZERO, Vec2::splat(10.0));
        let b = Body::new(Category::Enemy, Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        let c = Body::new(Category::Enemy, Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_reset_hp_icons() {
        let mut store = EntityStore::new(&Tuning::default());
        store.reset_hp_icons();
        assert_eq!(store.player.hp_icons.len(), 3);

        let icons = store.player.hp_icons.clone();
        assert!(icons.iter().all(|&id| store.is_alive(id)));
        assert_eq!(store.category_of(icons[0]), None);

        store.player.hp = 1;
        store.reset_hp_icons();
        assert!(icons.iter().all(|&id| !store.is_alive(id)));
    }
}
