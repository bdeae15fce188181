//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input-device or physics-engine dependencies

pub mod clock;
pub mod collision;
pub mod combat;
pub mod contacts;
pub mod culling;
pub mod entity;
pub mod layers;
mod phase;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{Clock, FixedStep, Scheduler, TimerEvent, TimerId};
pub use collision::{CollisionEvent, CollisionQueue, ContactRef, PairKind, classify, resolve};
pub use combat::{DamageOutcome, GameOverReason, PlayerHit, apply_damage};
pub use contacts::HeadlessContacts;
pub use culling::{cull, outside_left, outside_right};
pub use entity::{
    Body, BodyDesc, Enemy, EntityId, EntityStore, PhysicsCommand, Player, Projectile, Trail,
};
pub use layers::{Category, CollisionFilter, CollisionMask, collides};
pub use spawner::{Cooldown, Spawners};
pub use state::{GameEvent, GamePhase, GameState, Session};
pub use tick::{TickInput, tick};
