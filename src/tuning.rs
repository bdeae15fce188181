//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be configured without
//! touching simulation code. Values are validated once, at configuration time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a cooldown timer is re-armed after it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CooldownPolicy {
    /// `last_fired = now` (drifts by up to one tick per shot)
    #[default]
    ResetToNow,
    /// `last_fired += cooldown` (no drift while the trigger stays held)
    Accumulate,
}

impl CooldownPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CooldownPolicy::ResetToNow => "reset_to_now",
            CooldownPolicy::Accumulate => "accumulate",
        }
    }
}

/// Game balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    /// Thickness of the world-bound wall bodies
    pub wall_thickness: f32,

    // === Player ===
    pub player_start: Vec2,
    /// Units per second
    pub player_speed: f32,
    pub player_max_hp: u8,
    pub invulnerability_ms: f64,
    pub player_extents: Vec2,

    // === Projectiles ===
    pub projectile_cooldown_ms: f64,
    /// Units per physics step
    pub projectile_speed: f32,
    pub projectile_damage: i32,
    pub projectile_trails: bool,
    pub trail_flash_ms: f64,
    pub projectile_extents: Vec2,

    // === Enemies ===
    pub enemy_cooldown_ms: f64,
    /// Spawn distance beyond the right edge
    pub enemy_spawn_margin: f32,
    pub enemy_speed_min: u32,
    pub enemy_speed_max: u32,
    pub enemy_hp: i32,
    pub enemy_score: u64,
    pub difficulty_level: u32,
    pub enemy_extents: Vec2,

    // === Session pacing ===
    pub countdown_start: i32,
    pub countdown_interval_ms: f64,
    pub score_interval_ms: f64,
    pub scroll_speed_start: f32,
    pub scroll_speed_max: f32,
    pub scroll_speed_step: f32,
    pub cooldown_policy: CooldownPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: 960.0,
            play_height: 540.0,
            wall_thickness: 64.0,

            player_start: Vec2::new(100.0, 230.0),
            player_speed: 500.0,
            player_max_hp: 3,
            invulnerability_ms: 1000.0,
            // Ship sprite rotated 90 degrees
            player_extents: Vec2::new(75.0, 99.0),

            projectile_cooldown_ms: 300.0,
            projectile_speed: 12.0,
            projectile_damage: 1,
            projectile_trails: true,
            trail_flash_ms: 100.0,
            projectile_extents: Vec2::new(54.0, 9.0),

            enemy_cooldown_ms: 2500.0,
            enemy_spawn_margin: 50.0,
            enemy_speed_min: 3,
            enemy_speed_max: 5,
            enemy_hp: 3,
            enemy_score: 64,
            difficulty_level: 1,
            enemy_extents: Vec2::new(101.0, 84.0),

            countdown_start: 3,
            countdown_interval_ms: 1000.0,
            score_interval_ms: 100.0,
            scroll_speed_start: 1.0,
            scroll_speed_max: 2.0,
            scroll_speed_step: 0.01,
            cooldown_policy: CooldownPolicy::ResetToNow,
        }
    }
}

impl Tuning {
    /// Parse a JSON tuning document (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject parameters the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("play_width", self.play_width as f64)?;
        positive("play_height", self.play_height as f64)?;
        non_negative("wall_thickness", self.wall_thickness as f64)?;

        finite("player_start.x", self.player_start.x as f64)?;
        finite("player_start.y", self.player_start.y as f64)?;
        non_negative("player_speed", self.player_speed as f64)?;
        positive("player_max_hp", self.player_max_hp as f64)?;
        non_negative("invulnerability_ms", self.invulnerability_ms)?;
        extents("player_extents", self.player_extents)?;

        non_negative("projectile_cooldown_ms", self.projectile_cooldown_ms)?;
        non_negative("projectile_speed", self.projectile_speed as f64)?;
        positive("projectile_damage", self.projectile_damage as f64)?;
        non_negative("trail_flash_ms", self.trail_flash_ms)?;
        extents("projectile_extents", self.projectile_extents)?;

        non_negative("enemy_cooldown_ms", self.enemy_cooldown_ms)?;
        non_negative("enemy_spawn_margin", self.enemy_spawn_margin as f64)?;
        if self.enemy_speed_min > self.enemy_speed_max {
            return Err(ConfigError::InvertedRange {
                field: "enemy_speed",
                min: self.enemy_speed_min as f64,
                max: self.enemy_speed_max as f64,
            });
        }
        positive("enemy_hp", self.enemy_hp as f64)?;
        positive("difficulty_level", self.difficulty_level as f64)?;
        if self
            .enemy_speed_max
            .checked_mul(self.difficulty_level)
            .is_none()
        {
            return Err(ConfigError::TooLarge {
                field: "enemy_speed_max * difficulty_level",
            });
        }
        extents("enemy_extents", self.enemy_extents)?;

        non_negative("countdown_start", self.countdown_start as f64)?;
        positive("countdown_interval_ms", self.countdown_interval_ms)?;
        positive("score_interval_ms", self.score_interval_ms)?;
        non_negative("scroll_speed_start", self.scroll_speed_start as f64)?;
        non_negative("scroll_speed_step", self.scroll_speed_step as f64)?;
        if self.scroll_speed_start > self.scroll_speed_max {
            return Err(ConfigError::InvertedRange {
                field: "scroll_speed",
                min: self.scroll_speed_start as f64,
                max: self.scroll_speed_max as f64,
            });
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn extents(field: &'static str, value: Vec2) -> Result<(), ConfigError> {
    positive(field, value.x as f64)?;
    positive(field, value.y as f64)
}
