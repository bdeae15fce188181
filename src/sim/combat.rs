//! Damage, health and the player's invulnerability window

use serde::{Deserialize, Serialize};

use super::entity::Player;

/// Result of applying damage to a destructible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    pub hp: i32,
    pub destroyed: bool,
}

/// `hp - damage`, destroyed at zero or below
#[inline]
pub fn apply_damage(hp: i32, damage: i32) -> DamageOutcome {
    let hp = hp.saturating_sub(damage);
    DamageOutcome {
        hp,
        destroyed: hp <= 0,
    }
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Last HP lost to a hit
    HpDepleted,
    /// A hit arrived with no HP icon left to remove
    NoHpIcons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHit {
    /// Still inside the invulnerability window
    Ignored,
    Damaged { hp_left: u8 },
    Fatal(GameOverReason),
}

impl Player {
    pub fn is_invulnerable(&self, now_ms: f64, window_ms: f64) -> bool {
        self.last_hit_ms
            .is_some_and(|last| now_ms - last < window_ms)
    }

    /// Take one hit: removes one HP and one HP icon unless invulnerable
    pub fn take_hit(&mut self, now_ms: f64, window_ms: f64) -> PlayerHit {
        if self.is_invulnerable(now_ms, window_ms) {
            return PlayerHit::Ignored;
        }
        self.last_hit_ms = Some(now_ms);

        if self.hp_icons.pop().is_none() {
            self.hp = 0;
            return PlayerHit::Fatal(GameOverReason::NoHpIcons);
        }
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            PlayerHit::Fatal(GameOverReason::HpDepleted)
        } else {
            PlayerHit::Damaged { hp_left: self.hp }
        }
    }
}
