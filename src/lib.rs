//! Meteor Strafe - simulation core of a side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, combat, game phases)
//! - `tuning`: Data-driven game balance
//! - `hud`: Snapshot of everything an external renderer needs to draw
//! - `error`: Configuration errors

pub mod error;
pub mod hud;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use hud::{CountdownDisplay, HudSnapshot};
pub use tuning::{CooldownPolicy, Tuning};

/// Fixed simulation constants (not tunable)
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Velocities are expressed in units per physics step of this length
    pub const PHYSICS_STEP_MS: f64 = 1000.0 / 60.0;
    /// Width of the zero-padded score text
    pub const SCORE_DIGITS: usize = 6;
}

/// Zero-pad a score to the HUD width (longer scores are printed in full)
pub fn format_score(score: u64) -> String {
    format!("{:0width$}", score, width = consts::SCORE_DIGITS)
}
