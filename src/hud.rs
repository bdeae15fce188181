//! Presentation snapshot
//!
//! Everything an external renderer needs from the simulation, in one
//! serializable struct. The simulation never draws anything itself.

use serde::{Deserialize, Serialize};

use crate::format_score;
use crate::sim::{GameOverReason, GamePhase, GameState};

/// What the countdown text shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownDisplay {
    Hidden,
    Number(i32),
    Go,
}

impl CountdownDisplay {
    pub fn from_remaining(phase: GamePhase, remaining: i32) -> Self {
        if phase != GamePhase::Countdown {
            return CountdownDisplay::Hidden;
        }
        match remaining {
            n if n >= 1 => CountdownDisplay::Number(n),
            0 => CountdownDisplay::Go,
            _ => CountdownDisplay::Hidden,
        }
    }

    pub fn text(&self) -> Option<String> {
        match self {
            CountdownDisplay::Hidden => None,
            CountdownDisplay::Number(n) => Some(n.to_string()),
            CountdownDisplay::Go => Some("GO!".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    /// Zero-padded score
    pub score_text: String,
    pub score_visible: bool,
    pub hp_icons: usize,
    /// Tutorial text before the first fire press
    pub intro_visible: bool,
    pub countdown: CountdownDisplay,
    pub scroll_offset: f32,
    pub game_over: Option<GameOverReason>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let session = &state.session;
        Self {
            phase: session.phase,
            score_text: format_score(session.score),
            score_visible: matches!(session.phase, GamePhase::Active | GamePhase::GameOver),
            hp_icons: state.entities.player.hp_icons.len(),
            intro_visible: session.phase == GamePhase::Intro,
            countdown: CountdownDisplay::from_remaining(session.phase, session.countdown_remaining),
            scroll_offset: session.scroll_offset,
            game_over: session.game_over,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
