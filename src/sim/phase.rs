//! Game phase state machine
//!
//! `Menu -> Playing -> {Dead, Won} -> (reset) -> Menu`. A manual reset may
//! jump back to `Menu` from any phase.

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first jump/launch input
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Lethal collision happened; waits for death effects to drain
    Dead,
    /// Goal reached; only the platformer gets here
    Won,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Dead => "dead",
            GamePhase::Won => "won",
        }
    }

    /// Physics, collision and scoring only run while playing
    pub fn simulates(&self) -> bool {
        *self == GamePhase::Playing
    }

    /// Dead and Won block further triggers until reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Dead | GamePhase::Won)
    }

    /// Menu -> Playing on first input. Returns true if the transition happened.
    pub fn start(&mut self) -> bool {
        if *self == GamePhase::Menu {
            *self = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Playing -> Dead. Returns true only on the first call of a run.
    pub fn die(&mut self) -> bool {
        if *self == GamePhase::Playing {
            *self = GamePhase::Dead;
            true
        } else {
            false
        }
    }

    /// Playing -> Won. Returns true only on the first call of a run.
    pub fn win(&mut self) -> bool {
        if *self == GamePhase::Playing {
            *self = GamePhase::Won;
            true
        } else {
            false
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
