//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - dt-scaled integration only (dt = 1.0 per nominal 60 Hz tick)
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod dodger;
pub mod effects;
pub mod geom;
pub mod phase;
pub mod platformer;

pub use body::{Body, EntityKind};
pub use collision::{hits_any, land_on_platforms, push_out_of_gate};
pub use dodger::{DodgerState, Pipe};
pub use effects::{EffectPool, Particle, ParticleKind};
pub use geom::Rect;
pub use phase::GamePhase;
pub use platformer::{Element, Gate, Goal, Hazard, Level, PlatformerState, Switch};

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Menu left on first input
    Started,
    /// An entity jumped or flapped (index into the game's entity list)
    Jumped(usize),
    /// Lethal collision; the run is over
    Died,
    /// Goal condition satisfied
    Won,
    /// Dodger passed a pipe; carries the new score
    Scored(u32),
    /// A gate flipped open/closed
    GateChanged { id: char, open: bool },
    /// Effects drained and the game went back to the menu
    Reset,
}
