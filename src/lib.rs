//! Dual Arcade - two canvas arcade games on one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, effects, game phase)
//! - `driver`: Frame loop with dt normalization and start/stop control
//! - `renderer`: 2D drawing surface abstraction and scene drawing
//! - `platform`: Clock, fullscreen tracking and the browser bridge
//! - `settings` / `tuning`: Data-driven quality and game balance

pub mod driver;
pub mod hud;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{FrameClock, FrameDriver, Game};
pub use settings::{ConfigError, QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Milliseconds in one nominal 60 Hz tick
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest dt (in ticks) a single frame may apply
    pub const MAX_DT: f32 = 2.0;

    /// Bottom edge must be within this of a platform top to land
    pub const LANDING_THRESHOLD: f32 = 6.0;

    /// Delay before a transient status message reverts (ms)
    pub const STATUS_REVERT_MS: f64 = 2000.0;

    /// Particles this far below the surface are dropped regardless of life
    pub const OFFSCREEN_MARGIN: f32 = 200.0;
}
