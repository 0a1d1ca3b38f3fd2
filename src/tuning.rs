//! Data-driven game balance
//!
//! All physics constants per game, in per-tick units (one tick = 1/60 s).
//! Every field has a default, so a tuning file only lists overrides.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;
use crate::sim::body::Motion;

/// Dual-robot platformer constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerTuning {
    pub gravity: f32,
    /// Horizontal velocity multiplier per tick
    pub friction: f32,
    /// vx change per tick while a direction key is held
    pub run_accel: f32,
    /// Upward speed set on jump (applied as negative vy)
    pub jump_impulse: f32,
    pub max_speed: f32,
    pub robot_size: Vec2,
    pub surface_width: f32,
    pub surface_height: f32,
    /// Shards spawned when a robot is destroyed
    pub death_shards: usize,
    /// Confetti spawned on course clear
    pub win_confetti: usize,
}

impl Default for PlatformerTuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            friction: 0.75,
            run_accel: 0.5,
            jump_impulse: 11.0,
            max_speed: 20.0,
            robot_size: Vec2::new(34.0, 46.0),
            surface_width: 960.0,
            surface_height: 540.0,
            death_shards: 20,
            win_confetti: 60,
        }
    }
}

impl PlatformerTuning {
    pub fn motion(&self) -> Motion {
        Motion {
            gravity: self.gravity,
            friction: self.friction,
            max_speed: self.max_speed,
        }
    }
}

/// Side-scrolling dodger constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgerTuning {
    pub gravity: f32,
    /// Upward speed set on flap (applied as negative vy)
    pub flap_impulse: f32,
    pub max_fall: f32,
    pub glider_size: Vec2,
    /// Glider's fixed x as a fraction of the surface width
    pub glider_x_frac: f32,
    pub pipe_width: f32,
    /// Vertical opening between top and bottom segments
    pub pipe_gap: f32,
    /// Leftward pipe speed per tick
    pub pipe_speed: f32,
    /// Ticks between pipe spawns
    pub spawn_interval: f32,
    /// Minimum distance from the gap to either surface edge
    pub gap_margin: f32,
    /// Background scroll speed relative to pipes
    pub scroll_factor: f32,
    pub death_shards: usize,
}

impl Default for DodgerTuning {
    fn default() -> Self {
        Self {
            gravity: 0.45,
            flap_impulse: 7.5,
            max_fall: 12.0,
            glider_size: Vec2::new(34.0, 24.0),
            glider_x_frac: 0.25,
            pipe_width: 70.0,
            pipe_gap: 160.0,
            pipe_speed: 3.2,
            spawn_interval: 90.0,
            gap_margin: 60.0,
            scroll_factor: 0.3,
            death_shards: 20,
        }
    }
}

impl DodgerTuning {
    pub fn motion(&self) -> Motion {
        Motion {
            gravity: self.gravity,
            friction: 1.0,
            max_speed: self.max_fall,
        }
    }
}

/// Tuning for both games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub platformer: PlatformerTuning,
    pub dodger: DodgerTuning,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "positive",
            value,
        })
    }
}

impl Tuning {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.platformer;
        positive("platformer.gravity", p.gravity)?;
        positive("platformer.jump_impulse", p.jump_impulse)?;
        positive("platformer.max_speed", p.max_speed)?;
        positive("platformer.surface_width", p.surface_width)?;
        positive("platformer.surface_height", p.surface_height)?;
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(ConfigError::OutOfRange {
                field: "platformer.friction",
                expected: "within 0..=1",
                value: p.friction,
            });
        }

        let d = &self.dodger;
        positive("dodger.gravity", d.gravity)?;
        positive("dodger.flap_impulse", d.flap_impulse)?;
        positive("dodger.max_fall", d.max_fall)?;
        positive("dodger.pipe_width", d.pipe_width)?;
        positive("dodger.pipe_gap", d.pipe_gap)?;
        positive("dodger.pipe_speed", d.pipe_speed)?;
        positive("dodger.spawn_interval", d.spawn_interval)?;
        if d.pipe_gap <= d.glider_size.y {
            return Err(ConfigError::OutOfRange {
                field: "dodger.pipe_gap",
                expected: "larger than the glider",
                value: d.pipe_gap,
            });
        }
        if !(0.0..1.0).contains(&d.glider_x_frac) {
            return Err(ConfigError::OutOfRange {
                field: "dodger.glider_x_frac",
                expected: "within 0..1",
                value: d.glider_x_frac,
            });
        }
        Ok(())
    }
}
