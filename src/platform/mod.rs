//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (refresh timestamps or a virtual clock)
//! - Fullscreen tracking
//! - Canvas drawing and DOM wiring (wasm only)

pub mod fullscreen;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use fullscreen::{Fullscreen, FullscreenError};

use crate::consts::NOMINAL_FRAME_MS;

/// Source of frame timestamps in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
    /// Block or advance until the next frame is due
    fn wait_frame(&mut self);
}

/// Virtual clock for headless runs; time only moves when told to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualClock {
    now_ms: f64,
    step_ms: f64,
}

impl ManualClock {
    /// Starts at zero and advances `step_ms` per frame
    pub fn new(step_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            step_ms,
        }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(NOMINAL_FRAME_MS)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn wait_frame(&mut self) {
        self.now_ms += self.step_ms;
    }
}
