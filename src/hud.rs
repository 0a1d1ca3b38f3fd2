//! Status line and score sinks
//!
//! The status line shows an idle message, or a transient one that reverts
//! after `STATUS_REVERT_MS`. Setting a new transient message replaces the
//! pending revert, so an older timer can never overwrite a newer message.

use crate::consts::STATUS_REVERT_MS;

/// Pending revert of a transient message
#[derive(Debug, Clone, Copy, PartialEq)]
struct RevertTimer {
    due_ms: f64,
}

/// Human-readable status text plus numeric score
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    idle: String,
    text: String,
    revert: Option<RevertTimer>,
    now_ms: f64,
    score: u32,
    best: u32,
    /// Bumped whenever text or score changes, for cheap DOM sync
    revision: u64,
}

impl Hud {
    pub fn new(idle: impl Into<String>) -> Self {
        let idle = idle.into();
        Self {
            text: idle.clone(),
            idle,
            revert: None,
            now_ms: 0.0,
            score: 0,
            best: 0,
            revision: 0,
        }
    }

    /// Advance the virtual clock and fire the revert if it is due
    pub fn advance_clock(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        if let Some(timer) = self.revert {
            if now_ms >= timer.due_ms {
                self.revert = None;
                self.text = self.idle.clone();
                self.revision += 1;
            }
        }
    }

    /// Show a message that reverts to idle after the standard delay
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash_for(message, STATUS_REVERT_MS);
    }

    pub fn flash_for(&mut self, message: impl Into<String>, delay_ms: f64) {
        self.text = message.into();
        self.revert = Some(RevertTimer {
            due_ms: self.now_ms + delay_ms,
        });
        self.revision += 1;
    }

    /// Show a message until something else replaces it
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.text = message.into();
        self.revert = None;
        self.revision += 1;
    }

    /// Drop any transient message and show the idle text
    pub fn show_idle(&mut self) {
        self.set_status(self.idle.clone());
    }

    pub fn status(&self) -> &str {
        &self.text
    }

    pub fn has_pending_revert(&self) -> bool {
        self.revert.is_some()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score this session; nothing is persisted
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn set_score(&mut self, score: u32) {
        if score != self.score {
            self.score = score;
            self.best = self.best.max(score);
            self.revision += 1;
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
