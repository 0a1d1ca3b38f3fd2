//! Keyboard state
//!
//! Key codes are the browser's `KeyboardEvent.code` strings. Held state is
//! updated by key events between frames and read once per tick; presses are
//! one-shot and cleared by the frame driver after each frame.

use std::collections::{HashMap, HashSet};

/// Key bindings for one platformer robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub left: &'static str,
    pub right: &'static str,
    pub jump: &'static str,
}

/// Spark robot: WASD
pub const SPARK_CONTROLS: Controls = Controls {
    left: "KeyA",
    right: "KeyD",
    jump: "KeyW",
};

/// Wave robot: arrow keys
pub const WAVE_CONTROLS: Controls = Controls {
    left: "ArrowLeft",
    right: "ArrowRight",
    jump: "ArrowUp",
};

/// Dodger flap keys
pub const FLAP_KEYS: [&str; 3] = ["Space", "ArrowUp", "KeyW"];

/// Dodger fullscreen toggle
pub const FULLSCREEN_KEY: &str = "KeyF";

/// Map from key code to held flag, plus this frame's fresh presses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyboard {
    held: HashMap<String, bool>,
    pressed: HashSet<String>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        // Auto-repeat keydowns don't count as new presses
        if !self.is_held(code) {
            self.pressed.insert(code.to_string());
        }
        self.held.insert(code.to_string(), true);
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.insert(code.to_string(), false);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.get(code).copied().unwrap_or(false)
    }

    /// Pressed since the last `end_frame`
    pub fn was_pressed(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    pub fn any_pressed(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.was_pressed(c))
    }

    /// Clear one-shot presses after the frame consumed them
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Forget everything, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_and_released() {
        let mut keys = Keyboard::new();
        assert!(!keys.is_held("KeyA"));
        keys.key_down("KeyA");
        assert!(keys.is_held("KeyA"));
        keys.key_up("KeyA");
        assert!(!keys.is_held("KeyA"));
    }

    #[test]
    fn test_press_is_one_shot() {
        let mut keys = Keyboard::new();
        keys.key_down("Space");
        assert!(keys.was_pressed("Space"));
        keys.end_frame();
        assert!(!keys.was_pressed("Space"));
        assert!(keys.is_held("Space"));
    }

    #[test]
    fn test_autorepeat_is_not_a_press() {
        let mut keys = Keyboard::new();
        keys.key_down("Space");
        keys.end_frame();
        keys.key_down("Space");
        assert!(!keys.was_pressed("Space"));
        keys.key_up("Space");
        keys.key_down("Space");
        assert!(keys.was_pressed("Space"));
    }

    #[test]
    fn test_any_pressed() {
        let mut keys = Keyboard::new();
        keys.key_down("ArrowUp");
        assert!(keys.any_pressed(&FLAP_KEYS));
        assert!(!keys.any_pressed(&[FULLSCREEN_KEY]));
    }
}
