//! Movable entities (robots and the glider)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Rect, clamp_span};

/// Discrete tag deciding which hazards hurt and which goal counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Fire robot, shorts out in water
    Spark,
    /// Water robot, boils in fire
    Wave,
    /// Dodger player
    Glider,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Spark => "spark",
            EntityKind::Wave => "wave",
            EntityKind::Glider => "glider",
        }
    }
}

/// Per-game integration parameters (units per tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub gravity: f32,
    /// Horizontal damping per tick, 1.0 = none
    pub friction: f32,
    /// Terminal speed on both axes
    pub max_speed: f32,
}

/// Which surface edges a clamp pushed the body off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeContact {
    pub floor: bool,
    pub ceiling: bool,
    pub wall: bool,
}

/// A movable entity, mutated once per tick by integration and collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Resting on a platform, gate top or the floor
    pub grounded: bool,
    /// Position restored on reset
    pub spawn: Vec2,
}

impl Body {
    pub fn new(kind: EntityKind, spawn: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            pos: spawn,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            spawn,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Restore the initial transform
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }

    /// Gravity, velocity and friction for one dt-scaled step
    pub fn integrate(&mut self, motion: &Motion, dt: f32) {
        self.vel.y += motion.gravity * dt;
        self.vel = self
            .vel
            .clamp(Vec2::splat(-motion.max_speed), Vec2::splat(motion.max_speed));
        if !self.vel.is_finite() {
            self.vel = Vec2::ZERO;
        }
        self.pos += self.vel * dt;
        self.vel.x *= motion.friction.powf(dt);
    }

    /// Keep the body inside the surface.
    ///
    /// `width` is `None` when the horizontal axis is unbounded (dodger).
    /// Velocity into a touched edge is zeroed.
    pub fn clamp_to_surface(&mut self, width: Option<f32>, height: f32) -> EdgeContact {
        let mut contact = EdgeContact::default();

        if self.pos.y.is_nan() {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
        }
        let max_y = height - self.size.y;
        let y = clamp_span(self.pos.y, 0.0, max_y);
        if y < self.pos.y {
            contact.floor = true;
            self.vel.y = self.vel.y.min(0.0);
        } else if y > self.pos.y {
            contact.ceiling = true;
            self.vel.y = self.vel.y.max(0.0);
        }
        self.pos.y = y;

        if let Some(width) = width {
            let max_x = width - self.size.x;
            let x = clamp_span(self.pos.x, 0.0, max_x);
            if x != self.pos.x {
                contact.wall = true;
                self.vel.x = 0.0;
            }
            self.pos.x = x;
        }

        contact
    }
}
