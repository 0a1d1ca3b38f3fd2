//! Side-scrolling obstacle dodger
//!
//! A glider holds a fixed x while pipe pairs scroll in from the right. Each
//! flap sets a fixed upward speed. Touching a pipe or either vertical edge
//! ends the run; every pipe passed scores one point. There is no win state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, EntityKind};
use super::collision::hits_any;
use super::effects::{EffectPool, ParticleKind, Tint};
use super::geom::Rect;
use super::phase::GamePhase;
use super::GameEvent;
use crate::hud::Hud;
use crate::input::{FLAP_KEYS, Keyboard};
use crate::tuning::DodgerTuning;

pub const IDLE_MESSAGE: &str = "Press Space to launch. Dodge the pipes.";
pub const CRASH_MESSAGE: &str = "Crash detected. Hangar doors reopened.";
pub const RESET_MESSAGE: &str = "Run reset: hangar doors reopened.";

/// Width of one background stripe tile; scroll offset wraps at this
pub const SCROLL_TILE: f32 = 80.0;

/// A pipe pair with an opening between the segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub width: f32,
    /// Bottom edge of the top segment
    pub gap_top: f32,
    pub gap: f32,
    /// Already counted toward the score
    pub scored: bool,
}

impl Pipe {
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_top)
    }

    pub fn bottom_rect(&self, surface_height: f32) -> Rect {
        let y = self.gap_top + self.gap;
        Rect::new(self.x, y, self.width, (surface_height - y).max(0.0))
    }

    pub fn segments(&self, surface_height: f32) -> [Rect; 2] {
        [self.top_rect(), self.bottom_rect(surface_height)]
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Complete dodger state
#[derive(Debug, Clone)]
pub struct DodgerState {
    pub tuning: DodgerTuning,
    pub glider: Body,
    pub pipes: Vec<Pipe>,
    pub phase: GamePhase,
    pub effects: EffectPool,
    pub hud: Hud,
    pub surface: Vec2,
    /// Background offset in `0..SCROLL_TILE`
    pub scroll: f32,
    /// Ticks until the next pipe
    pub spawn_timer: f32,
    pub score: u32,
    pub time_ticks: u64,
    rng: Pcg32,
}

impl DodgerState {
    pub fn new(tuning: DodgerTuning, max_particles: usize, seed: u64, width: f32, height: f32) -> Self {
        let surface = Vec2::new(width, height);
        let glider = Body::new(
            EntityKind::Glider,
            Self::launch_position(&tuning, surface),
            tuning.glider_size,
        );
        let spawn_timer = tuning.spawn_interval;
        Self {
            tuning,
            glider,
            pipes: Vec::new(),
            phase: GamePhase::Menu,
            effects: EffectPool::new(max_particles),
            hud: Hud::new(IDLE_MESSAGE),
            surface,
            scroll: 0.0,
            spawn_timer,
            score: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn launch_position(tuning: &DodgerTuning, surface: Vec2) -> Vec2 {
        Vec2::new(
            surface.x * tuning.glider_x_frac,
            (surface.y - tuning.glider_size.y) / 2.0,
        )
    }

    /// Follow the drawing surface; the glider keeps its relative x
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width, height);
        self.glider.spawn = Self::launch_position(&self.tuning, self.surface);
        self.glider.pos.x = self.glider.spawn.x;
        if self.phase == GamePhase::Menu {
            self.glider.pos = self.glider.spawn;
        }
        self.glider.clamp_to_surface(None, height);
    }

    /// Advance one frame: scroll, phase input, simulation, effect aging
    pub fn update(&mut self, keys: &Keyboard, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.scroll = (self.scroll + self.tuning.pipe_speed * self.tuning.scroll_factor * dt)
            .rem_euclid(SCROLL_TILE);

        if self.phase == GamePhase::Menu && keys.any_pressed(&FLAP_KEYS) {
            self.phase.start();
            log::info!("Dodger: launched");
            events.push(GameEvent::Started);
        }

        if self.phase.simulates() {
            self.time_ticks += 1;
            self.step(keys, dt, &mut events);
        }

        self.effects.update(dt, self.surface.y);
        events
    }

    fn step(&mut self, keys: &Keyboard, dt: f32, events: &mut Vec<GameEvent>) {
        let t = &self.tuning;

        if keys.any_pressed(&FLAP_KEYS) {
            self.glider.vel.y = -t.flap_impulse;
            let tail = Vec2::new(self.glider.pos.x, self.glider.center().y);
            self.effects.emit(ParticleKind::Trail, tail, Tint::Glider, &mut self.rng);
            events.push(GameEvent::Jumped(0));
        }
        self.glider.integrate(&t.motion(), dt);

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer += t.spawn_interval;
            let pipe = self.next_pipe();
            log::debug!("Dodger: pipe at gap {:.0}", pipe.gap_top);
            self.pipes.push(pipe);
        }

        let t = &self.tuning;
        let glider_x = self.glider.pos.x;
        for pipe in &mut self.pipes {
            pipe.x -= t.pipe_speed * dt;
            if !pipe.scored && pipe.right() < glider_x {
                pipe.scored = true;
                self.score += 1;
                events.push(GameEvent::Scored(self.score));
            }
        }
        self.pipes.retain(|p| p.right() > 0.0);
        self.hud.set_score(self.score);

        let rect = self.glider.rect();
        let h = self.surface.y;
        let out_of_bounds = rect.y < 0.0 || rect.bottom() >= h || !rect.y.is_finite();
        let hit_pipe = hits_any(&rect, self.pipes.iter().flat_map(|p| p.segments(h)));
        self.glider.clamp_to_surface(None, h);

        if (out_of_bounds || hit_pipe) && self.phase.die() {
            log::info!(
                "Dodger: crashed ({}) with score {}",
                if hit_pipe { "pipe" } else { "bounds" },
                self.score
            );
            self.effects.burst(
                ParticleKind::Shard,
                self.glider.center(),
                self.tuning.death_shards,
                |_| Tint::Glider,
                &mut self.rng,
            );
            self.hud.flash(CRASH_MESSAGE);
            events.push(GameEvent::Died);
        }
    }

    fn next_pipe(&mut self) -> Pipe {
        let t = &self.tuning;
        let lo = t.gap_margin;
        let hi = self.surface.y - t.gap_margin - t.pipe_gap;
        let gap_top = if hi > lo {
            self.rng.random_range(lo..=hi)
        } else {
            ((self.surface.y - t.pipe_gap) / 2.0).max(0.0)
        };
        Pipe {
            x: self.surface.x,
            width: t.pipe_width,
            gap_top,
            gap: t.pipe_gap,
            scored: false,
        }
    }

    /// Terminal check after drawing: a crashed run resets once its shards are gone
    pub fn settle(&mut self) -> Option<GameEvent> {
        if self.phase == GamePhase::Dead && self.effects.is_empty() {
            self.reset();
            return Some(GameEvent::Reset);
        }
        None
    }

    /// Back to the menu: glider re-centred, pipes and effects cleared, score zeroed
    pub fn reset(&mut self) {
        self.glider.reset();
        self.pipes.clear();
        self.effects.clear();
        self.spawn_timer = self.tuning.spawn_interval;
        self.score = 0;
        self.hud.set_score(0);
        self.phase = GamePhase::Menu;
        log::info!("Dodger: reset to menu (best {})", self.hud.best());
    }

    pub fn manual_reset(&mut self) {
        self.reset();
        self.hud.flash(RESET_MESSAGE);
    }
}
