//! Ephemeral particle effects
//!
//! One particle type with a kind tag; every kind shares the same kinematics
//! and only differs by the parameter table below.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::OFFSCREEN_MARGIN;

/// Particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Win celebration, tumbling upward burst
    Confetti,
    /// Death explosion fragments
    Shard,
    /// One small spark left behind per jump/flap
    Trail,
}

/// Color lookup key; the renderer owns the actual colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Spark,
    Wave,
    Glider,
    Accent,
    /// Index into the confetti palette
    Confetti(u8),
}

/// Number of confetti colors the renderer provides
pub const CONFETTI_COLORS: u8 = 5;

/// Randomization ranges for one particle kind (all per-tick units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub speed: (f32, f32),
    /// Launch direction in radians, y-down screen space
    pub angle: (f32, f32),
    /// Lifetime in ticks
    pub lifetime: (f32, f32),
    pub gravity: f32,
    /// Alpha ramps from 1 to 0 over the last `fade_window` ticks
    pub fade_window: f32,
    pub size: (f32, f32),
    /// Max absolute rotation per tick
    pub spin: f32,
}

impl ParticleKind {
    pub const fn params(self) -> ParticleParams {
        match self {
            ParticleKind::Confetti => ParticleParams {
                speed: (2.0, 7.0),
                // Upper half-plane in y-down coordinates, away from the horizon
                angle: (PI * 1.1, PI * 1.9),
                lifetime: (90.0, 160.0),
                gravity: 0.12,
                fade_window: 40.0,
                size: (4.0, 8.0),
                spin: 0.25,
            },
            ParticleKind::Shard => ParticleParams {
                speed: (3.0, 9.0),
                angle: (0.0, TAU),
                lifetime: (60.0, 140.0),
                gravity: 0.15,
                fade_window: 40.0,
                size: (3.0, 7.0),
                spin: 0.3,
            },
            ParticleKind::Trail => ParticleParams {
                speed: (0.5, 1.5),
                angle: (PI * 0.25, PI * 0.75),
                lifetime: (20.0, 35.0),
                gravity: 0.05,
                fade_window: 35.0,
                size: (2.0, 4.0),
                spin: 0.0,
            },
        }
    }

    /// Upper bound on how long any particle of this kind can live
    pub fn max_lifetime(self) -> f32 {
        self.params().lifetime.1
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// Remaining life in ticks
    pub life: f32,
    pub rotation: f32,
    pub spin: f32,
    pub size: f32,
    pub tint: Tint,
}

impl Particle {
    /// Spawn with randomized launch parameters drawn from the kind's table
    pub fn spawn<R: Rng>(kind: ParticleKind, origin: Vec2, tint: Tint, rng: &mut R) -> Self {
        let p = kind.params();
        let speed = rng.random_range(p.speed.0..=p.speed.1);
        let angle = rng.random_range(p.angle.0..=p.angle.1);
        let spin = if p.spin > 0.0 {
            rng.random_range(-p.spin..=p.spin)
        } else {
            0.0
        };
        Self {
            kind,
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            gravity: p.gravity,
            life: rng.random_range(p.lifetime.0..=p.lifetime.1),
            rotation: rng.random_range(0.0..=TAU),
            spin,
            size: rng.random_range(p.size.0..=p.size.1),
            tint,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.rotation += self.spin * dt;
        self.life -= dt;
    }

    /// Opacity, linear over the kind's fade window
    pub fn alpha(&self) -> f32 {
        let window = self.kind.params().fade_window;
        (self.life / window).clamp(0.0, 1.0)
    }

    /// Out of life, or fallen far below the visible area
    pub fn is_expired(&self, surface_height: f32) -> bool {
        self.life <= 0.0 || self.pos.y > surface_height + OFFSCREEN_MARGIN || !self.pos.is_finite()
    }
}

/// Particle pool with a hard cap
#[derive(Debug, Clone, Default)]
pub struct EffectPool {
    particles: Vec<Particle>,
    cap: usize,
}

impl EffectPool {
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(256)),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap; excess particles are dropped oldest first
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    /// Spawn one particle; returns false if the pool is full
    pub fn emit<R: Rng>(
        &mut self,
        kind: ParticleKind,
        origin: Vec2,
        tint: Tint,
        rng: &mut R,
    ) -> bool {
        if self.particles.len() >= self.cap {
            return false;
        }
        self.particles.push(Particle::spawn(kind, origin, tint, rng));
        true
    }

    /// Spawn up to `count` particles; returns how many fit
    pub fn burst<R: Rng>(
        &mut self,
        kind: ParticleKind,
        origin: Vec2,
        count: usize,
        mut tint: impl FnMut(&mut R) -> Tint,
        rng: &mut R,
    ) -> usize {
        let room = self.cap.saturating_sub(self.particles.len());
        let n = count.min(room);
        for _ in 0..n {
            let t = tint(&mut *rng);
            self.particles.push(Particle::spawn(kind, origin, t, rng));
        }
        if n < count {
            log::debug!("Particle cap {} reached, dropped {} {:?}", self.cap, count - n, kind);
        }
        n
    }

    /// Age every particle and prune the expired ones
    pub fn update(&mut self, dt: f32, surface_height: f32) {
        for particle in self.particles.iter_mut() {
            particle.update(dt);
        }
        self.particles.retain(|p| !p.is_expired(surface_height));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const KINDS: [ParticleKind; 3] = [ParticleKind::Confetti, ParticleKind::Shard, ParticleKind::Trail];

    #[test]
    fn test_shard_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let p = Particle::spawn(ParticleKind::Shard, Vec2::ZERO, Tint::Spark, &mut rng);
            let speed = p.vel.length();
            assert!(speed >= 3.0 - 1e-4 && speed <= 9.0 + 1e-4, "speed {speed}");
            assert!(p.life >= 60.0 && p.life <= 140.0);
        }
    }

    #[test]
    fn test_confetti_launches_upward() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let p = Particle::spawn(ParticleKind::Confetti, Vec2::ZERO, Tint::Confetti(0), &mut rng);
            assert!(p.vel.y < 0.0);
        }
    }

    #[test]
    fn test_alpha_fades_over_last_window() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = Particle::spawn(ParticleKind::Shard, Vec2::ZERO, Tint::Wave, &mut rng);
        p.life = 100.0;
        assert_eq!(p.alpha(), 1.0);
        p.life = 20.0;
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        p.life = -1.0;
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_offscreen_particle_pruned_before_life_ends() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = EffectPool::new(10);
        pool.emit(ParticleKind::Shard, Vec2::new(100.0, 100.0), Tint::Spark, &mut rng);
        assert_eq!(pool.len(), 1);
        // Surface of height 0: particle at y=100 is inside the margin, still alive
        pool.update(0.01, 0.0);
        assert_eq!(pool.len(), 1);
        // Shrink the visible area so the particle is far below it
        pool.update(0.01, -OFFSCREEN_MARGIN - 1.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = EffectPool::new(15);
        let spawned = pool.burst(ParticleKind::Shard, Vec2::ZERO, 20, |_| Tint::Spark, &mut rng);
        assert_eq!(spawned, 15);
        assert_eq!(pool.len(), 15);
        assert!(!pool.emit(ParticleKind::Trail, Vec2::ZERO, Tint::Accent, &mut rng));
    }

    #[test]
    fn test_set_cap_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = EffectPool::new(10);
        pool.burst(ParticleKind::Shard, Vec2::ZERO, 5, |_| Tint::Spark, &mut rng);
        pool.burst(ParticleKind::Trail, Vec2::ZERO, 5, |_| Tint::Accent, &mut rng);
        pool.set_cap(5);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.count_kind(ParticleKind::Trail), 5);
    }

    #[test]
    fn test_zero_cap_spawns_nothing() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = EffectPool::new(0);
        assert_eq!(pool.burst(ParticleKind::Confetti, Vec2::ZERO, 60, |_| Tint::Accent, &mut rng), 0);
        assert!(pool.is_empty());
    }

    proptest! {
        #[test]
        fn pool_always_drains(seed in any::<u64>(), dt in 0.05f32..=2.0, kind_idx in 0usize..3) {
            let kind = KINDS[kind_idx];
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = EffectPool::new(100);
            pool.burst(kind, Vec2::new(480.0, 270.0), 60, |_| Tint::Accent, &mut rng);

            let max_steps = (kind.max_lifetime() / dt).ceil() as usize + 1;
            for _ in 0..max_steps {
                pool.update(dt, 540.0);
            }
            prop_assert!(pool.is_empty());
        }
    }
}
