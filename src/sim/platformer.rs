//! Dual-robot platformer
//!
//! Two robots share one keyboard. Spark shorts out in water, Wave boils in
//! fire. Switches hold gates open only while a robot stands on them. The
//! course clears when both robots stand on their own goal pad at once.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, EntityKind};
use super::collision::{land_on_platforms, push_out_of_gate};
use super::effects::{CONFETTI_COLORS, EffectPool, ParticleKind, Tint};
use super::geom::Rect;
use super::phase::GamePhase;
use super::GameEvent;
use crate::hud::Hud;
use crate::input::{Controls, Keyboard, SPARK_CONTROLS, WAVE_CONTROLS};
use crate::tuning::PlatformerTuning;

pub const IDLE_MESSAGE: &str = "Boot the prototypes and reach the pads.";
pub const HAZARD_MESSAGE: &str = "Hazard shutdown! Rerouting power.";
pub const WIN_MESSAGE: &str = "Course cleared! Robots synced for the next decode season stage.";
pub const RESET_MESSAGE: &str = "Course reset: recalibrating motors.";

/// Hazard element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
}

impl Element {
    /// Mismatched element destroys the robot; same-element is safe
    pub fn harms(self, kind: EntityKind) -> bool {
        matches!(
            (self, kind),
            (Element::Water, EntityKind::Spark) | (Element::Fire, EntityKind::Wave)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub rect: Rect,
    pub element: Element,
}

/// Door bound to every switch with the same id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub rect: Rect,
    pub id: char,
    pub open: bool,
}

/// Pressure switch, held while any robot is close enough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub pos: Vec2,
    pub radius: f32,
    pub id: char,
    pub held: bool,
}

impl Switch {
    /// Center distance below radius plus half the body's smaller side
    pub fn is_pressed_by(&self, body: &Body) -> bool {
        let reach = self.radius + body.size.x.min(body.size.y) / 2.0;
        body.center().distance(self.pos) < reach
    }
}

/// Goal pad for one robot kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
    pub kind: EntityKind,
}

/// Static course geometry plus gate/switch state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Rect>,
    pub hazards: Vec<Hazard>,
    pub gates: Vec<Gate>,
    pub switches: Vec<Switch>,
    pub goals: Vec<Goal>,
}

impl Level {
    /// The built-in course
    pub fn foundry() -> Self {
        let platforms = [
            (60.0, 480.0, 260.0, 32.0),
            (380.0, 430.0, 160.0, 24.0),
            (620.0, 470.0, 280.0, 28.0),
            (100.0, 360.0, 140.0, 22.0),
            (320.0, 320.0, 160.0, 20.0),
            (540.0, 300.0, 140.0, 20.0),
            (740.0, 280.0, 140.0, 20.0),
            (70.0, 240.0, 140.0, 18.0),
            (260.0, 200.0, 140.0, 18.0),
            (520.0, 190.0, 140.0, 18.0),
        ]
        .into_iter()
        .map(|(x, y, w, h)| Rect::new(x, y, w, h))
        .collect();

        let hazards = vec![
            Hazard {
                rect: Rect::new(320.0, 488.0, 60.0, 52.0),
                element: Element::Fire,
            },
            Hazard {
                rect: Rect::new(480.0, 488.0, 60.0, 52.0),
                element: Element::Water,
            },
            Hazard {
                rect: Rect::new(860.0, 496.0, 60.0, 44.0),
                element: Element::Fire,
            },
        ];

        let gates = vec![Gate {
            rect: Rect::new(560.0, 430.0, 20.0, 70.0),
            id: 'A',
            open: false,
        }];

        let switches = vec![Switch {
            pos: Vec2::new(430.0, 404.0),
            radius: 12.0,
            id: 'A',
            held: false,
        }];

        let goals = vec![
            Goal {
                rect: Rect::new(770.0, 240.0, 60.0, 12.0),
                kind: EntityKind::Spark,
            },
            Goal {
                rect: Rect::new(610.0, 160.0, 60.0, 12.0),
                kind: EntityKind::Wave,
            },
        ];

        Self {
            platforms,
            hazards,
            gates,
            switches,
            goals,
        }
    }

    /// Recompute switch holds, then bind each gate to its switches.
    ///
    /// Returns the gates whose open flag changed as `(id, open)`.
    pub fn update_switches<'a, I>(&mut self, bodies: I) -> Vec<(char, bool)>
    where
        I: Iterator<Item = &'a Body> + Clone,
    {
        for switch in &mut self.switches {
            switch.held = bodies.clone().any(|b| switch.is_pressed_by(b));
        }

        let mut changed = Vec::new();
        for gate in &mut self.gates {
            let open = self
                .switches
                .iter()
                .any(|s| s.id == gate.id && s.held);
            if open != gate.open {
                gate.open = open;
                changed.push((gate.id, open));
            }
        }
        changed
    }

    /// Close every gate and release every switch
    pub fn reset_mechanisms(&mut self) {
        for gate in &mut self.gates {
            gate.open = false;
        }
        for switch in &mut self.switches {
            switch.held = false;
        }
    }

    pub fn closed_gates(&self) -> impl Iterator<Item = &Rect> {
        self.gates.iter().filter(|g| !g.open).map(|g| &g.rect)
    }

    pub fn is_gate_open(&self, id: char) -> bool {
        self.gates.iter().any(|g| g.id == id && g.open)
    }

    /// First hazard that destroys this body, if any
    pub fn lethal_hazard(&self, body: &Body) -> Option<&Hazard> {
        let rect = body.rect();
        self.hazards
            .iter()
            .find(|h| h.element.harms(body.kind) && rect.overlaps(&h.rect))
    }

    pub fn goal_for(&self, kind: EntityKind) -> Option<&Goal> {
        self.goals.iter().find(|g| g.kind == kind)
    }
}

/// One player-controlled robot
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    pub body: Body,
    pub controls: Controls,
}

impl Robot {
    pub fn tint(&self) -> Tint {
        match self.body.kind {
            EntityKind::Wave => Tint::Wave,
            EntityKind::Glider => Tint::Glider,
            EntityKind::Spark => Tint::Spark,
        }
    }
}

/// Complete platformer state
#[derive(Debug, Clone)]
pub struct PlatformerState {
    pub tuning: PlatformerTuning,
    pub level: Level,
    pub robots: Vec<Robot>,
    pub phase: GamePhase,
    pub effects: EffectPool,
    pub hud: Hud,
    /// Course width/height used for clamping; fixed by tuning
    pub surface: Vec2,
    /// Robot destroyed this run (not drawn while dead)
    pub wrecked: Option<usize>,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
    rng: Pcg32,
}

impl PlatformerState {
    pub fn new(tuning: PlatformerTuning, max_particles: usize, seed: u64) -> Self {
        let size = tuning.robot_size;
        let robots = vec![
            Robot {
                body: Body::new(EntityKind::Spark, Vec2::new(90.0, 430.0), size),
                controls: SPARK_CONTROLS,
            },
            Robot {
                body: Body::new(EntityKind::Wave, Vec2::new(180.0, 430.0), size),
                controls: WAVE_CONTROLS,
            },
        ];
        let surface = Vec2::new(tuning.surface_width, tuning.surface_height);
        Self {
            tuning,
            level: Level::foundry(),
            robots,
            phase: GamePhase::Menu,
            effects: EffectPool::new(max_particles),
            hud: Hud::new(IDLE_MESSAGE),
            surface,
            wrecked: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn any_jump_pressed(&self, keys: &Keyboard) -> bool {
        self.robots.iter().any(|r| keys.was_pressed(r.controls.jump))
    }

    /// Advance one frame: phase input, simulation, collision, effect aging
    pub fn update(&mut self, keys: &Keyboard, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self.phase {
            GamePhase::Menu if self.any_jump_pressed(keys) => {
                self.phase.start();
                log::info!("Platformer: playing");
                events.push(GameEvent::Started);
            }
            GamePhase::Won if self.any_jump_pressed(keys) => {
                self.reset();
                self.hud.show_idle();
                events.push(GameEvent::Reset);
            }
            _ => {}
        }

        if self.phase.simulates() {
            self.time_ticks += 1;
            self.step(keys, dt, &mut events);
        }

        self.effects.update(dt, self.surface.y);
        events
    }

    fn step(&mut self, keys: &Keyboard, dt: f32, events: &mut Vec<GameEvent>) {
        let Self {
            tuning,
            level,
            robots,
            phase,
            effects,
            hud,
            surface,
            wrecked,
            time_ticks,
            rng,
        } = self;

        for (id, open) in level.update_switches(robots.iter().map(|r| &r.body)) {
            log::debug!("Gate {} {}", id, if open { "opened" } else { "sealed" });
            hud.flash(if open {
                format!("Gate {id} opened.")
            } else {
                format!("Gate {id} sealed.")
            });
            events.push(GameEvent::GateChanged { id, open });
        }

        let motion = tuning.motion();
        for (i, robot) in robots.iter_mut().enumerate() {
            let c = robot.controls;
            let tint = robot.tint();
            let body = &mut robot.body;

            if keys.is_held(c.left) {
                body.vel.x -= tuning.run_accel * dt;
            }
            if keys.is_held(c.right) {
                body.vel.x += tuning.run_accel * dt;
            }
            if keys.is_held(c.jump) && body.grounded {
                body.vel.y = -tuning.jump_impulse;
                body.grounded = false;
                let heel = Vec2::new(body.center().x, body.bottom());
                effects.emit(ParticleKind::Trail, heel, tint, rng);
                events.push(GameEvent::Jumped(i));
            }

            body.integrate(&motion, dt);
            body.grounded = false;
            land_on_platforms(body, &level.platforms, dt);
            // The surface floor counts as ground
            if body.clamp_to_surface(Some(surface.x), surface.y).floor {
                body.grounded = true;
            }
            for gate in level.closed_gates() {
                push_out_of_gate(body, gate);
            }
            body.clamp_to_surface(Some(surface.x), surface.y);

            if let Some(hazard) = level.lethal_hazard(body) {
                if phase.die() {
                    log::info!(
                        "Platformer: {} destroyed by {:?}",
                        body.kind.as_str(),
                        hazard.element
                    );
                    effects.burst(ParticleKind::Shard, body.center(), tuning.death_shards, |_| tint, rng);
                    hud.flash(HAZARD_MESSAGE);
                    *wrecked = Some(i);
                    events.push(GameEvent::Died);
                }
                break;
            }
        }

        if phase.simulates() && Self::goals_met_in(level, robots) && phase.win() {
            log::info!("Platformer: course cleared after {} ticks", time_ticks);
            let per_goal = tuning.win_confetti / level.goals.len().max(1);
            for goal in &level.goals {
                effects.burst(
                    ParticleKind::Confetti,
                    goal.rect.center(),
                    per_goal,
                    |r| Tint::Confetti(r.random_range(0..CONFETTI_COLORS)),
                    rng,
                );
            }
            hud.set_status(WIN_MESSAGE);
            events.push(GameEvent::Won);
        }
    }

    fn goals_met_in(level: &Level, robots: &[Robot]) -> bool {
        !robots.is_empty()
            && robots.iter().all(|r| {
                level
                    .goal_for(r.body.kind)
                    .is_some_and(|g| r.body.rect().overlaps(&g.rect))
            })
    }

    /// Every robot overlaps the goal assigned to its kind
    pub fn goals_met(&self) -> bool {
        Self::goals_met_in(&self.level, &self.robots)
    }

    /// Terminal check after drawing: a dead run resets once its effects are gone
    pub fn settle(&mut self) -> Option<GameEvent> {
        if self.phase == GamePhase::Dead && self.effects.is_empty() {
            self.reset();
            return Some(GameEvent::Reset);
        }
        None
    }

    /// Back to the menu with robots, gates, switches and effects restored.
    /// Leaves the status line alone so a pending message can finish.
    pub fn reset(&mut self) {
        for robot in &mut self.robots {
            robot.body.reset();
        }
        self.level.reset_mechanisms();
        self.effects.clear();
        self.phase = GamePhase::Menu;
        self.wrecked = None;
        self.hud.set_score(0);
        log::info!("Platformer: reset to menu");
    }

    /// Reset control: forces the menu from any phase
    pub fn manual_reset(&mut self) {
        self.reset();
        self.hud.flash(RESET_MESSAGE);
    }
}
