//! Scene drawing for both games
//!
//! Draw order: background, static geometry, entities, effects, overlay text.

use glam::Vec2;

use super::{Color, Palette, Surface, TextAlign};
use crate::sim::dodger::{DodgerState, SCROLL_TILE};
use crate::sim::effects::{EffectPool, ParticleKind};
use crate::sim::phase::GamePhase;
use crate::sim::platformer::{Element, PlatformerState};
use crate::sim::{EntityKind, Rect};

/// Per-frame drawing options taken from settings and the frame driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Scrolling background stripes
    pub background_motion: bool,
    /// Smoothed frames per second to print, if enabled
    pub fps: Option<f32>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            background_motion: true,
            fps: None,
        }
    }
}

const EDGE_HEIGHT: f32 = 4.0;
const PIPE_CAP_HEIGHT: f32 = 14.0;
const PIPE_CAP_OVERHANG: f32 = 4.0;
const OVERLAY_TEXT_PX: f32 = 28.0;
const SMALL_TEXT_PX: f32 = 16.0;

fn fill(surface: &mut dyn Surface, rect: &Rect, color: Color) {
    surface.fill_rect(rect.x, rect.y, rect.w, rect.h, color);
}

fn background(surface: &mut dyn Surface, palette: &Palette, size: Vec2) {
    surface.fill_vertical_gradient(
        0.0,
        0.0,
        size.x,
        size.y,
        palette.background_top,
        palette.background_bottom,
    );
}

fn particles(surface: &mut dyn Surface, effects: &EffectPool, palette: &Palette) {
    for p in effects.iter() {
        let color = palette.tint(p.tint).with_alpha(p.alpha());
        match p.kind {
            ParticleKind::Trail => surface.fill_circle(p.pos, p.size / 2.0, color),
            ParticleKind::Confetti | ParticleKind::Shard => {
                surface.fill_rotated_rect(p.pos, p.size, p.rotation, color)
            }
        }
    }
}

fn overlay(surface: &mut dyn Surface, palette: &Palette, size: Vec2, headline: &str, status: &str) {
    let center = size / 2.0;
    surface.fill_rect(0.0, 0.0, size.x, size.y, Color::rgb(0, 0, 0).with_alpha(0.35));
    surface.fill_text(headline, center, OVERLAY_TEXT_PX, TextAlign::Center, palette.text);
    surface.fill_text(
        status,
        center + Vec2::new(0.0, OVERLAY_TEXT_PX + 8.0),
        SMALL_TEXT_PX,
        TextAlign::Center,
        palette.text,
    );
}

fn fps_counter(surface: &mut dyn Surface, palette: &Palette, size: Vec2, fps: Option<f32>) {
    if let Some(fps) = fps {
        let x = size.x - 8.0;
        surface.fill_text(
            &format!("{fps:.0} fps"),
            Vec2::new(x - 60.0, 20.0),
            SMALL_TEXT_PX,
            TextAlign::Left,
            palette.text.with_alpha(0.6),
        );
    }
}

/// Draw the platformer course, robots, effects and overlay.
///
/// Coordinates are course units; the caller maps them onto the surface.
pub fn draw_platformer(
    state: &PlatformerState,
    surface: &mut dyn Surface,
    palette: &Palette,
    options: &SceneOptions,
) {
    let size = state.surface;
    background(surface, palette, size);

    let level = &state.level;
    for platform in &level.platforms {
        fill(surface, platform, palette.platform);
        surface.fill_rect(platform.x, platform.y, platform.w, EDGE_HEIGHT, palette.platform_edge);
    }
    for hazard in &level.hazards {
        let color = match hazard.element {
            Element::Fire => palette.hazard_fire,
            Element::Water => palette.hazard_water,
        };
        fill(surface, &hazard.rect, color);
    }
    for goal in &level.goals {
        fill(surface, &goal.rect, palette.goal);
        let marker = match goal.kind {
            EntityKind::Wave => palette.wave,
            _ => palette.spark,
        };
        let c = goal.rect.center();
        surface.fill_circle(Vec2::new(c.x, goal.rect.y - 6.0), 4.0, marker);
    }
    for gate in &level.gates {
        if gate.open {
            // Open gates leave a faint frame
            let r = gate.rect;
            let faint = palette.gate.with_alpha(0.3);
            surface.stroke_line(Vec2::new(r.x, r.y), Vec2::new(r.x, r.bottom()), 2.0, faint);
            surface.stroke_line(Vec2::new(r.right(), r.y), Vec2::new(r.right(), r.bottom()), 2.0, faint);
        } else {
            fill(surface, &gate.rect, palette.gate);
        }
    }
    for switch in &level.switches {
        let color = if switch.held { palette.accent } else { palette.switch_idle };
        surface.fill_circle(switch.pos, switch.radius, color);
    }

    for (i, robot) in state.robots.iter().enumerate() {
        if state.phase == GamePhase::Dead && state.wrecked == Some(i) {
            continue;
        }
        let r = robot.body.rect();
        fill(surface, &r, palette.tint(robot.tint()));
        // Visor
        surface.fill_rect(r.x + 6.0, r.y + 8.0, r.w - 12.0, 8.0, palette.background_bottom);
    }

    particles(surface, &state.effects, palette);

    match state.phase {
        GamePhase::Menu => overlay(surface, palette, size, "Press W or Up to start", state.hud.status()),
        GamePhase::Dead => overlay(surface, palette, size, "Shutdown", state.hud.status()),
        GamePhase::Won => overlay(surface, palette, size, "Course cleared", state.hud.status()),
        GamePhase::Playing => {
            let y = size.y - 12.0;
            surface.fill_text(
                state.hud.status(),
                Vec2::new(12.0, y),
                SMALL_TEXT_PX,
                TextAlign::Left,
                palette.text,
            );
        }
    }
    fps_counter(surface, palette, size, options.fps);
}

/// Draw the dodger background, pipes, glider, effects and score
pub fn draw_dodger(
    state: &DodgerState,
    surface: &mut dyn Surface,
    palette: &Palette,
    options: &SceneOptions,
) {
    let size = surface.size();
    background(surface, palette, size);

    if options.background_motion {
        let mut x = -state.scroll;
        while x < size.x {
            surface.fill_rect(x, 0.0, SCROLL_TILE / 2.0, size.y, palette.stripe);
            x += SCROLL_TILE;
        }
    }

    for pipe in &state.pipes {
        let top = pipe.top_rect();
        let bottom = pipe.bottom_rect(size.y);
        fill(surface, &top, palette.pipe);
        fill(surface, &bottom, palette.pipe);
        let cap_w = pipe.width + PIPE_CAP_OVERHANG * 2.0;
        let cap_x = pipe.x - PIPE_CAP_OVERHANG;
        surface.fill_rect(cap_x, top.bottom() - PIPE_CAP_HEIGHT, cap_w, PIPE_CAP_HEIGHT, palette.pipe_cap);
        surface.fill_rect(cap_x, bottom.y, cap_w, PIPE_CAP_HEIGHT, palette.pipe_cap);
    }

    if state.phase != GamePhase::Dead {
        let g = state.glider.rect();
        fill(surface, &g, palette.glider);
        let c = g.center();
        surface.stroke_line(
            Vec2::new(g.x - 4.0, c.y),
            Vec2::new(g.right() + 4.0, c.y),
            3.0,
            palette.accent,
        );
    }

    particles(surface, &state.effects, palette);

    surface.fill_text(
        &state.hud.score().to_string(),
        Vec2::new(size.x / 2.0, 48.0),
        OVERLAY_TEXT_PX,
        TextAlign::Center,
        palette.text,
    );
    surface.fill_text(
        &format!("Best {}", state.hud.best()),
        Vec2::new(12.0, 24.0),
        SMALL_TEXT_PX,
        TextAlign::Left,
        palette.text,
    );

    match state.phase {
        GamePhase::Menu => overlay(surface, palette, size, "Press Space to launch", state.hud.status()),
        GamePhase::Dead => overlay(surface, palette, size, "Crashed", state.hud.status()),
        GamePhase::Won | GamePhase::Playing => {}
    }
    fps_counter(surface, palette, size, options.fps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Keyboard;
    use crate::renderer::{DrawCmd, DrawList};
    use crate::sim::dodger::Pipe;
    use crate::tuning::{DodgerTuning, PlatformerTuning};

    fn platformer() -> PlatformerState {
        PlatformerState::new(PlatformerTuning::default(), 500, 3)
    }

    fn dodger() -> DodgerState {
        DodgerState::new(DodgerTuning::default(), 500, 3, 960.0, 540.0)
    }

    #[test]
    fn test_background_drawn_first() {
        let state = platformer();
        let mut list = DrawList::new(960.0, 540.0);
        draw_platformer(&state, &mut list, &Palette::default(), &SceneOptions::default());
        assert!(matches!(list.commands[0], DrawCmd::Gradient { .. }));
    }

    #[test]
    fn test_platformer_draws_in_course_units() {
        let state = platformer();
        let mut list = DrawList::new(1280.0, 720.0);
        draw_platformer(&state, &mut list, &Palette::default(), &SceneOptions::default());
        assert!(matches!(
            list.commands[0],
            DrawCmd::Gradient { w, h, .. } if w == 960.0 && h == 540.0
        ));
    }

    #[test]
    fn test_menu_overlay_and_robots() {
        let state = platformer();
        let palette = Palette::default();
        let mut list = DrawList::new(960.0, 540.0);
        draw_platformer(&state, &mut list, &palette, &SceneOptions::default());
        assert!(list.texts().contains(&"Press W or Up to start"));
        assert_eq!(list.count_rects_with(palette.spark), 1);
        assert_eq!(list.count_rects_with(palette.wave), 1);
        // Closed gate is solid
        assert_eq!(list.count_rects_with(palette.gate), 1);
    }

    #[test]
    fn test_wrecked_robot_hidden_while_dead() {
        let mut state = platformer();
        state.phase = GamePhase::Dead;
        state.wrecked = Some(0);
        let palette = Palette::default();
        let mut list = DrawList::new(960.0, 540.0);
        draw_platformer(&state, &mut list, &palette, &SceneOptions::default());
        assert_eq!(list.count_rects_with(palette.spark), 0);
        assert_eq!(list.count_rects_with(palette.wave), 1);
    }

    #[test]
    fn test_open_gate_is_outline() {
        let mut state = platformer();
        state.level.gates[0].open = true;
        let palette = Palette::default();
        let mut list = DrawList::new(960.0, 540.0);
        draw_platformer(&state, &mut list, &palette, &SceneOptions::default());
        assert_eq!(list.count_rects_with(palette.gate), 0);
    }

    #[test]
    fn test_effects_drawn_per_particle() {
        let mut state = platformer();
        state.phase = GamePhase::Playing;
        for _ in 0..10 {
            state.update(&Keyboard::new(), 1.0);
        }
        let mut keys = Keyboard::new();
        keys.key_down("KeyW");
        state.update(&keys, 1.0);
        assert_eq!(state.effects.len(), 1);
        let mut list = DrawList::new(960.0, 540.0);
        draw_platformer(&state, &mut list, &Palette::default(), &SceneOptions::default());
        let circles = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { radius, .. } if *radius < 3.0))
            .count();
        assert_eq!(circles, state.effects.len());
    }

    #[test]
    fn test_stripes_follow_background_motion() {
        let state = dodger();
        let palette = Palette::default();
        let mut on = DrawList::new(960.0, 540.0);
        draw_dodger(&state, &mut on, &palette, &SceneOptions::default());
        assert_eq!(on.count_rects_with(palette.stripe), 12);

        let mut off = DrawList::new(960.0, 540.0);
        let options = SceneOptions {
            background_motion: false,
            fps: None,
        };
        draw_dodger(&state, &mut off, &palette, &options);
        assert_eq!(off.count_rects_with(palette.stripe), 0);
    }

    #[test]
    fn test_dodger_pipes_and_score() {
        let mut state = dodger();
        state.phase = GamePhase::Playing;
        state.pipes.push(Pipe {
            x: 600.0,
            width: 70.0,
            gap_top: 100.0,
            gap: 160.0,
            scored: false,
        });
        state.hud.set_score(4);
        let palette = Palette::default();
        let mut list = DrawList::new(960.0, 540.0);
        let options = SceneOptions {
            background_motion: false,
            fps: Some(59.6),
        };
        draw_dodger(&state, &mut list, &palette, &options);
        assert_eq!(list.count_rects_with(palette.pipe), 2);
        assert_eq!(list.count_rects_with(palette.pipe_cap), 2);
        let texts = list.texts();
        assert!(texts.contains(&"4"));
        assert!(texts.contains(&"Best 4"));
        assert!(texts.contains(&"60 fps"));
    }

    #[test]
    fn test_crashed_glider_hidden() {
        let mut state = dodger();
        state.phase = GamePhase::Dead;
        let palette = Palette::default();
        let mut list = DrawList::new(960.0, 540.0);
        draw_dodger(&state, &mut list, &palette, &SceneOptions::default());
        assert_eq!(list.count_rects_with(palette.glider), 0);
        assert!(list.texts().contains(&"Crashed"));
    }
}
