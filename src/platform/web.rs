//! Browser bridge: canvas 2D surface, DOM wiring and the refresh loop
//!
//! The page provides a `<canvas id="game">` with optional `data-game`
//! ("platformer" or "dodger"), `data-settings` and `data-tuning` JSON
//! attributes, plus optional `#status`, `#score` and `#reset` elements.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use super::fullscreen::{Fullscreen, FullscreenError};
use crate::driver::{FrameDriver, Game};
use crate::input::{FLAP_KEYS, SPARK_CONTROLS, WAVE_CONTROLS};
use crate::renderer::{Color, Surface, TextAlign};
use crate::settings::{ConfigError, Settings};
use crate::sim::{DodgerState, PlatformerState};
use crate::tuning::Tuning;

/// Startup failures
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("#game is not a canvas element")]
    NotACanvas,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for BridgeError {
    fn from(value: JsValue) -> Self {
        BridgeError::Js(format!("{value:?}"))
    }
}

/// `Surface` over a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BridgeError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(BridgeError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BridgeError::NoContext)?;
        let surface = Self { canvas, ctx };
        surface.sync_size();
        Ok(surface)
    }

    /// Match the backing store to the element's layout size
    pub fn sync_size(&self) {
        let w = self.canvas.client_width().max(1) as u32;
        let h = self.canvas.client_height().max(1) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::debug!("Canvas resized to {w}x{h}");
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
        let gradient = self
            .ctx
            .create_linear_gradient(x as f64, y as f64, x as f64, (y + h) as f64);
        let _ = gradient.add_color_stop(0.0, &top.to_css());
        let _ = gradient.add_color_stop(1.0, &bottom.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.set_font(&format!("{size_px}px sans-serif"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn fill_rotated_rect(&mut self, center: Vec2, size: f32, rotation: f32, color: Color) {
        let half = size as f64 / 2.0;
        self.ctx.save();
        let _ = self.ctx.translate(center.x as f64, center.y as f64);
        let _ = self.ctx.rotate(rotation as f64);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(-half, -half, size as f64, size as f64);
        self.ctx.restore();
    }

    fn set_view(&mut self, scale: f32, offset: Vec2) {
        let s = scale as f64;
        let _ = self
            .ctx
            .set_transform(s, 0.0, 0.0, s, offset.x as f64, offset.y as f64);
    }
}

/// Everything one running page needs between refresh callbacks
struct Runner<G: Game> {
    driver: FrameDriver<G>,
    surface: CanvasSurface,
    fullscreen: Fullscreen,
    document: Document,
    status_el: Option<Element>,
    score_el: Option<Element>,
    last_revision: Option<u64>,
}

impl<G: Game> Runner<G> {
    fn frame(&mut self, now_ms: f64) {
        self.surface.sync_size();
        let Some(report) = self.driver.frame(now_ms, &mut self.surface) else {
            return;
        };
        // Esc or a late browser rejection changes fullscreen behind our back
        self.fullscreen
            .sync(self.document.fullscreen_element().is_some());
        if report.toggle_fullscreen {
            let canvas = self.surface.canvas.clone();
            let document = self.document.clone();
            self.fullscreen
                .toggle(|enter| request_fullscreen(&document, &canvas, enter));
        }
        self.sync_hud();
    }

    /// Push status and score text to the DOM when the HUD changed
    fn sync_hud(&mut self) {
        let hud = self.driver.game.hud();
        if self.last_revision == Some(hud.revision()) {
            return;
        }
        self.last_revision = Some(hud.revision());
        if let Some(el) = &self.status_el {
            el.set_text_content(Some(hud.status()));
        }
        if let Some(el) = &self.score_el {
            el.set_text_content(Some(&format!("Score {} / Best {}", hud.score(), hud.best())));
        }
    }
}

fn request_fullscreen(
    document: &Document,
    canvas: &HtmlCanvasElement,
    enter: bool,
) -> Result<(), FullscreenError> {
    if enter {
        canvas
            .request_fullscreen()
            .map_err(|e| FullscreenError::Rejected(format!("{e:?}")))
    } else if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        Ok(())
    } else {
        Err(FullscreenError::Unsupported)
    }
}

fn is_game_key(code: &str) -> bool {
    FLAP_KEYS.contains(&code)
        || [SPARK_CONTROLS, WAVE_CONTROLS]
            .iter()
            .any(|c| c.left == code || c.right == code || c.jump == code)
}

fn parse_attr<T>(
    canvas: &HtmlCanvasElement,
    name: &str,
    parse: fn(&str) -> Result<T, ConfigError>,
) -> Result<Option<T>, ConfigError> {
    canvas.get_attribute(name).map(|json| parse(&json)).transpose()
}

/// Find the canvas, read configuration and start the selected game
pub fn run() -> Result<(), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::Missing("window"))?;
    let document = window.document().ok_or(BridgeError::Missing("document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("game")
        .ok_or(BridgeError::Missing("#game canvas"))?
        .dyn_into()
        .map_err(|_| BridgeError::NotACanvas)?;

    let settings = parse_attr(&canvas, "data-settings", Settings::from_json)?.unwrap_or_default();
    let tuning = parse_attr(&canvas, "data-tuning", Tuning::from_json)?.unwrap_or_default();
    let seed = if settings.seed == 0 {
        js_sys::Date::now() as u64
    } else {
        settings.seed
    };
    let max_particles = settings.max_particles();
    log::info!(
        "Settings: quality {}, particle cap {}, seed {}",
        settings.quality.as_str(),
        max_particles,
        seed
    );

    let surface = CanvasSurface::new(canvas.clone())?;
    let size = surface.size();
    match canvas.get_attribute("data-game").as_deref() {
        Some("dodger") => {
            let game = DodgerState::new(tuning.dodger, max_particles, seed, size.x, size.y);
            launch(game, &settings, surface, document)
        }
        _ => {
            let game = PlatformerState::new(tuning.platformer, max_particles, seed);
            launch(game, &settings, surface, document)
        }
    }
}

fn launch<G: Game + 'static>(
    game: G,
    settings: &Settings,
    surface: CanvasSurface,
    document: Document,
) -> Result<(), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::Missing("window"))?;
    log::info!("Launching {}", game.name());

    let mut driver = FrameDriver::new(game, settings);
    driver.start();
    let runner = Rc::new(RefCell::new(Runner {
        driver,
        surface,
        fullscreen: Fullscreen::new(),
        status_el: document.get_element_by_id("status"),
        score_el: document.get_element_by_id("score"),
        document: document.clone(),
        last_revision: None,
    }));

    // Keyboard
    {
        let runner = runner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let code = event.code();
            if is_game_key(&code) {
                event.prevent_default();
            }
            runner.borrow_mut().driver.key_down(&code);
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let runner = runner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            runner.borrow_mut().driver.key_up(&event.code());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Focus loss would otherwise leave keys stuck down
    {
        let runner = runner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            runner.borrow_mut().driver.keyboard.release_all();
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = document.get_element_by_id("reset") {
        let runner = runner.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            runner.borrow_mut().driver.reset_clicked();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    request_animation_frame(runner);
    Ok(())
}

fn request_animation_frame<G: Game + 'static>(runner: Rc<RefCell<Runner<G>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        runner.borrow_mut().frame(time);
        request_animation_frame(runner);
    });
    if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
    closure.forget();
}
