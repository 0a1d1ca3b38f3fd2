//! Frame driver
//!
//! One call to `FrameDriver::frame` per display refresh. The driver turns the
//! refresh timestamp into a dt scale, runs the game's update, draws it, and
//! performs the terminal-state check. Nothing here touches the DOM, so the
//! whole loop runs headlessly against a `ManualClock` and a `DrawList`.

use glam::Vec2;

use crate::consts::{MAX_DT, NOMINAL_FRAME_MS};
use crate::hud::Hud;
use crate::input::{FULLSCREEN_KEY, Keyboard};
use crate::platform::Clock;
use crate::renderer::{draw_dodger, draw_platformer, letterbox, Palette, SceneOptions, Surface};
use crate::settings::Settings;
use crate::sim::{DodgerState, GameEvent, GamePhase, PlatformerState};

/// Converts refresh timestamps into dt, in nominal 60 Hz ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// dt for a frame at `now_ms`; the first frame after a reset is one tick
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / NOMINAL_FRAME_MS) as f32,
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_DT) }
    }

    /// Forget the last timestamp, e.g. after the loop was stopped
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Exponentially smoothed frame rate
#[derive(Debug, Clone, Copy, Default)]
struct FpsMeter {
    avg_ms: Option<f64>,
}

impl FpsMeter {
    fn record(&mut self, frame_ms: f64) {
        if frame_ms <= 0.0 || !frame_ms.is_finite() {
            return;
        }
        self.avg_ms = Some(match self.avg_ms {
            Some(avg) => avg * 0.9 + frame_ms * 0.1,
            None => frame_ms,
        });
    }

    fn fps(&self) -> Option<f32> {
        self.avg_ms.map(|ms| (1000.0 / ms) as f32)
    }
}

/// What a game must provide to be run by the frame driver
pub trait Game {
    fn name(&self) -> &'static str;
    /// Called every frame with the surface's current size
    fn resize(&mut self, _width: f32, _height: f32) {}
    /// Fixed drawing area, letterboxed onto the surface; `None` follows the surface
    fn fixed_view(&self) -> Option<Vec2> {
        None
    }
    fn update(&mut self, keys: &Keyboard, dt: f32) -> Vec<GameEvent>;
    fn draw(&self, surface: &mut dyn Surface, palette: &Palette, options: &SceneOptions);
    /// Post-draw terminal check
    fn settle(&mut self) -> Option<GameEvent>;
    fn manual_reset(&mut self);
    fn phase(&self) -> GamePhase;
    fn hud(&self) -> &Hud;
    fn hud_mut(&mut self) -> &mut Hud;
    /// Key that toggles fullscreen, if this game supports it
    fn fullscreen_key(&self) -> Option<&'static str> {
        None
    }
}

impl Game for PlatformerState {
    fn name(&self) -> &'static str {
        "platformer"
    }

    /// The course is laid out for one size and never follows the canvas
    fn fixed_view(&self) -> Option<Vec2> {
        Some(self.surface)
    }

    fn update(&mut self, keys: &Keyboard, dt: f32) -> Vec<GameEvent> {
        PlatformerState::update(self, keys, dt)
    }

    fn draw(&self, surface: &mut dyn Surface, palette: &Palette, options: &SceneOptions) {
        draw_platformer(self, surface, palette, options);
    }

    fn settle(&mut self) -> Option<GameEvent> {
        PlatformerState::settle(self)
    }

    fn manual_reset(&mut self) {
        PlatformerState::manual_reset(self);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn hud(&self) -> &Hud {
        &self.hud
    }

    fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }
}

impl Game for DodgerState {
    fn name(&self) -> &'static str {
        "dodger"
    }

    fn resize(&mut self, width: f32, height: f32) {
        if self.surface.x != width || self.surface.y != height {
            DodgerState::resize(self, width, height);
        }
    }

    fn update(&mut self, keys: &Keyboard, dt: f32) -> Vec<GameEvent> {
        DodgerState::update(self, keys, dt)
    }

    fn draw(&self, surface: &mut dyn Surface, palette: &Palette, options: &SceneOptions) {
        draw_dodger(self, surface, palette, options);
    }

    fn settle(&mut self) -> Option<GameEvent> {
        DodgerState::settle(self)
    }

    fn manual_reset(&mut self) {
        DodgerState::manual_reset(self);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn hud(&self) -> &Hud {
        &self.hud
    }

    fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }

    fn fullscreen_key(&self) -> Option<&'static str> {
        Some(FULLSCREEN_KEY)
    }
}

/// Result of one driven frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub dt: f32,
    pub events: Vec<GameEvent>,
    /// The fullscreen key was pressed this frame
    pub toggle_fullscreen: bool,
}

/// Runs one game: keyboard, frame clock and draw options
pub struct FrameDriver<G: Game> {
    pub game: G,
    pub keyboard: Keyboard,
    clock: FrameClock,
    palette: Palette,
    background_motion: bool,
    show_fps: bool,
    fps: FpsMeter,
    running: bool,
    frames: u64,
}

impl<G: Game> FrameDriver<G> {
    pub fn new(game: G, settings: &Settings) -> Self {
        Self {
            game,
            keyboard: Keyboard::new(),
            clock: FrameClock::new(),
            palette: Palette::default(),
            background_motion: settings.background_motion(),
            show_fps: settings.show_fps,
            fps: FpsMeter::default(),
            running: false,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.clock.reset();
            log::info!("{}: frame loop started", self.game.name());
        }
    }

    /// Stop driving; held keys are released so nothing sticks on resume
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.keyboard.release_all();
            log::info!("{}: frame loop stopped after {} frames", self.game.name(), self.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn key_down(&mut self, code: &str) {
        self.keyboard.key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.keyboard.key_up(code);
    }

    /// The reset button was clicked
    pub fn reset_clicked(&mut self) {
        log::info!("{}: manual reset from {}", self.game.name(), self.game.phase());
        self.game.manual_reset();
    }

    /// Drive one frame at `now_ms`; returns `None` while stopped
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> Option<FrameReport> {
        if !self.running {
            return None;
        }
        let dt = self.clock.tick(now_ms);
        self.fps.record(dt as f64 * NOMINAL_FRAME_MS);
        self.frames += 1;

        self.game.hud_mut().advance_clock(now_ms);
        let size = surface.size();
        self.game.resize(size.x, size.y);

        let mut events = self.game.update(&self.keyboard, dt);
        let toggle_fullscreen = self
            .game
            .fullscreen_key()
            .is_some_and(|key| self.keyboard.was_pressed(key));

        let options = SceneOptions {
            background_motion: self.background_motion,
            fps: if self.show_fps { self.fps.fps() } else { None },
        };
        match self.game.fixed_view() {
            Some(view) => {
                surface.fill_rect(0.0, 0.0, size.x, size.y, self.palette.background_bottom);
                let (scale, offset) = letterbox(view, size);
                surface.set_view(scale, offset);
                self.game.draw(surface, &self.palette, &options);
                surface.set_view(1.0, Vec2::ZERO);
            }
            None => self.game.draw(surface, &self.palette, &options),
        }

        if let Some(event) = self.game.settle() {
            events.push(event);
        }
        self.keyboard.end_frame();

        for event in &events {
            log::debug!("{}: {:?}", self.game.name(), event);
        }
        Some(FrameReport {
            dt,
            events,
            toggle_fullscreen,
        })
    }

    /// Drive `frames` frames from `clock`, waiting one frame between each
    pub fn pump<C: Clock>(
        &mut self,
        clock: &mut C,
        surface: &mut dyn Surface,
        frames: usize,
    ) -> Vec<FrameReport> {
        let mut reports = Vec::with_capacity(frames);
        for _ in 0..frames {
            if let Some(report) = self.frame(clock.now_ms(), surface) {
                reports.push(report);
            }
            clock.wait_frame();
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::renderer::{DrawCmd, DrawList};
    use crate::sim::dodger::CRASH_MESSAGE;
    use crate::sim::platformer::{IDLE_MESSAGE, RESET_MESSAGE};
    use crate::tuning::{DodgerTuning, PlatformerTuning};
    use proptest::prelude::*;

    fn platformer_driver() -> FrameDriver<PlatformerState> {
        let game = PlatformerState::new(PlatformerTuning::default(), 500, 11);
        FrameDriver::new(game, &Settings::default())
    }

    fn dodger_driver() -> FrameDriver<DodgerState> {
        let game = DodgerState::new(DodgerTuning::default(), 500, 11, 960.0, 540.0);
        FrameDriver::new(game, &Settings::default())
    }

    #[test]
    fn test_frame_clock_normalizes_and_caps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1000.0), 1.0);
        let dt = clock.tick(1000.0 + NOMINAL_FRAME_MS);
        assert!((dt - 1.0).abs() < 1e-4);
        // Tab resume: a full second collapses to the cap
        assert_eq!(clock.tick(3000.0), MAX_DT);
        // Timestamps never run backwards into negative dt
        assert_eq!(clock.tick(2000.0), 0.0);
        clock.reset();
        assert_eq!(clock.tick(9000.0), 1.0);
    }

    #[test]
    fn test_stopped_driver_does_nothing() {
        let mut driver = platformer_driver();
        let mut list = DrawList::new(960.0, 540.0);
        assert!(driver.frame(0.0, &mut list).is_none());
        assert!(list.is_empty());

        driver.start();
        assert!(driver.frame(16.0, &mut list).is_some());
        driver.stop();
        assert!(!driver.is_running());
        assert!(driver.frame(32.0, &mut list).is_none());
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_stop_releases_keys() {
        let mut driver = platformer_driver();
        driver.start();
        driver.key_down("KeyD");
        driver.stop();
        assert!(!driver.keyboard.is_held("KeyD"));
    }

    #[test]
    fn test_reset_message_reverts_on_virtual_clock() {
        let mut driver = platformer_driver();
        let mut clock = ManualClock::new(NOMINAL_FRAME_MS);
        let mut list = DrawList::new(960.0, 540.0);
        driver.start();
        driver.pump(&mut clock, &mut list, 1);
        driver.reset_clicked();
        assert_eq!(driver.game.hud.status(), RESET_MESSAGE);

        // Just short of the revert delay
        driver.pump(&mut clock, &mut list, 110);
        assert_eq!(driver.game.hud.status(), RESET_MESSAGE);
        driver.pump(&mut clock, &mut list, 20);
        assert_eq!(driver.game.hud.status(), IDLE_MESSAGE);
    }

    #[test]
    fn test_jump_press_is_consumed_once() {
        let mut driver = platformer_driver();
        let mut clock = ManualClock::new(NOMINAL_FRAME_MS);
        let mut list = DrawList::new(960.0, 540.0);
        driver.start();
        driver.key_down("KeyW");
        let reports = driver.pump(&mut clock, &mut list, 3);
        let started = reports
            .iter()
            .flat_map(|r| r.events.iter())
            .filter(|e| **e == GameEvent::Started)
            .count();
        assert_eq!(started, 1);
        assert_eq!(driver.game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_surface_size_reaches_game() {
        let mut driver = dodger_driver();
        let mut list = DrawList::new(1280.0, 720.0);
        driver.start();
        driver.frame(0.0, &mut list);
        assert_eq!(driver.game.surface.x, 1280.0);
        assert_eq!(driver.game.glider.pos.x, 320.0);
    }

    #[test]
    fn test_platformer_keeps_course_floor_on_tall_canvas() {
        let mut driver = platformer_driver();
        let mut clock = ManualClock::default();
        let mut list = DrawList::new(960.0, 720.0);
        driver.start();
        driver.game.phase = GamePhase::Playing;
        // Over the fire pit, below the platform above it
        driver.game.robots[0].body.pos = Vec2::new(330.0, 340.0);
        driver.pump(&mut clock, &mut list, 90);

        let spark = &driver.game.robots[0].body;
        assert_eq!(driver.game.surface, Vec2::new(960.0, 540.0));
        assert_eq!(spark.bottom(), 540.0);
        assert!(spark.grounded);
        assert_eq!(driver.game.phase(), GamePhase::Playing);
        assert!(list.commands.contains(&DrawCmd::View {
            scale: 1.0,
            offset: Vec2::new(0.0, 90.0),
        }));
        assert_eq!(list.commands.last(), Some(&DrawCmd::View {
            scale: 1.0,
            offset: Vec2::ZERO,
        }));
    }

    #[test]
    fn test_platformer_cannot_pass_under_gate_on_tall_canvas() {
        let mut driver = platformer_driver();
        let mut clock = ManualClock::default();
        let mut list = DrawList::new(1280.0, 900.0);
        driver.start();
        driver.game.phase = GamePhase::Playing;
        // Wave is safe in water; start on the floor just left of gate A
        driver.game.robots[1].body.pos = Vec2::new(500.0, 494.0);
        driver.key_down("ArrowRight");
        driver.pump(&mut clock, &mut list, 120);

        let wave = &driver.game.robots[1].body;
        assert!(wave.rect().right() <= 560.0);
        assert_eq!(wave.bottom(), 540.0);
    }

    #[test]
    fn test_fullscreen_key_only_for_dodger() {
        let mut dodger = dodger_driver();
        let mut list = DrawList::new(960.0, 540.0);
        dodger.start();
        dodger.key_down("KeyF");
        let report = dodger.frame(0.0, &mut list).unwrap();
        assert!(report.toggle_fullscreen);
        // Holding the key does not retrigger
        let report = dodger.frame(16.0, &mut list).unwrap();
        assert!(!report.toggle_fullscreen);

        let mut platformer = platformer_driver();
        platformer.start();
        platformer.key_down("KeyF");
        let report = platformer.frame(0.0, &mut list).unwrap();
        assert!(!report.toggle_fullscreen);
    }

    #[test]
    fn test_dodger_crash_resets_through_driver() {
        let mut driver = dodger_driver();
        let mut clock = ManualClock::new(NOMINAL_FRAME_MS);
        let mut list = DrawList::new(960.0, 540.0);
        driver.start();
        driver.key_down("Space");
        driver.key_up("Space");

        // Never flap again: the glider falls to the floor and crashes
        let reports = driver.pump(&mut clock, &mut list, 600);
        let events: Vec<_> = reports.iter().flat_map(|r| r.events.iter()).collect();
        assert_eq!(events.iter().filter(|e| ***e == GameEvent::Died).count(), 1);
        assert_eq!(events.iter().filter(|e| ***e == GameEvent::Reset).count(), 1);
        assert_eq!(driver.game.phase(), GamePhase::Menu);
        assert!(driver.game.pipes.is_empty());
        // The crash message was shown at some point and has since reverted
        assert_ne!(driver.game.hud.status(), CRASH_MESSAGE);
    }

    #[test]
    fn test_fps_shown_when_enabled() {
        let game = DodgerState::new(DodgerTuning::default(), 500, 1, 960.0, 540.0);
        let settings = Settings {
            show_fps: true,
            ..Settings::default()
        };
        let mut driver = FrameDriver::new(game, &settings);
        let mut clock = ManualClock::new(NOMINAL_FRAME_MS);
        let mut list = DrawList::new(960.0, 540.0);
        driver.start();
        driver.pump(&mut clock, &mut list, 2);
        assert!(list.texts().contains(&"60 fps"));
    }

    proptest! {
        #[test]
        fn dt_always_within_cap(times in proptest::collection::vec(-1.0e6f64..1.0e6, 1..50)) {
            let mut clock = FrameClock::new();
            for t in times {
                let dt = clock.tick(t);
                prop_assert!((0.0..=MAX_DT).contains(&dt));
            }
        }
    }
}
