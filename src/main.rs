//! Dual Arcade entry point
//!
//! On the web this starts the canvas bridge. Natively it runs both games
//! headlessly on a virtual clock with scripted input and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Dual Arcade starting...");
    if let Err(e) = dual_arcade::platform::web::run() {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dual Arcade (native, headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Ignoring settings file {path}: {e}");
                dual_arcade::Settings::default()
            }
        },
        None => dual_arcade::Settings::default(),
    };

    headless::run_platformer(&settings);
    headless::run_dodger(&settings);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<dual_arcade::Settings, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(dual_arcade::Settings::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dual_arcade::driver::FrameReport;
    use dual_arcade::platform::ManualClock;
    use dual_arcade::renderer::DrawList;
    use dual_arcade::sim::{DodgerState, GameEvent, PlatformerState};
    use dual_arcade::tuning::Tuning;
    use dual_arcade::{FrameDriver, Game, Settings};

    const WIDTH: f32 = 960.0;
    const HEIGHT: f32 = 540.0;

    fn seed(settings: &Settings) -> u64 {
        if settings.seed == 0 { 0x5eed } else { settings.seed }
    }

    fn summarize(name: &str, reports: &[FrameReport]) {
        let mut deaths = 0;
        let mut wins = 0;
        let mut resets = 0;
        for event in reports.iter().flat_map(|r| r.events.iter()) {
            match event {
                GameEvent::Died => deaths += 1,
                GameEvent::Won => wins += 1,
                GameEvent::Reset => resets += 1,
                GameEvent::GateChanged { id, open } => {
                    log::info!("{name}: gate {id} {}", if *open { "opened" } else { "sealed" })
                }
                _ => {}
            }
        }
        log::info!(
            "{name}: {} frames, {deaths} deaths, {wins} wins, {resets} resets",
            reports.len()
        );
    }

    /// Walk Spark right off the start platform into the water pool
    pub fn run_platformer(settings: &Settings) {
        let tuning = Tuning::default().platformer;
        let game = PlatformerState::new(tuning, settings.max_particles(), seed(settings));
        let mut driver = FrameDriver::new(game, settings);
        let mut clock = ManualClock::default();
        let mut surface = DrawList::new(WIDTH, HEIGHT);

        driver.start();
        let mut reports = driver.pump(&mut clock, &mut surface, 30);
        driver.key_down("KeyW");
        reports.extend(driver.pump(&mut clock, &mut surface, 1));
        driver.key_up("KeyW");
        driver.key_down("KeyD");
        for _ in 0..600 {
            surface.clear();
            reports.extend(driver.pump(&mut clock, &mut surface, 1));
        }
        driver.key_up("KeyD");
        driver.stop();

        summarize(driver.game.name(), &reports);
        log::info!(
            "{}: ended in {} with status {:?}",
            driver.game.name(),
            driver.game.phase(),
            driver.game.hud().status()
        );
    }

    /// Flap on a fixed rhythm and let the pipes decide
    pub fn run_dodger(settings: &Settings) {
        let tuning = Tuning::default().dodger;
        let game = DodgerState::new(tuning, settings.max_particles(), seed(settings), WIDTH, HEIGHT);
        let mut driver = FrameDriver::new(game, settings);
        let mut clock = ManualClock::default();
        let mut surface = DrawList::new(WIDTH, HEIGHT);

        driver.start();
        let mut reports = Vec::new();
        for frame in 0..1800 {
            if frame % 24 == 0 {
                driver.key_down("Space");
            }
            surface.clear();
            reports.extend(driver.pump(&mut clock, &mut surface, 1));
            driver.key_up("Space");
        }
        driver.stop();

        summarize(driver.game.name(), &reports);
        log::info!(
            "{}: best score {}",
            driver.game.name(),
            driver.game.hud().best()
        );
    }
}
