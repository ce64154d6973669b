// ============================================================================
// main.rs — Ping, Pong!
// Entry point. Initializes logging, reads options and config, and runs either
// the windowed game or the headless simulation.
// ============================================================================

mod app;
mod camera;
mod config;
mod headless;
mod input;
mod pipeline;
mod renderer;
mod texture;
mod world;

use std::process::ExitCode;

use app::App;
use config::{CliOptions, GameConfig};
use headless::HeadlessConfig;
use winit::event_loop::EventLoop;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let options = CliOptions::parse(std::env::args().skip(1))?;

    let config = match &options.config_path {
        Some(path) => {
            let config = GameConfig::load(path).map_err(|e| e.to_string())?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => GameConfig::default(),
    };

    if options.headless {
        headless::run_headless(
            &config,
            &HeadlessConfig {
                frames: options.frames,
                ..Default::default()
            },
        );
        return Ok(());
    }

    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {e}"))?;
    app.finish()
}
