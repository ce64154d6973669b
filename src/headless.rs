// ============================================================================
// headless.rs — Ping, Pong!
// Windowless runner: steps the world at a fixed rate with no player input
// until the round ends or the frame cap is hit.
// ============================================================================

use std::time::Instant;

use glam::Vec2;

use crate::config::{GameConfig, DEFAULT_HEADLESS_FRAMES};
use crate::input::{self, KeysHeld};
use crate::world::{GameEnd, WorldState};

#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    pub frames: u32,
    pub time_step: f32,
    pub progress_interval: u32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: DEFAULT_HEADLESS_FRAMES,
            time_step: 1.0 / 60.0,
            progress_interval: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessReport {
    pub frames_run: u32,
    pub end: Option<GameEnd>,
    pub ball_position: Vec2,
}

pub fn run_headless(game: &GameConfig, config: &HeadlessConfig) -> HeadlessReport {
    let mut world = WorldState::new(game);
    let keys = KeysHeld::default();

    log::info!(
        "Headless run started: up to {} frames at {:.4}s",
        config.frames,
        config.time_step
    );

    let started = Instant::now();
    let mut frames_run = 0u32;

    for step in 0..config.frames {
        input::apply_keys(&mut world, &keys, config.time_step);
        world.update(config.time_step);
        frames_run = step + 1;

        if !world.is_running() {
            break;
        }

        if config.progress_interval > 0 && frames_run % config.progress_interval == 0 {
            log::info!(
                "Headless progress: {}/{} | ball=({:.2}, {:.2})",
                frames_run,
                config.frames,
                world.ball.position.x,
                world.ball.position.y,
            );
        }
    }

    let report = HeadlessReport {
        frames_run,
        end: world.end(),
        ball_position: world.ball.position,
    };

    match report.end {
        Some(end) => log::info!(
            "Headless run finished after {} frames ({:.1} ms): {}",
            report.frames_run,
            started.elapsed().as_secs_f64() * 1000.0,
            end.describe()
        ),
        None => log::info!(
            "Headless run hit the frame cap ({}) with the round still open, ball at ({:.2}, {:.2})",
            report.frames_run,
            report.ball_position.x,
            report.ball_position.y
        ),
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_frame_cap() {
        let config = HeadlessConfig {
            frames: 10,
            ..Default::default()
        };
        let report = run_headless(&GameConfig::default(), &config);
        assert_eq!(report.frames_run, 10);
        assert_eq!(report.end, None);
    }

    #[test]
    fn zero_frames_leaves_world_untouched() {
        let config = HeadlessConfig {
            frames: 0,
            ..Default::default()
        };
        let report = run_headless(&GameConfig::default(), &config);
        assert_eq!(report.frames_run, 0);
        assert_eq!(report.ball_position, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn unblocked_ball_leaves_the_field_to_the_right() {
        // Paddles moved out of the ball's lane.
        let game = GameConfig {
            ball_start: [0.0, 0.0],
            ball_movement: [1.0, 0.0],
            right_paddle_start: [5.0, 2.5],
            left_paddle_start: [-5.0, 2.5],
            ..GameConfig::default()
        };
        let report = run_headless(&game, &HeadlessConfig::default());
        assert_eq!(report.end, Some(GameEnd::LeftScored));
        assert!(report.ball_position.x > game.out_of_bounds_x);
        // 6 units at 4 u/s and 60 fps is about 90 frames, plus the check frame.
        assert!((88..=95).contains(&report.frames_run), "{}", report.frames_run);
    }

    #[test]
    fn ball_reflects_off_a_paddle_and_exits_left() {
        let game = GameConfig {
            ball_start: [3.0, 0.0],
            ball_movement: [1.0, 0.0],
            left_paddle_start: [-5.0, 2.5],
            ..GameConfig::default()
        };
        let report = run_headless(&game, &HeadlessConfig::default());
        assert_eq!(report.end, Some(GameEnd::RightScored));
    }

    #[test]
    fn ball_trajectory_stays_between_walls() {
        let game = GameConfig {
            ball_movement: [0.2, 1.0],
            ..GameConfig::default()
        };
        let config = HeadlessConfig {
            frames: 600,
            ..Default::default()
        };
        let mut world = WorldState::new(&game);
        for _ in 0..config.frames {
            world.update(config.time_step);
            // One frame of overshoot at most before the flip takes effect.
            let overshoot = game.speed * config.time_step;
            assert!(world.ball.position.y.abs() <= 3.75 + overshoot);
        }
    }
}
