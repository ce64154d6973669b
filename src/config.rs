// ============================================================================
// config.rs — Ping, Pong!
// Game constants, JSON-loadable configuration, and command-line options.
// ============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ======================== Game Configuration ========================

/// Every tunable of the game. `Default` reproduces the classic layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,

    pub paddle_texture: PathBuf,
    pub ball_texture: PathBuf,

    /// Shared by both paddles and the ball, in world units per second.
    pub speed: f32,

    /// Full width/height of a paddle.
    pub paddle_size: [f32; 2],
    pub left_paddle_start: [f32; 2],
    pub right_paddle_start: [f32; 2],

    pub ball_size: [f32; 2],
    pub ball_start: [f32; 2],
    pub ball_movement: [f32; 2],
    /// Applied to the ball quad. Negative components mirror the sprite.
    pub ball_scale: [f32; 2],

    /// Half of the visible field: x in [-w, w], y in [-h, h].
    pub field_half_extents: [f32; 2],
    /// The round ends once |ball.x| exceeds this.
    pub out_of_bounds_x: f32,

    pub clear_color: [f64; 4],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 640,
            window_height: 480,
            window_title: String::from("Ping, Pong!"),
            paddle_texture: PathBuf::from("assets/bar.png"),
            ball_texture: PathBuf::from("assets/ball.png"),
            speed: 4.0,
            paddle_size: [0.5, 2.0],
            left_paddle_start: [-5.0, 0.0],
            right_paddle_start: [5.0, 0.0],
            ball_size: [0.5, 0.5],
            ball_start: [-3.0, 0.0],
            ball_movement: [1.0, 1.0],
            ball_scale: [-0.5, -0.5],
            field_half_extents: [5.0, 3.75],
            out_of_bounds_x: 6.0,
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window_width, self.window_height
            )));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        let positive = |v: [f32; 2]| v.iter().all(|c| c.is_finite() && *c > 0.0);
        if !positive(self.paddle_size) || !positive(self.ball_size) {
            return Err(ConfigError::Invalid(String::from(
                "paddle and ball sizes must be positive",
            )));
        }
        if !positive(self.field_half_extents) {
            return Err(ConfigError::Invalid(String::from(
                "field half extents must be positive",
            )));
        }
        let paddle_half_height = self.paddle_size[1] / 2.0;
        for start in [self.left_paddle_start, self.right_paddle_start] {
            if start[1].abs() + paddle_half_height > self.field_half_extents[1] {
                return Err(ConfigError::Invalid(format!(
                    "paddle start y={} leaves the field",
                    start[1]
                )));
            }
        }
        if self.out_of_bounds_x <= 0.0 {
            return Err(ConfigError::Invalid(String::from(
                "out_of_bounds_x must be positive",
            )));
        }
        Ok(())
    }
}

// ======================== Errors ========================

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

// ======================== Command Line ========================

pub const DEFAULT_HEADLESS_FRAMES: u32 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub headless: bool,
    pub frames: u32,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            headless: false,
            frames: DEFAULT_HEADLESS_FRAMES,
        }
    }
}

impl CliOptions {
    /// Parse options from an argument list (program name already stripped).
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| String::from("--config requires a path"))?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--headless" => options.headless = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| String::from("--frames requires a number"))?;
                    options.frames = value
                        .parse()
                        .map_err(|e| format!("invalid --frames value '{}': {}", value, e))?;
                }
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }

        Ok(options)
    }
}
