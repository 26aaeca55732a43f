//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `gapflight.ron` file (if exists), or an explicit path
//! 3. Environment variables prefixed with `GAPFLIGHT_`
//!
//! Example environment variable: `GAPFLIGHT_OBSTACLES__GAP_SIZE=180`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SimConfig {
    #[serde(default)]
    pub screen: ScreenConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub obstacles: ObstacleConfig,

    #[serde(default)]
    pub fitness: FitnessConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Playfield bounds in pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
    /// Agents whose silhouette reaches below this line are removed
    pub ground_y: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 800.0,
            ground_y: 730.0,
        }
    }
}

/// Agent motion model constants (per tick, pixels, degrees)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Quadratic coefficient in `d = v*t + g*t^2`
    pub gravity: f32,
    /// Maximum downward displacement per tick
    pub terminal_displacement: f32,
    /// Extra upward displacement while rising
    pub ascent_bias: f32,
    pub max_tilt: f32,
    pub min_tilt: f32,
    pub rotation_rate: f32,
    /// Tilt stays up while within this distance below the jump height
    pub tilt_hold: f32,
    /// Ticks each flap frame is shown
    pub animation_ticks: u32,
    /// Policy outputs above this value trigger a jump
    pub decision_threshold: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            spawn_x: 230.0,
            spawn_y: 350.0,
            jump_velocity: -10.5,
            gravity: 1.5,
            terminal_displacement: 16.0,
            ascent_bias: 2.0,
            max_tilt: 25.0,
            min_tilt: -90.0,
            rotation_rate: 20.0,
            tilt_hold: 50.0,
            animation_ticks: 5,
            decision_threshold: 0.5,
        }
    }
}

/// Obstacle generation and scrolling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Inclusive lower bound of the gap top
    pub gap_min: i32,
    /// Exclusive upper bound of the gap top
    pub gap_max: i32,
    pub gap_size: i32,
    /// Horizontal distance per tick, shared with the ground track
    pub scroll_speed: f32,
    pub spawn_x: f32,
    /// Obstacles whose trailing edge is left of this are retired
    pub retire_x: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            gap_min: 50,
            gap_max: 450,
            gap_size: 200,
            scroll_speed: 5.0,
            spawn_x: 600.0,
            retire_x: 0.0,
        }
    }
}

/// Fitness rewards and penalties
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FitnessConfig {
    pub survival_bonus: f32,
    pub pass_bonus: f32,
    pub collision_penalty: f32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            survival_bonus: 0.1,
            pass_bonus: 5.0,
            collision_penalty: 1.0,
        }
    }
}

/// Generation termination and seeding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// A generation succeeds once the score exceeds this
    pub score_limit: u32,
    /// Seed for obstacle gap generation
    pub seed: u64,
    /// Optional hard bound on ticks per generation
    pub max_ticks: Option<u64>,
    /// Offset the seed by the generation number so each generation flies a new course
    pub vary_course: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            score_limit: 50,
            seed: 0,
            max_ticks: None,
            vary_course: false,
        }
    }
}

impl SimConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `gapflight.ron` in the working directory (if exists)
    /// 3. Environment variables prefixed with `GAPFLIGHT_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_layers(File::with_name("gapflight").format(FileFormat::Ron).required(false))
    }

    /// Same as [`SimConfig::load`] but with an explicit, required config file
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_layers(File::from(path).format(FileFormat::Ron).required(true))
    }

    fn load_layers<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("GAPFLIGHT").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let sim: SimConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        sim.validate().context("Invalid configuration")?;
        Ok(sim)
    }

    /// Parse a RON document, filling missing fields from defaults
    pub fn from_ron(text: &str) -> Result<Self> {
        let sim: SimConfig = ron::from_str(text).context("Failed to parse RON configuration")?;
        sim.validate().context("Invalid configuration")?;
        Ok(sim)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let screen = &self.screen;
        let screen_ok = screen.width.is_finite()
            && screen.height.is_finite()
            && screen.ground_y.is_finite()
            && screen.width > 0.0
            && screen.height > 0.0
            && screen.ground_y > 0.0
            && screen.ground_y <= screen.height;
        if !screen_ok {
            return Err(ConfigError::InvalidScreen {
                width: screen.width,
                height: screen.height,
                ground_y: screen.ground_y,
            });
        }

        let spawn_y = self.agent.spawn_y;
        if !(spawn_y.is_finite() && spawn_y >= 0.0 && spawn_y < screen.ground_y) {
            return Err(ConfigError::SpawnOutOfBand {
                spawn_y,
                ground_y: screen.ground_y,
            });
        }

        let obstacles = &self.obstacles;
        if obstacles.gap_size <= 0 {
            return Err(ConfigError::NonPositiveGapSize(obstacles.gap_size));
        }
        if obstacles.gap_min <= 0 {
            return Err(ConfigError::DegenerateTopSegment {
                min: obstacles.gap_min,
            });
        }
        if obstacles.gap_min >= obstacles.gap_max {
            return Err(ConfigError::EmptyGapRange {
                min: obstacles.gap_min,
                max: obstacles.gap_max,
            });
        }
        if (i64::from(obstacles.gap_max) + i64::from(obstacles.gap_size)) as f64
            > f64::from(screen.ground_y)
        {
            return Err(ConfigError::GapBelowGround {
                max: obstacles.gap_max,
                gap_size: obstacles.gap_size,
                ground_y: screen.ground_y,
            });
        }
        if !(obstacles.scroll_speed.is_finite() && obstacles.scroll_speed > 0.0) {
            return Err(ConfigError::InvalidScrollSpeed(obstacles.scroll_speed));
        }

        Ok(())
    }
}
