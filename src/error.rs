//! Error types for the generation engine
//!
//! Configuration and observation failures are fatal for a generation.
//! Policy failures are recovered inside the tick that produced them.

use thiserror::Error;

/// Invalid simulation parameters, detected before the first tick
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("gap range is empty: min {min} must be below max {max}")]
    EmptyGapRange { min: i32, max: i32 },

    #[error("gap minimum {min} leaves no visible top segment")]
    DegenerateTopSegment { min: i32 },

    #[error("gap max {max} + gap size {gap_size} exceeds ground line {ground_y}")]
    GapBelowGround { max: i32, gap_size: i32, ground_y: f32 },

    #[error("gap size must be positive, got {0}")]
    NonPositiveGapSize(i32),

    #[error("invalid screen bounds {width}x{height} with ground at {ground_y}")]
    InvalidScreen { width: f32, height: f32, ground_y: f32 },

    #[error("spawn height {spawn_y} is outside the valid band 0..{ground_y}")]
    SpawnOutOfBand { spawn_y: f32, ground_y: f32 },

    #[error("scroll speed must be positive and finite, got {0}")]
    InvalidScrollSpeed(f32),

    #[error("silhouette '{0}' is empty")]
    EmptySilhouette(&'static str),
}

/// Failure to build a silhouette mask
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A policy could not produce a decision for this tick
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("policy returned a non-finite output ({0})")]
    NonFinite(f32),

    #[error("policy evaluation failed: {0}")]
    Evaluation(String),
}

/// Fatal engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("no live obstacle to observe at tick {tick}")]
    Observation { tick: u64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
