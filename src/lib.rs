//! # Gapflight - generation simulator for neuroevolution
//!
//! Agents under gravity fly through a stream of scrolling gap obstacles. Each
//! agent is steered by an externally supplied policy, and fitness is written
//! straight into the optimizer's records as the generation runs.

pub mod config;
pub mod entity;
pub mod error;
pub mod policy;
pub mod simulation;
pub mod sprite;
pub mod world;

// Headless training module (native only)
#[cfg(all(not(target_arch = "wasm32"), feature = "headless"))]
pub mod headless;

pub use config::SimConfig;
pub use error::{ConfigError, EngineError, EngineResult, MaskError, PolicyError};
pub use simulation::{GenerationReport, Session, TerminationReason};

/// Common imports for internal use
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::entity::AgentBody;
    pub use crate::policy::{FeedForwardPolicy, Observation, Policy, ThresholdPolicy};
    pub use crate::simulation::{
        AgentEntry, AgentId, Fate, FitnessSink, GenerationReport, Headless, Presenter, Session,
        TerminationReason,
    };
    pub use crate::sprite::{Mask, Silhouettes};
    pub use crate::world::{Obstacle, ObstacleStream, ScrollTrack};
    pub use glam::{IVec2, Vec2};
}
