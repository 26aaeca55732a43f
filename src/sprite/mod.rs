//! Silhouette masks for pixel-accurate collision

pub mod mask;
pub mod silhouettes;

pub use mask::{Mask, ALPHA_THRESHOLD};
pub use silhouettes::{Silhouettes, AGENT_FRAMES, SPRITE_SCALE};
