//! Silhouette set shared by every agent and obstacle of a session
//!
//! The procedural defaults mirror the sprite proportions the course was tuned
//! for: a 34x24 flapping agent and a 52x320 lipped pipe, both drawn at 2x.

use crate::error::ConfigError;

use super::mask::Mask;

/// Number of flap frames in the agent animation
pub const AGENT_FRAMES: usize = 3;

/// Scale factor applied to the procedural source silhouettes
pub const SPRITE_SCALE: u32 = 2;

/// Masks used for collision and geometry
#[derive(Debug, Clone)]
pub struct Silhouettes {
    /// Flap frames, wings up / level / down
    pub agent_frames: [Mask; AGENT_FRAMES],
    /// Segment hanging from the ceiling (origin at its top-left)
    pub obstacle_top: Mask,
    /// Segment standing on the ground
    pub obstacle_bottom: Mask,
    /// Width of one ground strip tile
    pub ground_width: f32,
}

impl Silhouettes {
    /// Build a set from a single obstacle segment; the top segment is its vertical mirror
    pub fn new(agent_frames: [Mask; AGENT_FRAMES], obstacle: Mask, ground_width: f32) -> Self {
        Self {
            agent_frames,
            obstacle_top: obstacle.flipped_vertical(),
            obstacle_bottom: obstacle,
            ground_width,
        }
    }

    /// Procedural stand-ins for sprite artwork
    pub fn procedural() -> Self {
        let frames = [5, 10, 15].map(|wing_y| agent_frame(wing_y).scaled(SPRITE_SCALE));
        Self::new(frames, pipe().scaled(SPRITE_SCALE), 336.0 * SPRITE_SCALE as f32)
    }

    #[inline]
    pub fn agent_frame(&self, index: usize) -> &Mask {
        &self.agent_frames[index.min(AGENT_FRAMES - 1)]
    }

    /// Horizontal extent of an obstacle
    #[inline]
    pub fn obstacle_width(&self) -> f32 {
        self.obstacle_bottom.width() as f32
    }

    /// Vertical extent of one obstacle segment
    #[inline]
    pub fn segment_height(&self) -> i32 {
        self.obstacle_top.height() as i32
    }

    /// Reject sets that could never collide or have no extent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_frames.iter().any(Mask::is_empty) {
            return Err(ConfigError::EmptySilhouette("agent"));
        }
        if self.obstacle_top.width() == 0 || self.obstacle_top.height() == 0 {
            return Err(ConfigError::EmptySilhouette("obstacle top"));
        }
        if self.obstacle_bottom.width() == 0 || self.obstacle_bottom.height() == 0 {
            return Err(ConfigError::EmptySilhouette("obstacle bottom"));
        }
        if !(self.ground_width.is_finite() && self.ground_width > 0.0) {
            return Err(ConfigError::EmptySilhouette("ground"));
        }
        Ok(())
    }
}

impl Default for Silhouettes {
    fn default() -> Self {
        Self::procedural()
    }
}

/// 34x24 body with a wing sticking out behind it at `wing_y`
fn agent_frame(wing_y: u32) -> Mask {
    let mut frame = Mask::new(34, 24);
    frame.stamp(&Mask::ellipse(28, 24), 6, 0);
    frame.fill_rect(0, wing_y, 10, 4);
    frame
}

/// 52x320 pipe: full-width lip on top of a slightly narrower shaft
fn pipe() -> Mask {
    let mut pipe = Mask::new(52, 320);
    pipe.fill_rect(0, 0, 52, 24);
    pipe.fill_rect(2, 24, 48, 296);
    pipe
}
