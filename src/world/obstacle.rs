//! A scrolling obstacle pair with a procedurally placed gap

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ObstacleConfig;

/// Lifecycle of an obstacle relative to the screen and the leading agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    /// Spawned right of the visible area
    Pending,
    /// Visible and not yet cleared
    Active,
    /// Cleared by the leading agent, still on screen
    Passed,
    /// Trailing edge beyond the retirement line
    Retired,
}

/// Top and bottom segment with a gap between them
///
/// Gap geometry is fixed at generation; only `x` and the passed flag change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    gap_top: i32,
    top: i32,
    bottom: i32,
    width: f32,
    passed: bool,
}

impl Obstacle {
    /// Draw a gap uniformly from `[gap_min, gap_max)` and place the segments around it
    pub fn generate<R: Rng + ?Sized>(
        spawn_x: f32,
        params: &ObstacleConfig,
        segment_height: i32,
        width: f32,
        rng: &mut R,
    ) -> Self {
        let gap_top = rng.random_range(params.gap_min..params.gap_max);
        Self::with_gap(spawn_x, gap_top, params.gap_size, segment_height, width)
    }

    /// Obstacle with a fixed gap
    pub fn with_gap(x: f32, gap_top: i32, gap_size: i32, segment_height: i32, width: f32) -> Self {
        Self {
            x,
            gap_top,
            top: gap_top - segment_height,
            bottom: gap_top + gap_size,
            width,
            passed: false,
        }
    }

    /// Scroll left
    #[inline]
    pub fn advance(&mut self, velocity: f32) {
        self.x -= velocity;
    }

    /// Lower edge of the top segment
    #[inline]
    pub fn gap_top(&self) -> i32 {
        self.gap_top
    }

    /// Upper edge of the bottom segment
    #[inline]
    pub fn gap_bottom(&self) -> i32 {
        self.bottom
    }

    /// Y of the top segment's origin (usually negative)
    #[inline]
    pub fn top_origin(&self) -> i32 {
        self.top
    }

    /// Y of the bottom segment's origin
    #[inline]
    pub fn bottom_origin(&self) -> i32 {
        self.bottom
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// `agent_x` is strictly beyond the trailing edge
    #[inline]
    pub fn is_cleared_by(&self, agent_x: f32) -> bool {
        agent_x > self.trailing_edge()
    }

    /// Set the passed flag; returns true only on the first call
    pub fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }

    pub fn state(&self, screen_width: f32, retire_x: f32) -> ObstacleState {
        if self.trailing_edge() < retire_x {
            ObstacleState::Retired
        } else if self.passed {
            ObstacleState::Passed
        } else if self.x >= screen_width {
            ObstacleState::Pending
        } else {
            ObstacleState::Active
        }
    }
}
