//! Agent body: vertical motion model, tilt and flap animation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;

/// Below this tilt the agent is diving and stops flapping
const DIVE_TILT: f32 = -80.0;

/// Physics state of one agent
///
/// Screen coordinates: `y` grows downward, negative velocity is upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBody {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    /// Ticks since the last jump (or since spawn)
    pub tick_count: u32,
    /// Height at the last jump
    pub jump_height: f32,
    /// Cosmetic orientation in degrees, positive is nose-up
    pub tilt: f32,
    anim_count: u32,
    frame: usize,
}

impl AgentBody {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            jump_height: y,
            tilt: 0.0,
            anim_count: 0,
            frame: 0,
        }
    }

    /// Spawn at the configured start point
    pub fn spawn(params: &AgentConfig) -> Self {
        Self::new(params.spawn_x, params.spawn_y)
    }

    /// Upward impulse
    pub fn jump(&mut self, params: &AgentConfig) {
        self.velocity = params.jump_velocity;
        self.tick_count = 0;
        self.jump_height = self.y;
    }

    /// Advance one fixed step; returns the applied displacement
    pub fn tick(&mut self, params: &AgentConfig) -> f32 {
        self.tick_count += 1;
        let t = self.tick_count as f32;

        let mut d = self.velocity * t + params.gravity * t * t;
        if d >= params.terminal_displacement {
            d = params.terminal_displacement;
        }
        if d < 0.0 {
            d -= params.ascent_bias;
        }

        self.y += d;

        if d < 0.0 || self.y < self.jump_height + params.tilt_hold {
            if self.tilt < params.max_tilt {
                self.tilt = params.max_tilt;
            }
        } else {
            self.tilt = (self.tilt - params.rotation_rate).max(params.min_tilt);
        }

        self.animate(params.animation_ticks);
        d
    }

    /// Flap cycle 0,1,2,1,0; a diving agent holds its wings level
    fn animate(&mut self, frame_ticks: u32) {
        let t = frame_ticks.max(1);
        self.anim_count += 1;

        self.frame = if self.anim_count < t {
            0
        } else if self.anim_count < t * 2 {
            1
        } else if self.anim_count < t * 3 {
            2
        } else if self.anim_count <= t * 4 {
            1
        } else {
            self.anim_count = 0;
            0
        };

        if self.tilt <= DIVE_TILT {
            self.frame = 1;
            self.anim_count = t * 2;
        }
    }

    /// Index of the silhouette frame currently shown
    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Above the ceiling or with the silhouette reaching past the ground line
    pub fn is_out_of_band(&self, silhouette_height: f32, ground_y: f32) -> bool {
        self.y + silhouette_height > ground_y || self.y < 0.0
    }
}
