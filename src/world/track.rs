//! Looping ground strip scrolled at obstacle speed

use serde::{Deserialize, Serialize};

/// Two ground tiles leapfrogging each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTrack {
    pub y: f32,
    tile_width: f32,
    offsets: [f32; 2],
}

impl ScrollTrack {
    pub fn new(y: f32, tile_width: f32) -> Self {
        Self {
            y,
            tile_width,
            offsets: [0.0, tile_width],
        }
    }

    pub fn advance(&mut self, velocity: f32) {
        self.offsets[0] -= velocity;
        self.offsets[1] -= velocity;

        // A tile fully off the left edge jumps behind the other one
        if self.offsets[0] + self.tile_width < 0.0 {
            self.offsets[0] = self.offsets[1] + self.tile_width;
        }
        if self.offsets[1] + self.tile_width < 0.0 {
            self.offsets[1] = self.offsets[0] + self.tile_width;
        }
    }

    /// Left edges of both tiles
    #[inline]
    pub fn offsets(&self) -> [f32; 2] {
        self.offsets
    }

    #[inline]
    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }
}
