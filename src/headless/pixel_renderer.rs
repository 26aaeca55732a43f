//! CPU-based pixel buffer renderer for headless frame capture
//!
//! Draws a snapshot with the same silhouettes the collision test uses, so a
//! captured frame shows exactly what the engine considers solid.

use std::path::Path;

use anyhow::{Context, Result};

use crate::simulation::Snapshot;
use crate::sprite::{Mask, Silhouettes};

const SKY: [u8; 4] = [135, 206, 235, 255];
const PIPE: [u8; 4] = [84, 170, 56, 255];
const GROUND: [u8; 4] = [222, 216, 149, 255];
const GROUND_STRIPE: [u8; 4] = [196, 180, 112, 255];
const AGENT: [u8; 4] = [250, 204, 42, 255];

/// Width of one ground stripe in pixels
const STRIPE: i32 = 24;

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the viewport in pixels
    pub width: usize,
    /// Height of the viewport in pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// Render one frame: sky, obstacles, ground strip, then agents on top
    pub fn render(&mut self, snapshot: &Snapshot<'_>, silhouettes: &Silhouettes) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&SKY);
        }

        for obstacle in &snapshot.obstacles {
            let x = obstacle.x.round() as i32;
            self.draw_mask(&silhouettes.obstacle_top, x, obstacle.top_origin(), PIPE);
            self.draw_mask(&silhouettes.obstacle_bottom, x, obstacle.bottom_origin(), PIPE);
        }

        let track = snapshot.track;
        let ground_y = track.y.round() as i32;
        for offset in track.offsets() {
            self.draw_ground_tile(offset.round() as i32, ground_y, track.tile_width() as i32);
        }

        for (_, body) in &snapshot.agents {
            let mask = silhouettes.agent_frame(body.frame());
            self.draw_mask(mask, body.x.round() as i32, body.y.round() as i32, AGENT);
        }
    }

    fn draw_ground_tile(&mut self, left: i32, top: i32, width: i32) {
        for y in top.max(0)..self.height as i32 {
            for x in left.max(0)..(left + width).min(self.width as i32) {
                // Diagonal stripes scroll with the tile
                let color = if (x - left + y - top).rem_euclid(STRIPE * 2) < STRIPE {
                    GROUND
                } else {
                    GROUND_STRIPE
                };
                self.put_pixel(x, y, color);
            }
        }
    }

    fn draw_mask(&mut self, mask: &Mask, left: i32, top: i32, color: [u8; 4]) {
        for my in 0..mask.height() as i32 {
            for mx in 0..mask.width() as i32 {
                if mask.get(mx, my) {
                    self.put_pixel(left + mx, top + my, color);
                }
            }
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as usize * self.width + x as usize) * 4;
            self.buffer[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// RGBA at a pixel, or `None` outside the viewport
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(color)
    }

    /// Get the pixel buffer as RGB (without alpha) for GIF encoding
    pub fn get_rgb_buffer(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for chunk in self.buffer.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
        }
        rgb
    }

    /// Write the current frame as a PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = image::RgbaImage::from_raw(
            self.width as u32,
            self.height as u32,
            self.buffer.clone(),
        )
        .context("Pixel buffer does not match viewport size")?;
        image
            .save(path.as_ref())
            .with_context(|| format!("Failed to write frame {}", path.as_ref().display()))?;
        Ok(())
    }
}
