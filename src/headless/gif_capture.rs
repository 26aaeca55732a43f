//! GIF capture of a running generation
//!
//! Acts as a presenter: every `interval` ticks the snapshot is rendered and
//! kept as a frame, up to `max_frames`.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use gif::{Encoder, Frame, Repeat};

use crate::simulation::{Presenter, Snapshot};
use crate::sprite::Silhouettes;

use super::PixelRenderer;

/// Captures frames and encodes them as GIF
pub struct GifCapture {
    renderer: PixelRenderer,
    silhouettes: Silhouettes,
    /// Collected frames (RGB data)
    pub frames: Vec<Vec<u8>>,
    /// Ticks between captured frames
    interval: u64,
    max_frames: usize,
    /// Delay between frames in centiseconds (100ths of a second)
    frame_delay: u16,
}

impl GifCapture {
    /// Create a capture sized to the screen
    ///
    /// # Arguments
    /// * `fps` - Target playback frames per second (converted to delay)
    pub fn new(
        width: u16,
        height: u16,
        silhouettes: Silhouettes,
        interval: u64,
        max_frames: usize,
        fps: u16,
    ) -> Self {
        let frame_delay = if fps > 0 { 100 / fps } else { 10 };

        Self {
            renderer: PixelRenderer::new(width as usize, height as usize),
            silhouettes,
            frames: Vec::new(),
            interval: interval.max(1),
            max_frames,
            frame_delay,
        }
    }

    /// Get the number of captured frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Renderer holding the most recently captured frame
    pub fn renderer(&self) -> &PixelRenderer {
        &self.renderer
    }

    /// Save captured frames as an animated GIF
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.frames.is_empty() {
            anyhow::bail!("No frames to save");
        }

        let width = self.renderer.width as u16;
        let height = self.renderer.height as u16;
        let file = File::create(path.as_ref()).context("Failed to create GIF file")?;

        let mut encoder =
            Encoder::new(file, width, height, &[]).context("Failed to create GIF encoder")?;

        encoder
            .set_repeat(Repeat::Infinite)
            .context("Failed to set GIF repeat")?;

        for frame_data in &self.frames {
            let mut frame = Frame::from_rgb(width, height, frame_data);
            frame.delay = self.frame_delay;

            encoder
                .write_frame(&frame)
                .context("Failed to write GIF frame")?;
        }

        log::info!(
            "Saved {} frames to {}",
            self.frames.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

impl Presenter for GifCapture {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        if self.frames.len() >= self.max_frames || snapshot.tick % self.interval != 0 {
            return;
        }
        self.renderer.render(snapshot, &self.silhouettes);
        self.frames.push(self.renderer.get_rgb_buffer());
    }
}
