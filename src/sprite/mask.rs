//! Per-pixel opacity masks for exact collision tests

use glam::IVec2;

use crate::error::MaskError;

/// Alpha values above this count as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// A rectangular grid of opaque/transparent pixels, row-major, origin top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create a fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Create a fully opaque rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    /// Filled ellipse inscribed in the `width` x `height` box
    pub fn ellipse(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        for y in 0..height {
            for x in 0..width {
                // Sample pixel centres
                let dx = (x as f32 + 0.5 - rx) / rx;
                let dy = (y as f32 + 0.5 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build from raw RGBA8 bytes, opaque where alpha exceeds [`ALPHA_THRESHOLD`]
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, MaskError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .unwrap_or(usize::MAX);
        if rgba.len() != expected {
            return Err(MaskError::BufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let bits = rgba
            .chunks_exact(4)
            .map(|pixel| pixel[3] > ALPHA_THRESHOLD)
            .collect();

        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Decode a PNG (or any format enabled on `image`) and take its alpha channel
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, MaskError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = (img.width(), img.height());
        Self::from_rgba(width, height, img.as_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    /// Opacity at `(x, y)`; out-of-range coordinates are transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Set opacity at `(x, y)`; ignored when out of range
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = opaque;
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the mask
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set(px, py, true);
            }
        }
    }

    /// OR `other` into this mask with its origin at `(x, y)`, clipped
    pub fn stamp(&mut self, other: &Mask, x: u32, y: u32) {
        for oy in 0..other.height {
            for ox in 0..other.width {
                if other.get(ox as i32, oy as i32) {
                    self.set(x + ox, y + oy, true);
                }
            }
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Mirror top to bottom
    pub fn flipped_vertical(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(x, self.height - 1 - y, self.get(x as i32, y as i32));
            }
        }
        out
    }

    /// Nearest-neighbour integer upscale
    pub fn scaled(&self, factor: u32) -> Self {
        let factor = factor.max(1);
        let mut out = Self::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get((x / factor) as i32, (y / factor) as i32));
            }
        }
        out
    }

    /// First pixel (in this mask's coordinates) that is opaque in both masks
    /// when `other`'s origin sits at `offset` relative to this mask's origin
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        // Intersection of the two rectangles in this mask's space
        let x_start = offset.x.max(0);
        let y_start = offset.y.max(0);
        let x_end = (offset.x + other.width as i32).min(self.width as i32);
        let y_end = (offset.y + other.height as i32).min(self.height as i32);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// True if any opaque pixels coincide at `offset`
    #[inline]
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap(other, offset).is_some()
    }
}
