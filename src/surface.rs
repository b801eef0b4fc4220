//! Off-scene drawing surface whose pixels become the editor texture.
//!
//! The surface owns an RGBA8 buffer and a dirty flag. The text engine paints
//! into it; the host render pipeline uploads it when [`Surface::take_dirty`]
//! reports a change.
//!
//! Each side is capped at [`MAX_SURFACE_PX`]; larger sizes are rejected with
//! a [`SizeError`] before anything is allocated.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::consts::{BYTES_PER_PIXEL, MAX_SURFACE_PX};

/// Requested dimensions the surface cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("surface size {width}x{height} exceeds {max} px per side", max = MAX_SURFACE_PX)]
pub struct SizeError {
    pub width: u32,
    pub height: u32,
}

/// Pixel buffer plus its dimensions and upload state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    dirty: bool,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocate a cleared surface. Starts dirty so the first frame uploads it.
    ///
    /// # Errors
    ///
    /// [`SizeError`] when either side exceeds [`MAX_SURFACE_PX`].
    pub fn new(width: u32, height: u32) -> Result<Self, SizeError> {
        let len = buffer_len(width, height)?;
        Ok(Self { width, height, dirty: true, pixels: vec![0; len] })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resize the buffer. Contents are cleared when the size actually changes.
    ///
    /// # Errors
    ///
    /// [`SizeError`] when either side exceeds [`MAX_SURFACE_PX`]; the surface
    /// is left untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SizeError> {
        if width != self.width || height != self.height {
            let len = buffer_len(width, height)?;
            self.width = width;
            self.height = height;
            self.pixels = vec![0; len];
        }
        self.dirty = true;
        Ok(())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and clear the dirty flag. Called by the host before uploading.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill every pixel with one RGBA color.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
        self.dirty = true;
    }

    /// Fill a clipped rectangle with one RGBA color.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, rgba: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y.min(self.height)..y_end {
            for col in x.min(self.width)..x_end {
                let offset = pixel_offset(self.width, col, row);
                self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
            }
        }
        self.dirty = true;
    }

    /// RGBA value at (`x`, `y`), or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = pixel_offset(self.width, x, y);
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(out)
    }

    /// Release the backing buffer.
    pub fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.pixels = Vec::new();
        self.dirty = false;
    }
}

fn buffer_len(width: u32, height: u32) -> Result<usize, SizeError> {
    if width > MAX_SURFACE_PX || height > MAX_SURFACE_PX {
        return Err(SizeError { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
        .ok_or(SizeError { width, height })
}

fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL
}
