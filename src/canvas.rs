// src/canvas.rs

//! Row-major 8-bit grayscale pixel grid.
//!
//! Width is fixed at creation. Height only grows, by doubling, and growth
//! keeps every existing row byte-for-byte.

use crate::error::{RenderError, Result};
use log::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    background: u8,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Allocates a `width` x `height` canvas filled with `background`.
    pub fn new(width: usize, height: usize, background: u8) -> Result<Self> {
        let len = area(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation {
                what: "canvas",
                requested: len,
            })?;
        pixels.resize(len, background);
        Ok(Self {
            width,
            height,
            background,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> u8 {
        self.background
    }

    /// All samples, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes one sample. Returns `false` if `(x, y)` is off the canvas.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = value;
                true
            }
            None => false,
        }
    }

    /// Doubles the height, filling the new rows with the background.
    ///
    /// The replacement buffer is built in full before the old one is
    /// released, so a failed allocation leaves the canvas untouched.
    pub fn grow(&mut self) -> Result<()> {
        let new_height = self.height.max(1).checked_mul(2).ok_or(RenderError::Allocation {
            what: "canvas",
            requested: usize::MAX,
        })?;
        info!("Expanding image height to {} pixels", new_height);

        let new_len = area(self.width, new_height)?;
        let mut grown = Vec::new();
        grown
            .try_reserve_exact(new_len)
            .map_err(|_| RenderError::Allocation {
                what: "canvas",
                requested: new_len,
            })?;
        grown.extend_from_slice(&self.pixels);
        grown.resize(new_len, self.background);

        self.pixels = grown;
        self.height = new_height;
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

fn area(width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or(RenderError::Allocation {
        what: "canvas",
        requested: usize::MAX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn new_canvas_is_background() {
        let canvas = Canvas::new(8, 4, 255).unwrap();
        assert_eq!(canvas.pixels().len(), 32);
        assert!(canvas.pixels().iter().all(|&p| p == 255));
    }

    #[test]
    fn grow_preserves_rows_and_whitens_new_ones() {
        let mut canvas = Canvas::new(3, 2, 255).unwrap();
        canvas.set(0, 0, 0);
        canvas.set(2, 1, 0);
        let before = canvas.pixels().to_vec();

        canvas.grow().unwrap();

        assert_eq!(canvas.height(), 4);
        assert_eq!(&canvas.pixels()[..before.len()], &before[..]);
        assert!(canvas.pixels()[before.len()..].iter().all(|&p| p == 255));
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut canvas = Canvas::new(2, 2, 255).unwrap();
        assert!(!canvas.set(2, 0, 0));
        assert!(!canvas.set(0, 2, 0));
        assert_eq!(canvas.get(2, 0), None);
        assert_eq!(canvas.get(1, 1), Some(255));
    }

    #[test]
    fn rows_are_width_long() {
        let canvas = Canvas::new(5, 3, 255).unwrap();
        assert_eq!(canvas.rows().count(), 3);
        assert!(canvas.rows().all(|row| row.len() == 5));
    }

    #[test]
    fn overflowing_dimensions_fail_cleanly() {
        let err = Canvas::new(usize::MAX, 2, 255).unwrap_err();
        assert!(matches!(err, RenderError::Allocation { what: "canvas", .. }));
    }
}
