// src/rasterizer.rs

//! Text-to-pixel rasterization.
//!
//! A pen walks the input byte by byte:
//!
//! ```text
//! '\n'   -> x = 0, y += GLYPH_HEIGHT
//! '\r'   -> x = 0
//! other  -> soft-wrap if the cell would pass the right edge,
//!           grow the canvas if it would pass the bottom edge,
//!           draw the glyph, x += GLYPH_WIDTH
//! ```
//!
//! Glyph cells are drawn by direct overwrite: every pixel of the 8x16 cell
//! becomes either the foreground or the background sample.

use crate::canvas::Canvas;
use crate::config::{CanvasConfig, Config, HighBytePolicy};
use crate::error::Result;
use crate::font::{GlyphTable, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::input::TextBuffer;
use log::{debug, info, trace};

/// Counters collected while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub glyphs_drawn: usize,
    pub soft_wraps: usize,
    pub growth_events: usize,
}

/// Canvas size implied by the input, before any growth.
///
/// One extra glyph column (by default) is reserved past the longest line.
pub fn initial_dimensions(text: &TextBuffer, config: &CanvasConfig) -> (usize, usize) {
    let width = text
        .max_line_length()
        .saturating_add(config.margin_columns)
        .saturating_mul(GLYPH_WIDTH);
    let height = text.line_count().saturating_mul(GLYPH_HEIGHT);
    (width.max(config.min_width), height.max(config.min_height))
}

/// Renders `text` onto a freshly sized canvas.
pub fn render(
    text: &TextBuffer,
    glyphs: &GlyphTable,
    config: &Config,
) -> Result<(Canvas, RenderStats)> {
    let (width, height) = initial_dimensions(text, &config.canvas);
    info!(
        "Creating image with dimensions: {} x {} pixels",
        width, height
    );
    let mut rasterizer = Rasterizer::new(glyphs, config, width, height)?;
    rasterizer.feed(text.bytes())?;
    Ok(rasterizer.finish())
}

/// Pen state over a growing canvas.
pub struct Rasterizer<'a> {
    glyphs: &'a GlyphTable,
    high_bytes: HighBytePolicy,
    foreground: u8,
    canvas: Canvas,
    x: usize,
    y: usize,
    stats: RenderStats,
}

impl<'a> Rasterizer<'a> {
    pub fn new(
        glyphs: &'a GlyphTable,
        config: &Config,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        Ok(Self {
            glyphs,
            high_bytes: config.render.high_bytes,
            foreground: config.canvas.foreground,
            canvas: Canvas::new(width, height, config.canvas.background)?,
            x: 0,
            y: 0,
            stats: RenderStats::default(),
        })
    }

    /// Current pen position in pixels.
    pub fn pen(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.feed_byte(byte)?;
        }
        Ok(())
    }

    pub fn feed_byte(&mut self, byte: u8) -> Result<()> {
        match byte {
            b'\n' => {
                self.x = 0;
                self.y += GLYPH_HEIGHT;
            }
            b'\r' => self.x = 0,
            _ => {
                if self.x + GLYPH_WIDTH > self.canvas.width() {
                    trace!("Soft wrap at y={}", self.y);
                    self.x = 0;
                    self.y += GLYPH_HEIGHT;
                    self.stats.soft_wraps += 1;
                }
                // A run of newlines can leave the pen more than one
                // doubling below the bottom edge.
                while self.y + GLYPH_HEIGHT > self.canvas.height() {
                    self.canvas.grow()?;
                    self.stats.growth_events += 1;
                }
                if byte >= 0x80 && self.high_bytes == HighBytePolicy::Blank {
                    trace!("Leaving cell blank for byte {:#04x}", byte);
                } else {
                    self.draw_glyph(byte);
                }
                self.x += GLYPH_WIDTH;
            }
        }
        Ok(())
    }

    fn draw_glyph(&mut self, byte: u8) {
        let glyph = self.glyphs.glyph(byte);
        let background = self.canvas.background();
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                let value = if glyph.is_set(row, col) {
                    self.foreground
                } else {
                    background
                };
                // Clipped only when the canvas is narrower than one cell.
                self.canvas.set(self.x + col, self.y + row, value);
            }
        }
        self.stats.glyphs_drawn += 1;
    }

    pub fn finish(self) -> (Canvas, RenderStats) {
        debug!("Render finished: {:?}", self.stats);
        (self.canvas, self.stats)
    }
}
