//! psf-render library crate.
//!
//! Converts a byte stream into a grayscale raster using a PSF bitmap font.
//! The binary in `main.rs` is a thin CLI over [`convert`].

pub mod canvas;
pub mod config;
pub mod error;
pub mod font;
pub mod input;
pub mod rasterizer;
pub mod writer;

use crate::config::Config;
use crate::error::Result;
use crate::font::GlyphTable;
use crate::input::TextBuffer;
use crate::rasterizer::RenderStats;
use crate::writer::OutputFormat;
use log::info;
use std::io::Read;
use std::path::Path;

/// Runs the whole pipeline: load font, read input, rasterize, save.
///
/// The output file is only created once rendering has succeeded.
pub fn convert<R: Read>(
    font_path: &Path,
    input: R,
    output_path: &Path,
    format: OutputFormat,
    config: &Config,
) -> Result<RenderStats> {
    let glyphs = GlyphTable::load(font_path)?;
    let text = TextBuffer::read_from(input, &config.input)?;
    info!(
        "Read {} bytes: {} lines, longest {} columns",
        text.len(),
        text.line_count(),
        text.max_line_length()
    );

    let (canvas, stats) = rasterizer::render(&text, &glyphs, config)?;
    drop(text);

    writer::save(&canvas, output_path, format, &config.output)?;
    Ok(stats)
}
