// src/writer.rs

//! Canvas serialization.
//!
//! Two formats are supported: binary PGM (`P5`), written verbatim, and
//! single-channel JPEG through the `image` crate's encoder.

use crate::canvas::Canvas;
use crate::config::OutputConfig;
use crate::error::{RenderError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Largest width or height a JPEG frame header can carry.
pub const JPEG_MAX_DIMENSION: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Uncompressed binary portable graymap.
    Pgm,
    /// Grayscale JPEG.
    Jpeg,
}

impl OutputFormat {
    /// Picks a format from the file extension. Anything that is not
    /// `.jpg` or `.jpeg` (case-insensitive) is PGM.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            _ => OutputFormat::Pgm,
        }
    }

    /// Encodes `canvas` into `out`.
    pub fn encode<W: Write>(self, canvas: &Canvas, out: W, config: &OutputConfig) -> Result<()> {
        match self {
            OutputFormat::Pgm => write_pgm(canvas, out),
            OutputFormat::Jpeg => write_jpeg(canvas, out, config.jpeg_quality),
        }
    }
}

/// Creates `path` and writes `canvas` to it.
///
/// A failure after the file is created leaves the partial file in place.
pub fn save(
    canvas: &Canvas,
    path: &Path,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    if format == OutputFormat::Jpeg {
        check_jpeg_dimensions(canvas)?;
    }
    let file = File::create(path).map_err(|source| RenderError::OutputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    format.encode(canvas, &mut out, config)?;
    out.flush().map_err(RenderError::OutputWrite)?;
    info!("{:?} image saved to {}", format, path.display());
    Ok(())
}

/// Writes `P5\n<w> <h>\n255\n` followed by the raw samples.
pub fn write_pgm<W: Write>(canvas: &Canvas, mut out: W) -> Result<()> {
    write!(out, "P5\n{} {}\n255\n", canvas.width(), canvas.height())
        .map_err(RenderError::OutputWrite)?;
    out.write_all(canvas.pixels())
        .map_err(RenderError::OutputWrite)?;
    debug!("Wrote {} PGM samples", canvas.pixels().len());
    Ok(())
}

/// Encodes the canvas as a one-component JPEG, rows top to bottom.
pub fn write_jpeg<W: Write>(canvas: &Canvas, mut out: W, quality: u8) -> Result<()> {
    let (width, height) = check_jpeg_dimensions(canvas)?;
    let quality = quality.clamp(1, 100);
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode(canvas.pixels(), width, height, ExtendedColorType::L8)?;
    debug!("Encoded {}x{} JPEG at quality {}", width, height, quality);
    Ok(())
}

fn check_jpeg_dimensions(canvas: &Canvas) -> Result<(u32, u32)> {
    let too_large = || RenderError::DimensionsTooLarge {
        width: canvas.width(),
        height: canvas.height(),
        limit: JPEG_MAX_DIMENSION,
    };
    if canvas.width() > JPEG_MAX_DIMENSION || canvas.height() > JPEG_MAX_DIMENSION {
        return Err(too_large());
    }
    let width = u32::try_from(canvas.width()).map_err(|_| too_large())?;
    let height = u32::try_from(canvas.height()).map_err(|_| too_large())?;
    Ok((width, height))
}
