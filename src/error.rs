// src/error.rs

//! Error taxonomy for the conversion pipeline.
//!
//! Every stage returns `Result<_, RenderError>`. Nothing in the library
//! terminates the process; `main` is the single place that turns an error
//! into a diagnostic and an exit status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Error opening font {path}: {source}")]
    FontOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error reading font header: {0}")]
    FontHeader(#[source] io::Error),
    #[error("Error reading font data: expected {expected} glyph bytes")]
    FontTruncated {
        expected: usize,
        #[source]
        source: io::Error,
    },
    #[error("Error reading input: {0}")]
    Input(#[source] io::Error),
    #[error("Memory allocation failed while reserving {requested} bytes for {what}")]
    Allocation { what: &'static str, requested: usize },
    #[error("Error opening output file {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error writing output: {0}")]
    OutputWrite(#[source] io::Error),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Canvas {width}x{height} exceeds the {limit} pixel limit of the output format")]
    DimensionsTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
