// src/main.rs

//! `psf-render <font> <output>`: render standard input with a PSF font.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use log::info;
use psf_render::config::CONFIG;
use psf_render::writer::OutputFormat;
use std::io;
use std::path::PathBuf;

/// Render piped text to a grayscale image using an 8x16 PSF font.
#[derive(Parser, Debug)]
#[command(name = "psf-render", version, about)]
struct Args {
    /// Path to the PSF font file
    font: PathBuf,

    /// Output image path
    output: PathBuf,

    /// Output format. Inferred from the output extension when omitted
    /// (.jpg/.jpeg for JPEG, anything else for PGM).
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors share exit status 1 with every other failure.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&args.output));
    info!(
        "Rendering stdin with font {} into {} ({:?})",
        args.font.display(),
        args.output.display(),
        format
    );

    let stats = psf_render::convert(
        &args.font,
        io::stdin().lock(),
        &args.output,
        format,
        &CONFIG,
    )
    .with_context(|| format!("Failed to render {}", args.output.display()))?;

    info!(
        "Done: {} glyphs, {} soft wraps, {} canvas expansions",
        stats.glyphs_drawn, stats.soft_wraps, stats.growth_events
    );
    Ok(())
}
