// src/config.rs

//! Configuration structures for `psf-render`.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a
//! config file only needs to mention the settings it overrides. The file is
//! JSON and is located through the `PSF_RENDER_CONFIG` environment variable.

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "PSF_RENDER_CONFIG";

/// Process-wide configuration, loaded on first access.
///
/// Library functions take `&Config` explicitly; only `main` reads this.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

/// Root of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canvas sizing and colors.
    pub canvas: CanvasConfig,
    /// Input accumulation tuning.
    pub input: InputConfig,
    /// Glyph rendering behavior.
    pub render: RenderConfig,
    /// Output encoder settings.
    pub output: OutputConfig,
}

// --- Canvas Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest canvas width in pixels, regardless of input.
    pub min_width: usize,
    /// Smallest canvas height in pixels, regardless of input.
    pub min_height: usize,
    /// Extra glyph columns reserved past the longest line.
    pub margin_columns: usize,
    /// Sample value for unset pixels.
    pub background: u8,
    /// Sample value for set glyph bits.
    pub foreground: u8,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            min_width: 800,
            min_height: 600,
            margin_columns: 1,
            background: 255,
            foreground: 0,
        }
    }
}

// --- Input Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Starting capacity of the text buffer in bytes. Doubled on overflow.
    pub initial_capacity: usize,
    /// Size of each read from the input stream.
    pub read_chunk: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            initial_capacity: 1024,
            read_chunk: 8192,
        }
    }
}

// --- Render Configuration ---

/// What to do with input bytes at or above 0x80.
///
/// PSF fonts without a Unicode table have no defined meaning for the upper
/// half of the glyph table beyond "whatever the font author put there".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HighBytePolicy {
    /// Index the glyph table directly, one byte to one glyph.
    #[default]
    Glyph,
    /// Advance the pen by one cell without drawing anything.
    Blank,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct RenderConfig {
    pub high_bytes: HighBytePolicy,
}

// --- Output Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { jpeg_quality: 90 }
    }
}

impl Config {
    /// Parses a JSON config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads the file named by `PSF_RENDER_CONFIG`, or defaults.
    ///
    /// A broken config file is not fatal: it is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Config::default();
        };
        let path = Path::new(&path);
        match Config::from_file(path) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_log::test;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.canvas.min_width, 800);
        assert_eq!(config.canvas.min_height, 600);
        assert_eq!(config.canvas.margin_columns, 1);
        assert_eq!(config.input.initial_capacity, 1024);
        assert_eq!(config.output.jpeg_quality, 90);
        assert_eq!(config.render.high_bytes, HighBytePolicy::Glyph);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "canvas": {{ "min_width": 64 }}, "render": {{ "high_bytes": "blank" }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.canvas.min_width, 64);
        assert_eq!(config.canvas.min_height, 600);
        assert_eq!(config.render.high_bytes, HighBytePolicy::Blank);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }
}
