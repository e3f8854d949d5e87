// src/font.rs

//! PC Screen Font loading.
//!
//! Only the subset of PSF that this tool renders with is understood: a
//! 4-byte header whose last byte carries the "Unicode table follows" flag,
//! an optional 512-byte table that is skipped, and 256 glyphs of 8x16
//! pixels, one byte per row with bit 7 as the leftmost pixel.
//!
//! Glyphs are addressed by raw byte value. The Unicode table is never
//! consulted.

use crate::error::{RenderError, Result};
use bitflags::bitflags;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Width of every glyph in pixels.
pub const GLYPH_WIDTH: usize = 8;
/// Height of every glyph in pixels (one byte per row).
pub const GLYPH_HEIGHT: usize = 16;
/// Number of glyphs in the table, one per byte value.
pub const GLYPH_COUNT: usize = 256;

/// Size of the fixed header preceding glyph data.
pub const HEADER_LEN: usize = 4;
/// Size of the Unicode block skipped when the header flag is set.
pub const UNICODE_TABLE_LEN: usize = 512;

const PSF1_MAGIC: [u8; 2] = [0x36, 0x04];

bitflags! {
    /// Flag bits from header byte 3.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeaderFlags: u8 {
        const UNICODE_TABLE = 1 << 0;
    }
}

/// The raw 4-byte font header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsfHeader {
    bytes: [u8; HEADER_LEN],
}

impl PsfHeader {
    pub fn new(bytes: [u8; HEADER_LEN]) -> Self {
        Self { bytes }
    }

    pub fn flags(&self) -> HeaderFlags {
        HeaderFlags::from_bits_truncate(self.bytes[3])
    }

    pub fn has_unicode_table(&self) -> bool {
        self.flags().contains(HeaderFlags::UNICODE_TABLE)
    }

    fn has_psf1_magic(&self) -> bool {
        self.bytes[..2] == PSF1_MAGIC
    }
}

/// One 8x16 bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    pub const BLANK: Glyph = Glyph {
        rows: [0; GLYPH_HEIGHT],
    };
    pub const SOLID: Glyph = Glyph {
        rows: [0xFF; GLYPH_HEIGHT],
    };

    pub const fn from_rows(rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u8; GLYPH_HEIGHT] {
        &self.rows
    }

    /// Whether the pixel at `(row, col)` is ink. Column 0 is bit 7.
    #[inline]
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.rows[row] & (0x80 >> col) != 0
    }
}

/// Immutable byte-indexed glyph table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: Box<[Glyph; GLYPH_COUNT]>,
}

impl GlyphTable {
    /// Opens and parses a font file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| RenderError::FontOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!("Font loaded successfully from {}", path.display());
        Ok(table)
    }

    /// Parses a font from any byte stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(RenderError::FontHeader)?;
        let header = PsfHeader::new(header);

        if !header.has_psf1_magic() {
            warn!(
                "Font header magic {:02x} {:02x} is not PSF1; reading glyphs anyway",
                header.bytes[0], header.bytes[1]
            );
        }

        if header.has_unicode_table() {
            // A short skip is not an error here; the glyph read below
            // reports the truncation.
            let skipped = io::copy(
                &mut reader.by_ref().take(UNICODE_TABLE_LEN as u64),
                &mut io::sink(),
            )
            .map_err(RenderError::FontHeader)?;
            debug!("Skipped {} byte Unicode table", skipped);
        }

        let expected = GLYPH_COUNT * GLYPH_HEIGHT;
        let mut data = vec![0u8; expected];
        reader
            .read_exact(&mut data)
            .map_err(|source| RenderError::FontTruncated { expected, source })?;

        Ok(Self::from_bitmap(&data))
    }

    /// Builds a table from `GLYPH_COUNT * GLYPH_HEIGHT` bytes of glyph rows.
    /// Missing trailing glyphs stay blank.
    pub fn from_bitmap(data: &[u8]) -> Self {
        let mut glyphs = Box::new([Glyph::BLANK; GLYPH_COUNT]);
        for (glyph, rows) in glyphs.iter_mut().zip(data.chunks_exact(GLYPH_HEIGHT)) {
            glyph.rows.copy_from_slice(rows);
        }
        Self { glyphs }
    }

    /// Builds a table by asking `f` for every byte value.
    pub fn from_fn(mut f: impl FnMut(u8) -> Glyph) -> Self {
        let mut glyphs = Box::new([Glyph::BLANK; GLYPH_COUNT]);
        for (index, glyph) in glyphs.iter_mut().enumerate() {
            *glyph = f(index as u8);
        }
        Self { glyphs }
    }

    #[inline]
    pub fn glyph(&self, byte: u8) -> &Glyph {
        &self.glyphs[byte as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    /// Glyph data where glyph `n` has every row equal to `n`.
    fn indexed_glyph_data() -> Vec<u8> {
        (0..GLYPH_COUNT)
            .flat_map(|n| std::iter::repeat(n as u8).take(GLYPH_HEIGHT))
            .collect()
    }

    fn font_bytes(flags: u8, table_fill: Option<u8>) -> Vec<u8> {
        let mut bytes = vec![0x36, 0x04, 0x00, flags];
        if let Some(fill) = table_fill {
            bytes.extend(std::iter::repeat(fill).take(UNICODE_TABLE_LEN));
        }
        bytes.extend(indexed_glyph_data());
        bytes
    }

    #[test]
    fn glyphs_start_after_header_without_unicode_flag() {
        let table = GlyphTable::from_reader(&font_bytes(0x00, None)[..]).unwrap();
        assert_eq!(table.glyph(0).rows(), &[0u8; GLYPH_HEIGHT]);
        assert_eq!(table.glyph(b'A').rows(), &[b'A'; GLYPH_HEIGHT]);
        assert_eq!(table.glyph(255).rows(), &[255u8; GLYPH_HEIGHT]);
    }

    #[test]
    fn unicode_table_is_skipped_and_ignored() {
        let zeros = GlyphTable::from_reader(&font_bytes(0x01, Some(0x00))[..]).unwrap();
        let ones = GlyphTable::from_reader(&font_bytes(0x01, Some(0xFF))[..]).unwrap();
        let plain = GlyphTable::from_reader(&font_bytes(0x00, None)[..]).unwrap();
        assert_eq!(zeros, plain);
        assert_eq!(ones, plain);
    }

    #[test]
    fn only_bit_zero_of_byte_three_selects_the_table() {
        // Bit 1 alone must not trigger the skip.
        let table = GlyphTable::from_reader(&font_bytes(0x02, None)[..]).unwrap();
        assert_eq!(table.glyph(7).rows(), &[7u8; GLYPH_HEIGHT]);
    }

    #[test]
    fn short_header_is_reported() {
        let err = GlyphTable::from_reader(&[0x36, 0x04][..]).unwrap_err();
        assert!(matches!(err, RenderError::FontHeader(_)));
    }

    #[test]
    fn truncated_glyph_data_is_reported() {
        let mut bytes = font_bytes(0x00, None);
        bytes.truncate(HEADER_LEN + 100);
        let err = GlyphTable::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FontTruncated { expected: 4096, .. }
        ));
    }

    #[test]
    fn truncated_unicode_table_is_reported_as_truncation() {
        let bytes = vec![0x36, 0x04, 0x00, 0x01, 0, 0, 0];
        let err = GlyphTable::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(err, RenderError::FontTruncated { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = GlyphTable::load(Path::new("/nonexistent/font.psf")).unwrap_err();
        assert!(matches!(err, RenderError::FontOpen { .. }));
    }

    #[test]
    fn bit_seven_is_leftmost() {
        let glyph = Glyph::from_rows([0b1000_0001; GLYPH_HEIGHT]);
        assert!(glyph.is_set(0, 0));
        assert!(!glyph.is_set(0, 1));
        assert!(glyph.is_set(15, 7));
    }
}
