// src/input.rs

//! Input accumulation.
//!
//! The whole input stream is read into memory before anything is drawn so
//! the canvas can be sized from the longest line and the line count.

use crate::config::InputConfig;
use crate::error::{RenderError, Result};
use log::{debug, trace};
use std::io::{ErrorKind, Read};

/// The fully read input plus the sizing hints gathered while reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: Vec<u8>,
    max_line_length: usize,
    line_count: usize,
}

impl TextBuffer {
    /// Reads `reader` to end-of-stream.
    pub fn read_from<R: Read>(reader: R, config: &InputConfig) -> Result<Self> {
        let mut accumulator = Accumulator::with_capacity(config.initial_capacity)?;
        accumulator.consume(reader, config.read_chunk.max(1))?;
        Ok(accumulator.finish())
    }

    /// Builds a buffer from bytes already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut tracker = LineTracker::default();
        tracker.scan(bytes);
        let (max_line_length, line_count) = tracker.finish();
        Self {
            bytes: bytes.to_vec(),
            max_line_length,
            line_count,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the longest line, excluding the newline.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Number of newlines plus one for the final line.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Running column and line statistics.
#[derive(Debug, Clone, Copy)]
struct LineTracker {
    current: usize,
    max: usize,
    lines: usize,
}

impl Default for LineTracker {
    fn default() -> Self {
        // The line after the last newline always counts, even if empty.
        Self {
            current: 0,
            max: 0,
            lines: 1,
        }
    }
}

impl LineTracker {
    fn scan(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.max = self.max.max(self.current);
                self.current = 0;
                self.lines += 1;
            } else {
                self.current += 1;
            }
        }
    }

    fn finish(self) -> (usize, usize) {
        (self.max.max(self.current), self.lines)
    }
}

/// Growable byte store with explicit capacity doubling.
struct Accumulator {
    bytes: Vec<u8>,
    capacity: usize,
    tracker: LineTracker,
}

impl Accumulator {
    fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| RenderError::Allocation {
                what: "input buffer",
                requested: capacity,
            })?;
        Ok(Self {
            bytes,
            capacity,
            tracker: LineTracker::default(),
        })
    }

    fn consume<R: Read>(&mut self, mut reader: R, chunk_len: usize) -> Result<()> {
        let mut chunk = vec![0u8; chunk_len];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(RenderError::Input(e)),
            };
            self.append(&chunk[..n])?;
        }
        debug!(
            "Read {} input bytes ({} byte buffer)",
            self.bytes.len(),
            self.capacity
        );
        Ok(())
    }

    fn append(&mut self, data: &[u8]) -> Result<()> {
        let needed = self.bytes.len() + data.len();
        if needed > self.capacity {
            let mut new_capacity = self.capacity;
            while new_capacity < needed {
                new_capacity = new_capacity.checked_mul(2).ok_or(RenderError::Allocation {
                    what: "input buffer",
                    requested: usize::MAX,
                })?;
            }
            self.bytes
                .try_reserve_exact(new_capacity - self.bytes.len())
                .map_err(|_| RenderError::Allocation {
                    what: "input buffer",
                    requested: new_capacity,
                })?;
            trace!("Input buffer grown {} -> {}", self.capacity, new_capacity);
            self.capacity = new_capacity;
        }
        self.tracker.scan(data);
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn finish(self) -> TextBuffer {
        let (max_line_length, line_count) = self.tracker.finish();
        TextBuffer {
            bytes: self.bytes,
            max_line_length,
            line_count,
        }
    }
}
