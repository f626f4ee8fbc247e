//! Pluggable body compression.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::error::{StreamError, StreamResult};

/// A byte-to-byte compression capability.
///
/// Implementations must be deterministic: compressing the same input twice
/// yields identical output, because block lengths are computed by compressing
/// once and the bytes are emitted by compressing again.
pub trait Codec {
    /// Identifier recorded in the container header.
    fn id(&self) -> u8;

    /// Short human-readable name.
    fn name(&self) -> &'static str;

    fn compress(&self, input: &[u8]) -> StreamResult<Vec<u8>>;

    /// Inflates `input`, failing with [`StreamError::OutputLimit`] as soon as
    /// the output would exceed `max_len` bytes.
    fn decompress(&self, input: &[u8], max_len: usize) -> StreamResult<Vec<u8>>;
}

/// Raw deflate (RFC 1951) compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deflate {
    level: u32,
}

impl Deflate {
    /// Container identifier for deflate-compressed bodies.
    pub const ID: u8 = 1;

    /// Creates a codec at the given level, clamped to `0..=9`.
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    fn error(err: &std::io::Error) -> StreamError {
        StreamError::Codec {
            codec: "deflate",
            message: err.to_string(),
        }
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Codec for Deflate {
    fn id(&self) -> u8 {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, input: &[u8]) -> StreamResult<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::new(self.level));
        encoder.write_all(input).map_err(|e| Self::error(&e))?;
        encoder.finish().map_err(|e| Self::error(&e))
    }

    fn decompress(&self, input: &[u8], max_len: usize) -> StreamResult<Vec<u8>> {
        // One byte past the cap is enough to tell "fits" from "too big".
        let cap = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
        let mut out = Vec::new();
        DeflateDecoder::new(input)
            .take(cap)
            .read_to_end(&mut out)
            .map_err(|e| Self::error(&e))?;
        if out.len() > max_len {
            return Err(StreamError::OutputLimit { limit: max_len });
        }
        Ok(out)
    }
}
