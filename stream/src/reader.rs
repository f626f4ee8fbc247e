//! Bounded little-endian byte reader.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{StreamError, StreamResult};
use crate::writer::FloatWidth;

/// A byte reader for decoding little-endian binary data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> StreamResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(StreamError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> StreamResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> StreamResult<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> StreamResult<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i8(&mut self) -> StreamResult<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    pub fn read_i16(&mut self) -> StreamResult<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_i32(&mut self) -> StreamResult<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> StreamResult<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> StreamResult<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Reads a float encoded at `width`, widened to `f64`.
    pub fn read_float(&mut self, width: FloatWidth) -> StreamResult<f64> {
        match width {
            FloatWidth::Single => self.read_f32().map(f64::from),
            FloatWidth::Double => self.read_f64(),
        }
    }

    /// Reads a `u16` byte-length prefixed UTF-8 string.
    pub fn read_str16(&mut self) -> StreamResult<&'a str> {
        let len = usize::from(self.read_u16()?);
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|err| StreamError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        })
    }
}
