//! Byte sinks for encoding little-endian binary data.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{StreamError, StreamResult};

/// Encoded width of floating point fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloatWidth {
    /// 32-bit IEEE 754.
    #[default]
    Single,
    /// 64-bit IEEE 754.
    Double,
}

impl FloatWidth {
    /// Selects the width for a wide (`true`) or narrow (`false`) run.
    #[must_use]
    pub const fn from_wide(wide: bool) -> Self {
        if wide {
            Self::Double
        } else {
            Self::Single
        }
    }

    /// Returns the encoded size of one value in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }
}

/// An append-only destination for encoded bytes.
///
/// Every typed write is expressed in terms of [`write_bytes`](Self::write_bytes),
/// so a sink that only counts bytes observes exactly the same lengths as a sink
/// that stores them.
pub trait ByteSink {
    /// Appends raw bytes.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Returns the number of bytes written so far.
    fn bytes_written(&self) -> usize;

    fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    fn write_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.write_bytes(&buf);
    }

    fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.write_bytes(&buf);
    }

    fn write_i8(&mut self, value: i8) {
        self.write_bytes(&value.to_le_bytes());
    }

    fn write_i16(&mut self, value: i16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_i16(&mut buf, value);
        self.write_bytes(&buf);
    }

    fn write_i32(&mut self, value: i32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, value);
        self.write_bytes(&buf);
    }

    fn write_f32(&mut self, value: f32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.write_bytes(&buf);
    }

    fn write_f64(&mut self, value: f64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, value);
        self.write_bytes(&buf);
    }

    /// Writes a float at the given width. Narrow writes round to `f32`.
    #[allow(clippy::cast_possible_truncation)]
    fn write_float(&mut self, value: f64, width: FloatWidth) {
        match width {
            FloatWidth::Single => self.write_f32(value as f32),
            FloatWidth::Double => self.write_f64(value),
        }
    }

    /// Writes a `u16` byte-length prefix followed by the UTF-8 bytes of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::LengthOverflow`] if the string is longer than
    /// `u16::MAX` bytes. Nothing is written in that case.
    fn write_str16(&mut self, value: &str) -> StreamResult<()> {
        let len = u16::try_from(value.len()).map_err(|_| StreamError::LengthOverflow {
            length: value.len(),
            prefix_bits: 16,
        })?;
        self.write_u16(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }
}

/// A growable in-memory byte sink.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteSink for ByteWriter {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn bytes_written(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    fn bytes_written(&self) -> usize {
        self.len()
    }
}

/// A sink that discards bytes and only counts them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LengthCounter {
    len: usize,
}

impl LengthCounter {
    /// Creates a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the counted length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been counted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the counted length as a `u32` length field.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::LengthOverflow`] if the length exceeds `u32::MAX`.
    pub fn len_u32(&self) -> StreamResult<u32> {
        u32::try_from(self.len).map_err(|_| StreamError::LengthOverflow {
            length: self.len,
            prefix_bits: 32,
        })
    }
}

impl ByteSink for LengthCounter {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.len = self.len.saturating_add(bytes.len());
    }

    fn bytes_written(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert_eq!(writer.bytes_written(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn integers_are_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);
        writer.write_u16(0x1234);
        writer.write_u32(0xDEAD_BEEF);
        assert_eq!(
            writer.finish(),
            vec![0xAB, 0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]
        );
    }

    #[test]
    fn signed_integers() {
        let mut writer = ByteWriter::new();
        writer.write_i8(-1);
        writer.write_i16(-2);
        writer.write_i32(-3);
        assert_eq!(
            writer.finish(),
            vec![0xFF, 0xFE, 0xFF, 0xFD, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn float_width_controls_size() {
        let mut narrow = ByteWriter::new();
        narrow.write_float(1.5, FloatWidth::Single);
        assert_eq!(narrow.finish(), 1.5f32.to_le_bytes().to_vec());

        let mut wide = ByteWriter::new();
        wide.write_float(1.5, FloatWidth::Double);
        assert_eq!(wide.finish(), 1.5f64.to_le_bytes().to_vec());
    }

    #[test]
    fn float_width_from_wide() {
        assert_eq!(FloatWidth::from_wide(true), FloatWidth::Double);
        assert_eq!(FloatWidth::from_wide(false), FloatWidth::Single);
        assert_eq!(FloatWidth::Double.bytes(), 8);
        assert_eq!(FloatWidth::Single.bytes(), 4);
    }

    #[test]
    fn str16_prefix_counts_bytes_not_chars() {
        let mut writer = ByteWriter::new();
        writer.write_str16("né").unwrap();
        let bytes = writer.finish();
        assert_eq!(&bytes[..2], &[3, 0]);
        assert_eq!(&bytes[2..], "né".as_bytes());
    }

    #[test]
    fn str16_too_long_writes_nothing() {
        let long = "x".repeat(usize::from(u16::MAX) + 1);
        let mut writer = ByteWriter::new();
        let err = writer.write_str16(&long).unwrap_err();
        assert!(matches!(
            err,
            StreamError::LengthOverflow {
                prefix_bits: 16,
                ..
            }
        ));
        assert_eq!(writer.bytes_written(), 0);
    }

    #[test]
    fn counter_matches_writer() {
        fn emit(sink: &mut dyn ByteSink) {
            sink.write_u8(1);
            sink.write_u16(2);
            sink.write_float(3.0, FloatWidth::Double);
            sink.write_str16("abc").unwrap();
        }

        let mut writer = ByteWriter::new();
        let mut counter = LengthCounter::new();
        emit(&mut writer);
        emit(&mut counter);
        assert_eq!(counter.len(), writer.bytes_written());
        assert_eq!(counter.len_u32().unwrap(), 1 + 2 + 8 + 5);
    }

    #[test]
    fn vec_is_a_sink() {
        let mut buf = vec![0x00, 0x11];
        buf.write_u16(0xAABB);
        assert_eq!(buf, vec![0x00, 0x11, 0xBB, 0xAA]);
        assert_eq!(ByteSink::bytes_written(&buf), 4);
    }
}
