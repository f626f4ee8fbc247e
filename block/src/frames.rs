//! Append-only frame chains for time-varying blocks.

use stream::{ByteReader, ByteSink, FloatWidth};

use crate::error::BlockResult;

/// Values in one transform record.
pub const TRANSFORM_LEN: usize = 16;

/// A row-major 4×4 transform.
pub type Transform = [f64; TRANSFORM_LEN];

/// The identity transform.
pub const IDENTITY: Transform = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Writes one transform at `width`.
pub fn encode_transform(sink: &mut dyn ByteSink, transform: &Transform, width: FloatWidth) {
    for value in transform {
        sink.write_float(*value, width);
    }
}

/// Reads one transform at `width`.
pub fn decode_transform(reader: &mut ByteReader<'_>, width: FloatWidth) -> BlockResult<Transform> {
    let mut out = [0.0; TRANSFORM_LEN];
    for value in &mut out {
        *value = reader.read_float(width)?;
    }
    Ok(out)
}

/// An ordered, append-only sequence of transform records.
///
/// There is no removal: frames stay in append order for the lifetime of the
/// owning block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameChain {
    frames: Vec<Transform>,
}

impl FrameChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            frames: Vec::with_capacity(frames),
        }
    }

    /// Copies `transform` onto the tail of the chain.
    pub fn push(&mut self, transform: &Transform) {
        self.frames.push(*transform);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Transform> {
        self.frames.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Transform> {
        self.frames.last()
    }

    /// Iterates head to tail.
    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.frames.iter()
    }

    /// Encoded size of `frames` records at `width`.
    #[must_use]
    pub const fn records_len(frames: usize, width: FloatWidth) -> usize {
        frames * TRANSFORM_LEN * width.bytes()
    }

    /// Writes every record head to tail. The count is written by the owner.
    pub fn encode(&self, sink: &mut dyn ByteSink, width: FloatWidth) {
        for frame in &self.frames {
            encode_transform(sink, frame, width);
        }
    }

    /// Reads `count` records.
    pub fn decode(
        reader: &mut ByteReader<'_>,
        count: usize,
        width: FloatWidth,
    ) -> BlockResult<Self> {
        let fits = reader.remaining() / Self::records_len(1, width);
        let mut chain = Self::with_capacity(count.min(fits));
        for _ in 0..count {
            chain.frames.push(decode_transform(reader, width)?);
        }
        Ok(chain)
    }
}

impl<'a> IntoIterator for &'a FrameChain {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
