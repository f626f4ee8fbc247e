//! Attribute lists.
//!
//! An attribute list is an ordered sequence of `(namespace, id, value)`
//! entries. Entries are never merged: duplicate keys are all kept and all
//! emitted, in insertion order.
//!
//! Wire layout of one entry:
//!
//! ```text
//! namespace u8 | id u16 | tag u8 | value
//! ```
//!
//! Float values follow the run's float width exactly like payload floats.

use stream::{ByteReader, ByteSink, FloatWidth};

use crate::context::EncodeContext;
use crate::error::{BlockError, BlockResult};
use crate::link::BlockLink;
use crate::types::BlockId;

/// Value tags.
pub mod tag {
    pub const BOOL: u8 = 1;
    pub const INT8: u8 = 2;
    pub const INT16: u8 = 3;
    pub const INT32: u8 = 4;
    pub const UINT8: u8 = 5;
    pub const UINT16: u8 = 6;
    pub const UINT32: u8 = 7;
    pub const FLOAT: u8 = 8;
    pub const STRING: u8 = 9;
    pub const FLOAT_ARRAY: u8 = 10;
    pub const BLOCK_REF: u8 = 11;
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    /// Encoded at the run's float width.
    Float(f64),
    String(String),
    /// Encoded as a `u16` count followed by floats at the run's width.
    FloatArray(Vec<f64>),
    /// Reference to a live block, resolved to its ID at encode time.
    Link(BlockLink),
    /// Reference by raw ID. Decoding always yields this form.
    Id(BlockId),
}

impl AttrValue {
    /// Returns the wire tag for this value.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Bool(_) => tag::BOOL,
            Self::Int8(_) => tag::INT8,
            Self::Int16(_) => tag::INT16,
            Self::Int32(_) => tag::INT32,
            Self::UInt8(_) => tag::UINT8,
            Self::UInt16(_) => tag::UINT16,
            Self::UInt32(_) => tag::UINT32,
            Self::Float(_) => tag::FLOAT,
            Self::String(_) => tag::STRING,
            Self::FloatArray(_) => tag::FLOAT_ARRAY,
            Self::Link(_) | Self::Id(_) => tag::BLOCK_REF,
        }
    }

    fn check_len(&self) -> BlockResult<()> {
        let len = match self {
            Self::String(s) => s.len(),
            Self::FloatArray(values) => values.len(),
            _ => return Ok(()),
        };
        if u16::try_from(len).is_err() {
            return Err(BlockError::ValueTooLong { len });
        }
        Ok(())
    }

    fn encode(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        let width = ctx.float_width();
        match self {
            Self::Bool(v) => sink.write_u8(u8::from(*v)),
            Self::Int8(v) => sink.write_i8(*v),
            Self::Int16(v) => sink.write_i16(*v),
            Self::Int32(v) => sink.write_i32(*v),
            Self::UInt8(v) => sink.write_u8(*v),
            Self::UInt16(v) => sink.write_u16(*v),
            Self::UInt32(v) => sink.write_u32(*v),
            Self::Float(v) => sink.write_float(*v, width),
            Self::String(s) => sink.write_str16(s)?,
            Self::FloatArray(values) => {
                let count = u16::try_from(values.len())
                    .map_err(|_| BlockError::ValueTooLong { len: values.len() })?;
                sink.write_u16(count);
                for value in values {
                    sink.write_float(*value, width);
                }
            }
            Self::Link(link) => sink.write_u32(link.resolve(ctx.resolver)?.raw()),
            Self::Id(id) => sink.write_u32(id.raw()),
        }
        Ok(())
    }

    fn decode(tag: u8, reader: &mut ByteReader<'_>, width: FloatWidth) -> BlockResult<Self> {
        let value = match tag {
            tag::BOOL => Self::Bool(reader.read_u8()? != 0),
            tag::INT8 => Self::Int8(reader.read_i8()?),
            tag::INT16 => Self::Int16(reader.read_i16()?),
            tag::INT32 => Self::Int32(reader.read_i32()?),
            tag::UINT8 => Self::UInt8(reader.read_u8()?),
            tag::UINT16 => Self::UInt16(reader.read_u16()?),
            tag::UINT32 => Self::UInt32(reader.read_u32()?),
            tag::FLOAT => Self::Float(reader.read_float(width)?),
            tag::STRING => Self::String(reader.read_str16()?.to_owned()),
            tag::FLOAT_ARRAY => {
                let count = usize::from(reader.read_u16()?);
                let mut values = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    values.push(reader.read_float(width)?);
                }
                Self::FloatArray(values)
            }
            tag::BLOCK_REF => Self::Id(BlockId::new(reader.read_u32()?)),
            tag => return Err(BlockError::UnknownValueTag { tag }),
        };
        Ok(value)
    }
}

/// One attribute entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrEntry {
    pub namespace: u8,
    pub id: u16,
    pub value: AttrValue,
}

/// Ordered attribute entries owned by a block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeList {
    entries: Vec<AttrEntry>,
}

impl AttributeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// Fails if the list already holds `u16::MAX` entries or the value does
    /// not fit its length prefix.
    pub fn push(&mut self, namespace: u8, id: u16, value: AttrValue) -> BlockResult<()> {
        if self.entries.len() >= usize::from(u16::MAX) {
            return Err(BlockError::TooManyAttributes {
                count: self.entries.len(),
            });
        }
        value.check_len()?;
        self.entries.push(AttrEntry {
            namespace,
            id,
            value,
        });
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrEntry> {
        self.entries.iter()
    }

    /// Returns every value stored under `(namespace, id)`, in insertion order.
    pub fn get_all(&self, namespace: u8, id: u16) -> impl Iterator<Item = &AttrValue> {
        self.entries
            .iter()
            .filter(move |e| e.namespace == namespace && e.id == id)
            .map(|e| &e.value)
    }

    /// Writes the count and every entry. Callers skip empty lists entirely.
    pub fn encode(&self, sink: &mut dyn ByteSink, ctx: &EncodeContext<'_>) -> BlockResult<()> {
        let count = u16::try_from(self.entries.len()).map_err(|_| {
            BlockError::TooManyAttributes {
                count: self.entries.len(),
            }
        })?;
        sink.write_u16(count);
        for entry in &self.entries {
            sink.write_u8(entry.namespace);
            sink.write_u16(entry.id);
            sink.write_u8(entry.value.tag());
            entry.value.encode(sink, ctx)?;
        }
        Ok(())
    }

    pub fn decode(reader: &mut ByteReader<'_>, width: FloatWidth) -> BlockResult<Self> {
        let count = usize::from(reader.read_u16()?);
        let mut entries = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let namespace = reader.read_u8()?;
            let id = reader.read_u16()?;
            let tag = reader.read_u8()?;
            let value = AttrValue::decode(tag, reader, width)?;
            entries.push(AttrEntry {
                namespace,
                id,
                value,
            });
        }
        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a AttrEntry;
    type IntoIter = std::slice::Iter<'a, AttrEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
