//! Block names.

use std::fmt;

use stream::{ByteReader, ByteSink};

use crate::error::{BlockError, BlockResult};

/// A UTF-8 block name, at most `u16::MAX` bytes long.
///
/// Encoded as a `u16` byte length followed by the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Validates and wraps a name.
    pub fn new(name: impl Into<String>) -> BlockResult<Self> {
        let name = name.into();
        if u16::try_from(name.len()).is_err() {
            return Err(BlockError::NameTooLong { len: name.len() });
        }
        Ok(Self(name))
    }

    /// Like [`Name::new`], but an empty string yields no name.
    pub fn optional(name: impl Into<String>) -> BlockResult<Option<Self>> {
        let name = name.into();
        if name.is_empty() {
            return Ok(None);
        }
        Self::new(name).map(Some)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encoded size in bytes, prefix included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + self.0.len()
    }

    pub fn encode(&self, sink: &mut dyn ByteSink) -> BlockResult<()> {
        sink.write_str16(&self.0)?;
        Ok(())
    }

    pub fn decode(reader: &mut ByteReader<'_>) -> BlockResult<Self> {
        Ok(Self(reader.read_str16()?.to_owned()))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
