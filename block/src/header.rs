//! Block header types and constants.

use stream::{ByteReader, ByteSink};

use crate::error::BlockResult;
use crate::types::BlockId;

/// Block header size in bytes (10 total).
pub const BLOCK_HEADER_SIZE: usize = 4 + 1 + 1 + 4;

/// Known block type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum BlockType {
    /// Scene graph container with a local transform.
    Container = 22,
    /// Texture coordinate animation track.
    UvAnimation = 121,
}

impl BlockType {
    /// Parses a block type from a raw tag. Unknown tags return `None`.
    #[must_use]
    pub const fn parse(tag: u8) -> Option<Self> {
        match tag {
            22 => Some(Self::Container),
            121 => Some(Self::UvAnimation),
            _ => None,
        }
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// Per-block flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockFlags(u8);

impl BlockFlags {
    /// Body starts with a name.
    pub const HAS_NAME: u8 = 1 << 0;

    /// Body contains an attribute list after the name.
    pub const HAS_ATTRIBUTES: u8 = 1 << 1;

    /// Floating point fields are 64-bit.
    pub const WIDE_FLOATS: u8 = 1 << 2;

    /// Body bytes are compressed.
    pub const COMPRESSED: u8 = 1 << 3;

    /// Reserved bits mask (must be zero).
    const RESERVED_MASK: u8 = !0b1111;

    /// Creates new flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn has_name(self) -> bool {
        self.0 & Self::HAS_NAME != 0
    }

    #[must_use]
    pub const fn has_attributes(self) -> bool {
        self.0 & Self::HAS_ATTRIBUTES != 0
    }

    #[must_use]
    pub const fn wide_floats(self) -> bool {
        self.0 & Self::WIDE_FLOATS != 0
    }

    #[must_use]
    pub const fn compressed(self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }

    /// Returns `true` if no reserved bits are set.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & Self::RESERVED_MASK == 0
    }

    /// Returns a copy with `bit` set or cleared.
    #[must_use]
    pub const fn with(self, bit: u8, on: bool) -> Self {
        if on {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }
}

/// Fixed-size header written in front of every block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Registry-assigned block ID.
    pub id: BlockId,
    /// Raw type tag; see [`BlockType`].
    pub type_tag: u8,
    /// Block flags.
    pub flags: BlockFlags,
    /// Body length in bytes as stored (after compression, if any).
    pub body_len: u32,
}

impl BlockHeader {
    #[must_use]
    pub const fn new(id: BlockId, block_type: BlockType, flags: BlockFlags, body_len: u32) -> Self {
        Self {
            id,
            type_tag: block_type.tag(),
            flags,
            body_len,
        }
    }

    /// Returns the known block type, if any.
    #[must_use]
    pub const fn block_type(&self) -> Option<BlockType> {
        BlockType::parse(self.type_tag)
    }

    /// Writes the header.
    pub fn encode(&self, sink: &mut dyn ByteSink) {
        sink.write_u32(self.id.raw());
        sink.write_u8(self.type_tag);
        sink.write_u8(self.flags.raw());
        sink.write_u32(self.body_len);
    }

    /// Reads a header. Flag validity is checked by the caller.
    pub fn decode(reader: &mut ByteReader<'_>) -> BlockResult<Self> {
        let id = BlockId::new(reader.read_u32()?);
        let type_tag = reader.read_u8()?;
        let flags = BlockFlags::from_raw(reader.read_u8()?);
        let body_len = reader.read_u32()?;
        Ok(Self {
            id,
            type_tag,
            flags,
            body_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream::ByteWriter;

    #[test]
    fn header_size_is_correct() {
        // id(4) + type(1) + flags(1) + body_len(4)
        assert_eq!(BLOCK_HEADER_SIZE, 10);
    }

    #[test]
    fn block_type_parse() {
        assert_eq!(BlockType::parse(22), Some(BlockType::Container));
        assert_eq!(BlockType::parse(121), Some(BlockType::UvAnimation));
        assert_eq!(BlockType::parse(1), None);
        assert_eq!(BlockType::UvAnimation.tag(), 121);
    }

    #[test]
    fn flags_bits() {
        let flags = BlockFlags::default()
            .with(BlockFlags::HAS_NAME, true)
            .with(BlockFlags::WIDE_FLOATS, true);
        assert!(flags.has_name());
        assert!(!flags.has_attributes());
        assert!(flags.wide_floats());
        assert!(!flags.compressed());
        assert_eq!(flags.raw(), 0b0101);
        assert!(!flags.with(BlockFlags::HAS_NAME, false).has_name());
    }

    #[test]
    fn flags_reserved_bits_invalid() {
        assert!(BlockFlags::from_raw(0b1111).is_valid());
        assert!(!BlockFlags::from_raw(0b1_0000).is_valid());
        assert!(!BlockFlags::from_raw(0x80).is_valid());
    }

    #[test]
    fn header_layout() {
        let header = BlockHeader::new(
            BlockId::new(0x0102_0304),
            BlockType::UvAnimation,
            BlockFlags::from_raw(BlockFlags::HAS_NAME),
            0x0A0B_0C0D,
        );
        let mut writer = ByteWriter::new();
        header.encode(&mut writer);
        assert_eq!(
            writer.finish(),
            vec![0x04, 0x03, 0x02, 0x01, 121, 0x01, 0x0D, 0x0C, 0x0B, 0x0A]
        );
    }

    #[test]
    fn header_decode_matches_encode() {
        let header = BlockHeader::new(
            BlockId::new(7),
            BlockType::Container,
            BlockFlags::from_raw(0b0011),
            512,
        );
        let mut writer = ByteWriter::new();
        header.encode(&mut writer);
        let bytes = writer.finish();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(BlockHeader::decode(&mut reader).unwrap(), header);
        assert_eq!(header.block_type(), Some(BlockType::Container));
    }

    #[test]
    fn header_decode_truncated() {
        let mut reader = ByteReader::new(&[1, 0, 0, 0, 22]);
        assert!(BlockHeader::decode(&mut reader).is_err());
    }
}
