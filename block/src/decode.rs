//! Decoding of uncompressed block bodies.

use stream::{ByteReader, FloatWidth};

use crate::attr::AttributeList;
use crate::error::{BlockError, BlockResult};
use crate::frames::{decode_transform, FrameChain, Transform};
use crate::header::{BlockHeader, BlockType};
use crate::name::Name;
use crate::types::BlockId;

/// Decoded type-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Container {
        parent: BlockId,
        transform: Transform,
    },
    UvAnimation {
        frames: FrameChain,
    },
    /// Payload of a block type this crate does not know.
    Opaque(Vec<u8>),
}

/// A decoded block body.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBody {
    pub name: Option<Name>,
    pub attributes: AttributeList,
    pub payload: Payload,
}

/// Decodes an uncompressed body described by `header`.
///
/// The whole body must be consumed.
pub fn decode_body(header: &BlockHeader, body: &[u8]) -> BlockResult<DecodedBody> {
    let width = FloatWidth::from_wide(header.flags.wide_floats());
    let mut reader = ByteReader::new(body);

    let name = if header.flags.has_name() {
        Some(Name::decode(&mut reader)?)
    } else {
        None
    };
    let attributes = if header.flags.has_attributes() {
        AttributeList::decode(&mut reader, width)?
    } else {
        AttributeList::new()
    };

    let payload = match header.block_type() {
        Some(BlockType::Container) => {
            let parent = BlockId::new(reader.read_u32()?);
            let transform = decode_transform(&mut reader, width)?;
            Payload::Container { parent, transform }
        }
        Some(BlockType::UvAnimation) => {
            let count = usize::from(reader.read_u16()?);
            let frames = FrameChain::decode(&mut reader, count, width)?;
            Payload::UvAnimation { frames }
        }
        None => Payload::Opaque(reader.read_bytes(reader.remaining())?.to_vec()),
    };

    if !reader.is_empty() {
        return Err(BlockError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }

    Ok(DecodedBody {
        name,
        attributes,
        payload,
    })
}
